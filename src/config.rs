use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every tunable constant of the simulation. Defaults reproduce the classic game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Width of the visible field in pixels.
    pub field_width: u32,
    /// Height of the visible field in pixels.
    pub field_height: u32,
    /// Top edge of the ground strip; birds touching it are removed.
    pub ground_y: i32,
    /// Horizontal position shared by every bird for the whole episode.
    pub bird_x: i32,
    /// Vertical spawn position of every bird.
    pub bird_start_y: f32,
    /// Coefficient `a` in `d = v*t + a*t^2`.
    pub gravity: f32,
    /// Velocity assigned by a jump (negative is up).
    pub jump_velocity: f32,
    /// Largest downward displacement per tick.
    pub terminal_velocity: f32,
    /// Extra upward displacement added to every ascending tick.
    pub ascent_bias: f32,
    /// Birds within this many pixels below their launch height keep their nose up.
    pub launch_margin: f32,
    /// Nose-up tilt in degrees.
    pub max_tilt: f32,
    /// Nose-down limit in degrees.
    pub min_tilt: f32,
    /// Degrees the tilt decays per falling tick.
    pub tilt_step: f32,
    /// Vertical opening between the two barriers.
    pub pipe_gap: i32,
    /// Leftward pipe and ground speed, pixels per tick.
    pub pipe_velocity: i32,
    /// Horizontal spawn position of new pipes.
    pub pipe_spawn_x: i32,
    /// Inclusive lower bound of the random gap top.
    pub pipe_min_height: i32,
    /// Exclusive upper bound of the random gap top.
    pub pipe_max_height: i32,
    /// Fitness added to every live bird each tick.
    pub survival_reward: f64,
    /// Fitness added to every live bird when a pipe is passed.
    pub pass_reward: f64,
    /// Fitness removed from a bird that hits a pipe.
    pub collision_penalty: f64,
    /// Decision outputs strictly above this value trigger a jump.
    pub decision_threshold: f32,
    /// Target ticks per second; 0 runs unpaced.
    pub tick_rate: u32,
    /// Seed for pipe placement; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: 550,
            field_height: 800,
            ground_y: 730,
            bird_x: 230,
            bird_start_y: 350.0,
            gravity: 1.5,
            jump_velocity: -10.5,
            terminal_velocity: 16.0,
            ascent_bias: 2.0,
            launch_margin: 50.0,
            max_tilt: 25.0,
            min_tilt: -90.0,
            tilt_step: 20.0,
            pipe_gap: 200,
            pipe_velocity: 5,
            pipe_spawn_x: 700,
            pipe_min_height: 50,
            pipe_max_height: 450,
            survival_reward: 0.1,
            pass_reward: 5.0,
            collision_penalty: 1.0,
            decision_threshold: 0.5,
            tick_rate: 30,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load a JSON file; missing keys fall back to the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.field_width == 0 || self.field_height == 0 {
            return invalid("field_width/field_height", "must be non-zero");
        }
        if self.ground_y <= 0 || self.ground_y > self.field_height as i32 {
            return invalid("ground_y", "must lie inside the field");
        }
        if self.pipe_min_height >= self.pipe_max_height {
            return invalid("pipe_min_height", "must be below pipe_max_height");
        }
        if self.pipe_gap <= 0 {
            return invalid("pipe_gap", "must be positive");
        }
        if self.pipe_velocity <= 0 {
            return invalid("pipe_velocity", "must be positive");
        }
        if self.terminal_velocity.is_nan() || self.terminal_velocity < 0.0 {
            return invalid("terminal_velocity", "must be non-negative");
        }
        let physics = [
            ("bird_start_y", self.bird_start_y),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("ascent_bias", self.ascent_bias),
            ("launch_margin", self.launch_margin),
            ("max_tilt", self.max_tilt),
            ("min_tilt", self.min_tilt),
            ("tilt_step", self.tilt_step),
            ("decision_threshold", self.decision_threshold),
        ];
        if let Some((field, _)) = physics.into_iter().find(|(_, v)| !v.is_finite()) {
            return invalid(field, "must be finite");
        }
        let rewards = [
            ("survival_reward", self.survival_reward),
            ("pass_reward", self.pass_reward),
            ("collision_penalty", self.collision_penalty),
        ];
        if let Some((field, _)) = rewards.into_iter().find(|(_, v)| !v.is_finite()) {
            return invalid(field, "must be finite");
        }
        if self.min_tilt > self.max_tilt {
            return invalid("min_tilt", "must not exceed max_tilt");
        }
        Ok(())
    }

    /// Same config with pacing disabled. Used by headless hosts and tests.
    pub fn unpaced(mut self) -> Self {
        self.tick_rate = 0;
        self
    }
}
