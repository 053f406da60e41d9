use crate::config::SimConfig;

/// Ticks each wing frame stays on screen.
const ANIMATION_TICKS: u32 = 5;
/// Below this tilt the wings freeze in the mid position.
const DIVE_TILT: f32 = -80.0;

/// Vertical motion constants copied out of [`SimConfig`] once per episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub gravity: f32,
    pub jump_velocity: f32,
    pub terminal_velocity: f32,
    pub ascent_bias: f32,
    pub launch_margin: f32,
    pub max_tilt: f32,
    pub min_tilt: f32,
    pub tilt_step: f32,
}

impl From<&SimConfig> for Physics {
    fn from(cfg: &SimConfig) -> Self {
        Self {
            gravity: cfg.gravity,
            jump_velocity: cfg.jump_velocity,
            terminal_velocity: cfg.terminal_velocity,
            ascent_bias: cfg.ascent_bias,
            launch_margin: cfg.launch_margin,
            max_tilt: cfg.max_tilt,
            min_tilt: cfg.min_tilt,
            tilt_step: cfg.tilt_step,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: i32,
    pub y: f32,
    pub vel: f32,
    /// Ticks since the last jump; `t` in the displacement formula.
    pub age: u32,
    /// Height at which the last jump started.
    pub launch_y: f32,
    /// Degrees, positive is nose up. Cosmetic.
    pub tilt: f32,
    /// Wing frame index into the bird sprites.
    pub frame: usize,
    flap_count: u32,
    physics: Physics,
}

impl Bird {
    pub fn new(x: i32, y: f32, physics: Physics) -> Self {
        Self {
            x,
            y,
            vel: 0.0,
            age: 0,
            launch_y: y,
            tilt: 0.0,
            frame: 0,
            flap_count: 0,
            physics,
        }
    }

    pub fn jump(&mut self) {
        self.vel = self.physics.jump_velocity;
        self.age = 0;
        self.launch_y = self.y;
    }

    /// Integrate one tick and return the displacement applied.
    pub fn advance(&mut self) -> f32 {
        let p = self.physics;
        self.age += 1;
        let t = self.age as f32;
        let mut d = self.vel * t + p.gravity * t * t;
        if d >= p.terminal_velocity {
            d = p.terminal_velocity;
        }
        if d < 0.0 {
            d -= p.ascent_bias;
        }
        self.y += d;

        if d < 0.0 || self.y < self.launch_y + p.launch_margin {
            self.tilt = self.tilt.max(p.max_tilt);
        } else {
            self.tilt = (self.tilt - p.tilt_step).max(p.min_tilt);
        }
        d
    }

    /// Step the wing cycle up, mid, down, mid.
    pub fn animate(&mut self) {
        self.flap_count += 1;
        let t = ANIMATION_TICKS;
        self.frame = match self.flap_count {
            c if c < t => 0,
            c if c < t * 2 => 1,
            c if c < t * 3 => 2,
            c if c < t * 5 => 1,
            _ => {
                self.flap_count = 0;
                0
            }
        };
        if self.tilt <= DIVE_TILT {
            self.frame = 1;
            self.flap_count = t * 2;
        }
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }
}
