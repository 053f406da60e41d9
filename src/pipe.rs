use crate::config::SimConfig;
use crate::sprites::{PIPE_HEIGHT, PIPE_WIDTH};
use rand::Rng;

/// A top/bottom barrier pair sliding left across the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: i32,
    /// Bottom edge of the top barrier (top of the gap).
    pub height: i32,
    /// Image top of the top barrier; sits above the field.
    pub top: i32,
    /// Top edge of the bottom barrier (bottom of the gap).
    pub bottom: i32,
    pub passed: bool,
    velocity: i32,
}

impl Pipe {
    pub fn new<R: Rng + ?Sized>(x: i32, cfg: &SimConfig, rng: &mut R) -> Self {
        let height = rng.gen_range(cfg.pipe_min_height..cfg.pipe_max_height);
        Self::with_height(x, height, cfg)
    }

    pub fn with_height(x: i32, height: i32, cfg: &SimConfig) -> Self {
        Self {
            x,
            height,
            top: height - PIPE_HEIGHT as i32,
            bottom: height + cfg.pipe_gap,
            passed: false,
            velocity: cfg.pipe_velocity,
        }
    }

    pub fn advance(&mut self) {
        self.x -= self.velocity;
    }

    pub fn width(&self) -> i32 {
        PIPE_WIDTH as i32
    }

    pub fn right_edge(&self) -> i32 {
        self.x + self.width()
    }

    pub fn is_off_screen(&self) -> bool {
        self.right_edge() < 0
    }

    /// Returns true only the first time it is called.
    pub fn mark_passed(&mut self) -> bool {
        !std::mem::replace(&mut self.passed, true)
    }
}
