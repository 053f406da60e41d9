use crate::sprites::BASE_WIDTH;

/// Two ground tiles leapfrogging each other. Purely visual.
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    velocity: i32,
}

impl Base {
    pub fn new(y: i32, velocity: i32) -> Self {
        Self {
            y,
            x1: 0,
            x2: BASE_WIDTH as i32,
            velocity,
        }
    }

    pub fn advance(&mut self) {
        let w = BASE_WIDTH as i32;
        self.x1 -= self.velocity;
        self.x2 -= self.velocity;
        if self.x1 + w < 0 {
            self.x1 = self.x2 + w;
        }
        if self.x2 + w < 0 {
            self.x2 = self.x1 + w;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_stay_adjacent_while_scrolling() {
        let mut base = Base::new(730, 5);
        for _ in 0..1000 {
            base.advance();
            assert_eq!((base.x1 - base.x2).abs(), BASE_WIDTH as i32);
            assert!(base.x1.min(base.x2) + BASE_WIDTH as i32 >= 0);
        }
    }
}
