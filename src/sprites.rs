use crate::mask::Mask;

pub const BIRD_WIDTH: u32 = 68;
pub const BIRD_HEIGHT: u32 = 48;
pub const PIPE_WIDTH: u32 = 104;
pub const PIPE_HEIGHT: u32 = 640;
pub const BASE_WIDTH: u32 = 672;
pub const BASE_HEIGHT: u32 = 224;

const PIPE_CAP: u32 = 48;
const PIPE_INSET: u32 = 4;
// Vertical wing offsets for the up, mid and down frames.
const WING_OFFSETS: [f32; 3] = [-10.0, 0.0, 8.0];

/// RGBA image plus the solid-pixel mask derived from its alpha channel.
#[derive(Debug, Clone)]
pub struct Sprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    mask: Mask,
}

impl Sprite {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        let mask = Mask::from_rgba(width, height, &rgba);
        Self {
            width,
            height,
            rgba,
            mask,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    pub fn flipped_vertical(&self) -> Self {
        let row = (self.width * 4) as usize;
        let mut rgba = Vec::with_capacity(self.rgba.len());
        for chunk in self.rgba.chunks_exact(row).rev() {
            rgba.extend_from_slice(chunk);
        }
        Self {
            width: self.width,
            height: self.height,
            rgba,
            mask: self.mask.flipped_vertical(),
        }
    }
}

/// All images the world needs. Built once per run and shared by simulation and renderer.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub bird: [Sprite; 3],
    pub pipe_bottom: Sprite,
    pub pipe_top: Sprite,
    pub base: Sprite,
}

impl SpriteSheet {
    pub fn new() -> Self {
        let pipe_bottom = pipe_sprite();
        let pipe_top = pipe_bottom.flipped_vertical();
        Self {
            bird: [bird_sprite(0), bird_sprite(1), bird_sprite(2)],
            pipe_bottom,
            pipe_top,
            base: base_sprite(),
        }
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::new()
    }
}

fn in_ellipse(x: u32, y: u32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x as f32 + 0.5 - cx) / rx;
    let dy = (y as f32 + 0.5 - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

fn put(rgba: &mut [u8], width: u32, x: u32, y: u32, col: [u8; 4]) {
    let i = ((y * width + x) * 4) as usize;
    rgba[i..i + 4].copy_from_slice(&col);
}

fn bird_sprite(frame: usize) -> Sprite {
    let (w, h) = (BIRD_WIDTH, BIRD_HEIGHT);
    let mut rgba = vec![0u8; (w * h * 4) as usize];
    let wing_cy = 24.0 + WING_OFFSETS[frame];
    for y in 0..h {
        for x in 0..w {
            let col = if in_ellipse(x, y, 46.0, 16.0, 6.0, 6.0) {
                if in_ellipse(x, y, 48.0, 16.0, 2.5, 2.5) {
                    [20, 20, 20, 255]
                } else {
                    [250, 250, 250, 255]
                }
            } else if in_ellipse(x, y, 12.0, wing_cy, 12.0, 7.0) {
                [250, 240, 200, 255]
            } else if in_ellipse(x, y, 33.0, 25.0, 29.0, 20.0) {
                [245, 200, 40, 255]
            } else if (58..66).contains(&x) && (22..30).contains(&y) {
                [235, 100, 40, 255]
            } else {
                continue;
            };
            put(&mut rgba, w, x, y, col);
        }
    }
    Sprite::from_rgba(w, h, rgba)
}

// Upright pipe: cap at the top edge (the gap side), inset body below it.
fn pipe_sprite() -> Sprite {
    let (w, h) = (PIPE_WIDTH, PIPE_HEIGHT);
    let mut rgba = vec![0u8; (w * h * 4) as usize];
    for y in 0..h {
        let (x0, x1) = if y < PIPE_CAP {
            (0, w)
        } else {
            (PIPE_INSET, w - PIPE_INSET)
        };
        for x in x0..x1 {
            let shade = 60 + ((x - x0) * 120 / (x1 - x0)) as u8;
            let edge = x == x0 || x + 1 == x1 || y == 0 || y + 1 == PIPE_CAP;
            let col = if edge {
                [30, 70, 20, 255]
            } else {
                [shade / 2, 120 + shade / 2, 40, 255]
            };
            put(&mut rgba, w, x, y, col);
        }
    }
    Sprite::from_rgba(w, h, rgba)
}

fn base_sprite() -> Sprite {
    let (w, h) = (BASE_WIDTH, BASE_HEIGHT);
    let mut rgba = vec![0u8; (w * h * 4) as usize];
    for y in 0..h {
        for x in 0..w {
            let col = if y < 6 {
                [80, 60, 40, 255]
            } else if y < 24 {
                if (x + y) % 24 < 12 {
                    [120, 200, 60, 255]
                } else {
                    [100, 180, 50, 255]
                }
            } else {
                [220, 210, 150, 255]
            };
            put(&mut rgba, w, x, y, col);
        }
    }
    Sprite::from_rgba(w, h, rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bird_has_transparent_margins() {
        let sheet = SpriteSheet::new();
        for sprite in &sheet.bird {
            let mask = sprite.mask();
            assert!(!mask.get(0, 0));
            assert!(!mask.get(BIRD_WIDTH as i32 - 1, BIRD_HEIGHT as i32 - 1));
            assert!(mask.get(33, 25));
            assert!(mask.count() < (BIRD_WIDTH * BIRD_HEIGHT) as usize);
        }
    }

    #[test]
    fn wing_frames_differ() {
        let sheet = SpriteSheet::new();
        assert_ne!(sheet.bird[0].mask(), sheet.bird[2].mask());
    }

    #[test]
    fn top_pipe_cap_faces_gap() {
        let sheet = SpriteSheet::new();
        let last = PIPE_HEIGHT as i32 - 1;
        // Cap is full width, body is inset.
        assert!(sheet.pipe_bottom.mask().get(0, 0));
        assert!(!sheet.pipe_bottom.mask().get(0, last));
        assert!(sheet.pipe_top.mask().get(0, last));
        assert!(!sheet.pipe_top.mask().get(0, 0));
        assert_eq!(sheet.pipe_top.pixel(10, 0), sheet.pipe_bottom.pixel(10, last as u32));
    }
}
