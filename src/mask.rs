/// Opaque-pixel bitmap of a sprite. Collision is tested on these, never on bounding boxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

/// Alpha values above this count as solid, as in pygame's `mask.from_surface`.
pub const ALPHA_THRESHOLD: u8 = 127;

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Build from tightly packed RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let mut mask = Self::new(width, height);
        for (i, px) in rgba.chunks_exact(4).take(mask.bits.len()).enumerate() {
            mask.bits[i] = px[3] > ALPHA_THRESHOLD;
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = solid;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// First solid pixel shared with `other` placed at `offset` relative to this mask,
    /// in this mask's coordinates. Rows are scanned top to bottom.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + other.width as i32).min(self.width as i32);
        let y1 = (dy + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// Mirror top to bottom.
    pub fn flipped_vertical(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(x, self.height - 1 - y, self.get(x as i32, y as i32));
            }
        }
        out
    }
}
