use crate::config::SimConfig;
use crate::sprites::Sprite;
use crate::world::World;

const SKY_TOP: (u8, u8, u8) = (78, 192, 202);
const SKY_BOTTOM: (u8, u8, u8) = (200, 236, 240);

/// Software renderer into a tightly packed RGBA frame of the field's size.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: u32,
    height: u32,
    generation: usize,
}

impl Renderer {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            width: config.field_width,
            height: config.field_height,
            generation: 0,
        }
    }

    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    pub fn frame_len(&self) -> usize {
        (self.width * self.height * 4) as usize
    }

    pub fn draw(&self, world: &World<'_, '_>, frame: &mut [u8]) {
        let mut canvas = Canvas {
            frame,
            width: self.width,
            height: self.height,
        };
        canvas.sky();

        let sprites = world.sprites();
        for pipe in world.pipes() {
            canvas.blit(&sprites.pipe_top, pipe.x, pipe.top);
            canvas.blit(&sprites.pipe_bottom, pipe.x, pipe.bottom);
        }

        let base = world.base();
        canvas.blit(&sprites.base, base.x1, base.y);
        canvas.blit(&sprites.base, base.x2, base.y);

        for bird in world.birds() {
            let sprite = &sprites.bird[bird.frame];
            canvas.blit_rotated(sprite, bird.x, bird.y.round() as i32, bird.tilt);
        }

        let panel_w = 200;
        canvas.fill_rect(8, 8, panel_w, 74, (0, 0, 0, 120));
        canvas.stroke_rect(8, 8, panel_w, 74, (255, 255, 255, 60));
        canvas.text(&format!("SCORE: {}", world.score()), 18, 18, 2, (255, 255, 255, 255));
        canvas.text(&format!("GEN: {}", self.generation), 18, 40, 2, (220, 200, 240, 255));
        canvas.text(&format!("ALIVE: {}", world.alive()), 18, 62, 2, (200, 220, 255, 255));
    }
}

struct Canvas<'f> {
    frame: &'f mut [u8],
    width: u32,
    height: u32,
}

impl Canvas<'_> {
    fn sky(&mut self) {
        let h = self.height.max(1);
        for (y, row) in self.frame.chunks_exact_mut((self.width * 4) as usize).enumerate() {
            let t = y as u32 * 255 / h;
            let mix = |a: u8, b: u8| ((a as u32 * (255 - t) + b as u32 * t) / 255) as u8;
            let col = [
                mix(SKY_TOP.0, SKY_BOTTOM.0),
                mix(SKY_TOP.1, SKY_BOTTOM.1),
                mix(SKY_TOP.2, SKY_BOTTOM.2),
                255,
            ];
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&col);
            }
        }
    }

    fn blend(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        if idx + 3 >= self.frame.len() {
            return;
        }
        let ar = a as u16;
        let iar = (255 - a) as u16;
        let px = &mut self.frame[idx..idx + 4];
        px[0] = ((r as u16 * ar + px[0] as u16 * iar) / 255) as u8;
        px[1] = ((g as u16 * ar + px[1] as u16 * iar) / 255) as u8;
        px[2] = ((b as u16 * ar + px[2] as u16 * iar) / 255) as u8;
        px[3] = 255;
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: (u8, u8, u8, u8)) {
        for py in y..y + h {
            for px in x..x + w {
                self.blend(px, py, col.0, col.1, col.2, col.3);
            }
        }
    }

    fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: (u8, u8, u8, u8)) {
        if w <= 0 || h <= 0 {
            return;
        }
        for px in x..x + w {
            self.blend(px, y, col.0, col.1, col.2, col.3);
            self.blend(px, y + h - 1, col.0, col.1, col.2, col.3);
        }
        for py in y..y + h {
            self.blend(x, py, col.0, col.1, col.2, col.3);
            self.blend(x + w - 1, py, col.0, col.1, col.2, col.3);
        }
    }

    fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) {
        // Clip to the visible rows up front; pipe images hang far off screen.
        let y0 = (-y).max(0) as u32;
        let y1 = (self.height as i32 - y).clamp(0, sprite.height() as i32) as u32;
        let x0 = (-x).max(0) as u32;
        let x1 = (self.width as i32 - x).clamp(0, sprite.width() as i32) as u32;
        for sy in y0..y1 {
            for sx in x0..x1 {
                let [r, g, b, a] = sprite.pixel(sx, sy);
                if a > 0 {
                    self.blend(x + sx as i32, y + sy as i32, r, g, b, a);
                }
            }
        }
    }

    /// Rotate about the sprite's centre, positive degrees counter-clockwise.
    fn blit_rotated(&mut self, sprite: &Sprite, x: i32, y: i32, degrees: f32) {
        if degrees == 0.0 {
            self.blit(sprite, x, y);
            return;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (sprite.width() as f32, sprite.height() as f32);
        let (cx, cy) = (x as f32 + w / 2.0, y as f32 + h / 2.0);
        let reach = (w * w + h * h).sqrt() / 2.0;
        let (x0, x1) = ((cx - reach).floor() as i32, (cx + reach).ceil() as i32);
        let (y0, y1) = ((cy - reach).floor() as i32, (cy + reach).ceil() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                // Screen y grows downward, so counter-clockwise flips the sine.
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let sx = cos * dx - sin * dy + w / 2.0;
                let sy = sin * dx + cos * dy + h / 2.0;
                if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                    continue;
                }
                let [r, g, b, a] = sprite.pixel(sx as u32, sy as u32);
                if a > 0 {
                    self.blend(px, py, r, g, b, a);
                }
            }
        }
    }

    fn glyph(&mut self, ch: char, x: i32, y: i32, scale: i32, col: (u8, u8, u8, u8)) -> i32 {
        if let Some(rows) = glyph_5x7(ch) {
            for (ry, row) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (row >> (4 - rx)) & 1 == 1 {
                        self.fill_rect(x + rx * scale, y + ry as i32 * scale, scale, scale, col);
                    }
                }
            }
        }
        6 * scale
    }

    fn text(&mut self, text: &str, x: i32, y: i32, scale: i32, col: (u8, u8, u8, u8)) {
        let mut cx = x;
        for ch in text.chars() {
            cx += self.glyph(ch, cx, y, scale, col);
        }
    }
}

fn glyph_5x7(ch: char) -> Option<[u8; 7]> {
    Some(match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        ' ' => [0; 7],
        _ => return None,
    })
}
