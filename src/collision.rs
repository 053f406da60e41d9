use crate::bird::Bird;
use crate::pipe::Pipe;
use crate::sprites::SpriteSheet;

/// Pixel-accurate test of a bird against both barriers of a pipe.
pub fn collides(bird: &Bird, pipe: &Pipe, sprites: &SpriteSheet) -> bool {
    let bird_mask = sprites.bird[bird.frame].mask();
    let by = bird.y.round() as i32;
    let top_offset = (pipe.x - bird.x, pipe.top - by);
    let bottom_offset = (pipe.x - bird.x, pipe.bottom - by);
    bird_mask
        .overlap(sprites.pipe_bottom.mask(), bottom_offset)
        .or_else(|| bird_mask.overlap(sprites.pipe_top.mask(), top_offset))
        .is_some()
}
