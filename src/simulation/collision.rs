//! Shape-accurate collision between birds and pipes, plus the play-area
//! bounds check.

use super::bird::Bird;
use super::mask::ShapeSet;
use super::params::Params;
use super::pipe::Pipe;

/// Offsets of the top and bottom pipe parts relative to the bird's origin.
pub fn pipe_offsets(bird: &Bird, pipe: &Pipe) -> ((i32, i32), (i32, i32)) {
    let dx = pipe.x.round() as i32 - bird.x.round() as i32;
    let bird_y = bird.y.round() as i32;
    (
        (dx, pipe.top.round() as i32 - bird_y),
        (dx, pipe.bottom.round() as i32 - bird_y),
    )
}

/// Checks whether the bird's silhouette overlaps either part of the pipe.
pub fn collides(bird: &Bird, pipe: &Pipe, shapes: &ShapeSet) -> bool {
    let (top_offset, bottom_offset) = pipe_offsets(bird, pipe);

    shapes.bird.overlap(&shapes.pipe_top, top_offset).is_some()
        || shapes
            .bird
            .overlap(&shapes.pipe_bottom, bottom_offset)
            .is_some()
}

/// Checks whether the bird touched the ground or flew above the ceiling.
pub fn out_of_bounds(bird: &Bird, params: &Params) -> bool {
    bird.y + params.bird_height as f32 >= params.ground_y || bird.y < params.ceiling_y
}
