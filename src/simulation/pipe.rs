//! Pipes: paired top/bottom barriers with a fixed vertical gap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::params::Params;
use super::scrolling::Scrolling;

/// A pipe pair.
///
/// `height` is the lower edge of the top part; the bottom part starts
/// `gap` below it. The sprite origins of the two parts are `top` and `bottom`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipe {
    /// Left edge shared by both parts.
    pub x: f32,
    /// Lower edge of the top part (the random gap anchor).
    pub height: f32,
    /// Y of the top part's sprite origin.
    pub top: f32,
    /// Y of the bottom part's sprite origin, i.e. its upper edge.
    pub bottom: f32,
    /// Set once any live bird has crossed `x`.
    pub passed: bool,
    /// Width of a part.
    pub width: f32,
    /// Pixels moved per tick.
    pub speed: f32,
}

impl Pipe {
    /// Creates a pipe at `x` with a random gap anchor in `[gap_min, gap_max)`.
    ///
    /// # Arguments
    ///
    /// * `x` - Spawn position of the left edge
    /// * `params` - World constants
    /// * `rng` - Source for the gap draw
    pub fn new<R: Rng>(x: f32, params: &Params, rng: &mut R) -> Self {
        let anchor = rng.random_range(params.gap_min..params.gap_max);
        Self::with_height(x, anchor as f32, params)
    }

    /// Creates a pipe with a fixed gap anchor.
    pub fn with_height(x: f32, height: f32, params: &Params) -> Self {
        Self {
            x,
            height,
            top: height - params.pipe_height as f32,
            bottom: height + params.pipe_gap,
            passed: false,
            width: params.pipe_width as f32,
            speed: params.pipe_speed,
        }
    }

    /// Vertical size of the opening.
    pub fn gap(&self) -> f32 {
        self.bottom - self.height
    }

    /// Checks if a bird at `bird_x` has crossed the pipe's left edge.
    pub fn is_passed_by(&self, bird_x: f32) -> bool {
        self.x < bird_x
    }
}

impl Scrolling for Pipe {
    fn x(&self) -> f32 {
        self.x
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn scroll(&mut self) {
        self.x -= self.speed;
    }
}
