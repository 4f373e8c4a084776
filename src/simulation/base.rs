//! Infinitely scrolling ground made of two tiles.

use serde::{Deserialize, Serialize};

use super::params::Params;
use super::scrolling::Scrolling;

/// Two equal tiles laid back to back. When one leaves the screen it is moved
/// behind the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Base {
    /// Left edge of the first tile.
    pub x1: f32,
    /// Left edge of the second tile.
    pub x2: f32,
    /// Y of the ground line.
    pub y: f32,
    /// Width of one tile.
    pub width: f32,
    /// Pixels moved per tick.
    pub speed: f32,
}

impl Base {
    /// Creates the ground at the configured ground line.
    pub fn new(params: &Params) -> Self {
        Self {
            x1: 0.0,
            x2: params.base_width,
            y: params.ground_y,
            width: params.base_width,
            speed: params.base_speed,
        }
    }

    /// Left edges of both tiles.
    pub fn tiles(&self) -> [f32; 2] {
        [self.x1, self.x2]
    }
}

impl Scrolling for Base {
    fn x(&self) -> f32 {
        self.x1.min(self.x2)
    }

    fn width(&self) -> f32 {
        self.width * 2.0
    }

    fn scroll(&mut self) {
        self.x1 -= self.speed;
        self.x2 -= self.speed;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }

    // The ground never leaves; it wraps instead.
    fn is_off_screen(&self) -> bool {
        false
    }
}
