//! Pixel masks for shape-accurate collision tests.
//!
//! Masks are rasterised once from `geo` polygons and then shared by reference;
//! no mask is rebuilt during a collision check.

use geo::{Contains, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use super::params::Params;

/// Number of vertices used to approximate the bird's ellipse.
const ELLIPSE_SEGMENTS: usize = 32;

/// An immutable bitmap of occupied pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Creates an empty mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Creates a mask with every pixel occupied.
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Rasterises a polygon into a `width × height` mask.
    ///
    /// A pixel is occupied when its centre lies inside the polygon.
    pub fn from_polygon(polygon: &Polygon<f32>, width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if polygon.contains(&centre) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether the pixel is occupied. Out-of-range pixels are empty.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    fn set(&mut self, x: u32, y: u32, value: bool) {
        let idx = (y * self.width + x) as usize;
        self.bits[idx] = value;
    }

    /// Number of occupied pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// Returns the mask mirrored top to bottom.
    pub fn flipped_vertical(&self) -> Self {
        let mut flipped = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                flipped.set(x, self.height - 1 - y, self.get(x, y));
            }
        }
        flipped
    }

    /// Finds the first pixel where `self` and `other` are both occupied.
    ///
    /// # Arguments
    ///
    /// * `other` - The mask to test against
    /// * `offset` - Position of `other`'s origin relative to `self`'s origin
    ///
    /// # Returns
    ///
    /// The overlapping pixel in `self`'s coordinates, or `None`.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (ox, oy) = offset;
        let x_start = ox.max(0);
        let y_start = oy.max(0);
        let x_end = (ox + other.width as i32).min(self.width as i32);
        let y_end = (oy + other.height as i32).min(self.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let (sx, sy) = (x as u32, y as u32);
                if self.get(sx, sy) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return Some((sx, sy));
                }
            }
        }
        None
    }
}

/// Precomputed masks for every shape in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSet {
    /// Bird silhouette.
    pub bird: Mask,
    /// Top pipe part, lip at the bottom.
    pub pipe_top: Mask,
    /// Bottom pipe part, lip at the top.
    pub pipe_bottom: Mask,
}

impl ShapeSet {
    /// Builds all masks from the sprite dimensions in `params`.
    pub fn new(params: &Params) -> Self {
        let bird = Mask::from_polygon(
            &bird_polygon(params.bird_width, params.bird_height),
            params.bird_width,
            params.bird_height,
        );
        let pipe_bottom = Mask::from_polygon(
            &pipe_polygon(
                params.pipe_width,
                params.pipe_height,
                params.pipe_lip_height,
                params.pipe_lip_inset,
            ),
            params.pipe_width,
            params.pipe_height,
        );
        let pipe_top = pipe_bottom.flipped_vertical();

        Self {
            bird,
            pipe_top,
            pipe_bottom,
        }
    }
}

/// Ellipse inset one pixel inside the bird's sprite box.
pub fn bird_polygon(width: u32, height: u32) -> Polygon<f32> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let (rx, ry) = ((cx - 1.0).max(0.5), (cy - 1.0).max(0.5));
    let ring: Vec<(f32, f32)> = (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            (cx + rx * angle.cos(), cy + ry * angle.sin())
        })
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}

/// Pipe part with its lip at the top (the opening of a bottom pipe).
pub fn pipe_polygon(width: u32, height: u32, lip_height: u32, lip_inset: u32) -> Polygon<f32> {
    let (w, h) = (width as f32, height as f32);
    let (lip, inset) = (lip_height as f32, lip_inset as f32);
    Polygon::new(
        LineString::from(vec![
            (0.0, 0.0),
            (w, 0.0),
            (w, lip),
            (w - inset, lip),
            (w - inset, h),
            (inset, h),
            (inset, lip),
            (0.0, lip),
        ]),
        vec![],
    )
}
