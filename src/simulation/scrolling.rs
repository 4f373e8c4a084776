//! Trait for world elements that scroll from right to left.
//!
//! Pipes and ground tiles share the same motion: a fixed leftward speed per
//! tick and an exit once their trailing edge passes the left boundary.

/// An element that moves left at a constant speed.
pub trait Scrolling {
    /// Returns the x coordinate of the leading (left) edge.
    fn x(&self) -> f32;

    /// Returns the horizontal extent of the element.
    fn width(&self) -> f32;

    /// Moves the element left by one tick.
    fn scroll(&mut self);

    /// Returns the x coordinate of the trailing (right) edge.
    fn right_edge(&self) -> f32 {
        self.x() + self.width()
    }

    /// Checks if the trailing edge has passed the left boundary.
    fn is_off_screen(&self) -> bool {
        self.right_edge() < 0.0
    }
}
