//! Bird state and the per-tick kinematics model.
//!
//! Physics is driven by the number of ticks since the last jump, not by
//! wall-clock time, so a run is fully determined by its decisions.

use serde::{Deserialize, Serialize};

use super::params::Params;

/// Stable index of a bird within its generation.
pub type BirdId = usize;

/// A simulated bird. Holds physics state only; tilt and animation live in
/// [`super::snapshot::Presentation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bird {
    /// Index of the bird (and of its controller) in the generation.
    pub id: BirdId,
    /// Horizontal position, fixed at spawn.
    pub x: f32,
    /// Vertical position of the sprite's top edge.
    pub y: f32,
    /// Vertical velocity set by the last jump.
    pub velocity: f32,
    /// Ticks since the last jump.
    pub tick_count: u32,
    /// Y at the moment of the last jump.
    pub jump_height: f32,
    /// Displacement applied by the most recent [`Bird::advance`].
    pub last_displacement: f32,
    /// Cleared on collision or when leaving the play area.
    pub alive: bool,
}

impl Bird {
    /// Creates a resting bird.
    ///
    /// # Arguments
    ///
    /// * `id` - Index of the bird in its generation
    /// * `x` - Fixed horizontal position
    /// * `y` - Initial vertical position
    pub fn new(id: BirdId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            velocity: 0.0,
            tick_count: 0,
            jump_height: y,
            last_displacement: 0.0,
            alive: true,
        }
    }

    /// Creates a bird at the spawn point configured in `params`.
    pub fn spawn(id: BirdId, params: &Params) -> Self {
        Self::new(id, params.bird_spawn_x, params.bird_spawn_y)
    }

    /// Re-arms the jump arc. Calling it again before [`Bird::advance`] has no
    /// further effect.
    pub fn jump(&mut self, params: &Params) {
        self.velocity = params.jump_velocity;
        self.tick_count = 0;
        self.jump_height = self.y;
    }

    /// Moves the bird by exactly one tick and returns the displacement.
    pub fn advance(&mut self, params: &Params) -> f32 {
        self.tick_count += 1;
        let d = displacement(self.velocity, self.tick_count, params);
        self.y += d;
        self.last_displacement = d;
        d
    }

    /// Whether the bird is moving upward.
    pub fn is_rising(&self) -> bool {
        self.last_displacement < 0.0
    }

    /// Marks the bird as removed from play.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Checks if the bird is still in play.
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Displacement for the `tick`-th tick of an arc started with `velocity`.
///
/// Clamped to the terminal displacement; rising displacements get an extra
/// upward bias.
pub fn displacement(velocity: f32, tick: u32, params: &Params) -> f32 {
    let t = tick as f32;
    let mut d = velocity * t + params.gravity * t * t;
    d = d.min(params.terminal_displacement);
    if d < 0.0 {
        d -= params.rising_bias;
    }
    d
}
