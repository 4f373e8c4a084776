//! Read-only view of the world handed to renderers, and the cosmetic state a
//! renderer derives from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::bird::BirdId;
use super::environment::Environment;

/// Maximum nose-up tilt in degrees.
pub const MAX_ROTATION: f32 = 25.0;
/// Nose-down limit in degrees.
pub const MIN_ROTATION: f32 = -90.0;
/// Degrees the tilt decays per tick.
pub const ROTATION_VELOCITY: f32 = 20.0;
/// Ticks each wing frame is shown.
pub const ANIMATION_TIME: u32 = 5;
/// Distance below the jump height within which a rising bird keeps its nose up.
pub const TILT_WINDOW: f32 = 50.0;

/// Bird state as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdView {
    /// Bird id.
    pub id: BirdId,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Displacement of the last tick (negative while rising).
    pub displacement: f32,
    /// Y at the last jump.
    pub jump_height: f32,
    /// Whether the bird is still in play.
    pub alive: bool,
}

/// Pipe state as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeView {
    /// Left edge.
    pub x: f32,
    /// Lower edge of the top part.
    pub height: f32,
    /// Sprite origin of the top part.
    pub top: f32,
    /// Upper edge of the bottom part.
    pub bottom: f32,
    /// Whether a bird has crossed it.
    pub passed: bool,
}

/// Everything a renderer may draw for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All birds, including dead ones.
    pub birds: Vec<BirdView>,
    /// Pipes in spawn order.
    pub pipes: Vec<PipeView>,
    /// Left edges of the two ground tiles.
    pub base_tiles: [f32; 2],
    /// Y of the ground line.
    pub base_y: f32,
    /// Pipes passed.
    pub score: u32,
    /// Ticks applied.
    pub tick: u64,
    /// Generation number, if driven by the evaluation loop.
    pub generation: Option<u32>,
    /// Birds still in play.
    pub alive: usize,
    /// Highest fitness among live birds, if driven by the evaluation loop.
    pub max_fitness: Option<f32>,
}

impl Snapshot {
    /// Captures the current state of an environment.
    pub fn capture(environment: &Environment) -> Self {
        Self {
            birds: environment
                .birds
                .iter()
                .map(|bird| BirdView {
                    id: bird.id,
                    x: bird.x,
                    y: bird.y,
                    displacement: bird.last_displacement,
                    jump_height: bird.jump_height,
                    alive: bird.alive,
                })
                .collect(),
            pipes: environment
                .pipes
                .iter()
                .map(|pipe| PipeView {
                    x: pipe.x,
                    height: pipe.height,
                    top: pipe.top,
                    bottom: pipe.bottom,
                    passed: pipe.passed,
                })
                .collect(),
            base_tiles: environment.base.tiles(),
            base_y: environment.base.y,
            score: environment.score,
            tick: environment.ticks,
            generation: None,
            alive: environment.alive_count(),
            max_fitness: None,
        }
    }

    /// Adds the display counters supplied by the evaluation loop.
    pub fn with_counters(mut self, generation: u32, max_fitness: Option<f32>) -> Self {
        self.generation = Some(generation);
        self.max_fitness = max_fitness;
        self
    }
}

/// Cosmetic pose of one bird.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdPose {
    /// Rotation in degrees, positive is nose up.
    pub tilt: f32,
    /// Ticks into the wing animation cycle.
    pub frame_counter: u32,
    /// Wing frame to draw (0, 1 or 2).
    pub frame: u8,
}

impl Default for BirdPose {
    fn default() -> Self {
        Self {
            tilt: 0.0,
            frame_counter: 0,
            frame: 0,
        }
    }
}

impl BirdPose {
    /// Advances the pose by one tick.
    pub fn update(&mut self, bird: &BirdView) {
        if bird.displacement < 0.0 && bird.y < bird.jump_height + TILT_WINDOW {
            self.tilt = self.tilt.max(MAX_ROTATION);
        } else {
            self.tilt = (self.tilt - ROTATION_VELOCITY).max(MIN_ROTATION);
        }

        self.frame_counter += 1;
        let phase = self.frame_counter;
        self.frame = if phase < ANIMATION_TIME {
            0
        } else if phase < ANIMATION_TIME * 2 {
            1
        } else if phase < ANIMATION_TIME * 3 {
            2
        } else if phase < ANIMATION_TIME * 4 {
            1
        } else {
            self.frame_counter = 0;
            0
        };

        // nose-diving birds hold their wings level
        if self.tilt <= -80.0 {
            self.frame = 1;
            self.frame_counter = ANIMATION_TIME * 2;
        }
    }
}

/// Cosmetic overlay keyed by bird id, updated by the renderer from
/// snapshots. Never read by the simulation.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    poses: HashMap<BirdId, BirdPose>,
}

impl Presentation {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the pose of every live bird in the snapshot.
    pub fn update(&mut self, snapshot: &Snapshot) {
        for bird in snapshot.birds.iter().filter(|bird| bird.alive) {
            self.poses.entry(bird.id).or_default().update(bird);
        }
        self.poses
            .retain(|id, _| snapshot.birds.get(*id).is_some_and(|bird| bird.alive));
    }

    /// Pose of a bird, or the resting pose when unknown.
    pub fn pose(&self, id: BirdId) -> BirdPose {
        self.poses.get(&id).copied().unwrap_or_default()
    }

    /// Forgets every pose, e.g. when a new generation starts.
    pub fn clear(&mut self) {
        self.poses.clear();
    }
}
