//! World constants, rewards and evolution settings, with JSON persistence.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, SimulationError};

/// World constants and training parameters.
///
/// The defaults reproduce the reference world: a 500×800 play area, a ground
/// line at 730 and pipes spawning at x = 700.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Play area width.
    pub window_width: f32,
    /// Play area height.
    pub window_height: f32,
    /// Y coordinate of the ground line. Birds whose lower edge reaches it die.
    pub ground_y: f32,
    /// Birds whose upper edge goes above this line die.
    pub ceiling_y: f32,

    /// Vertical velocity set by a jump (negative is upward).
    pub jump_velocity: f32,
    /// Acceleration coefficient applied to the squared tick count.
    pub gravity: f32,
    /// Maximum downward displacement per tick.
    pub terminal_displacement: f32,
    /// Extra upward displacement added while rising.
    pub rising_bias: f32,

    /// Spawn x of every bird.
    pub bird_spawn_x: f32,
    /// Spawn y of every bird.
    pub bird_spawn_y: f32,
    /// Width of the bird sprite box.
    pub bird_width: u32,
    /// Height of the bird sprite box.
    pub bird_height: u32,

    /// Vertical gap between the top and bottom pipe parts.
    pub pipe_gap: f32,
    /// Width of a pipe part.
    pub pipe_width: u32,
    /// Height of a pipe part.
    pub pipe_height: u32,
    /// Height of the lip at the opening end of a pipe part.
    pub pipe_lip_height: u32,
    /// Horizontal inset of the pipe body relative to its lip.
    pub pipe_lip_inset: u32,
    /// Pixels per tick a pipe moves left.
    pub pipe_speed: f32,
    /// X coordinate where new pipes appear.
    pub pipe_spawn_x: f32,
    /// Lower bound (inclusive) of the random gap anchor.
    pub gap_min: i32,
    /// Upper bound (exclusive) of the random gap anchor.
    pub gap_max: i32,

    /// Width of one ground tile.
    pub base_width: f32,
    /// Pixels per tick the ground scrolls left.
    pub base_speed: f32,

    /// Fitness gained by every live bird each tick.
    pub survival_reward: f32,
    /// Fitness gained by every live bird when the score increments.
    pub pass_reward: f32,
    /// Fitness lost by a bird that hits a pipe.
    pub collision_penalty: f32,
    /// A controller output above this value means "jump".
    pub jump_threshold: f32,
    /// Multi-bird generations end once the score exceeds this value.
    pub early_stop_score: Option<u32>,

    /// Number of controllers per generation.
    pub population_size: usize,
    /// Neural network layer dimensions (input must be 3).
    pub layer_sizes: Vec<usize>,
    /// Range of the initial random weights.
    pub weight_scale: f32,
    /// Number of top controllers copied unchanged into the next generation.
    pub elite_count: usize,
    /// Fraction of the ranked population eligible as parents.
    pub survival_fraction: f32,
    /// Lower bound of the log-uniform mutation scale.
    pub mutation_scale_min: f32,
    /// Upper bound of the log-uniform mutation scale.
    pub mutation_scale_max: f32,
    /// Maximum number of generations to train.
    pub generations: u32,
    /// Training stops once any controller reaches this fitness.
    pub fitness_threshold: Option<f32>,

    /// Ticks per second for human-paced runs.
    pub frame_rate: u32,
    /// Seed for the pipe gap random source. `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_width: 500.0,
            window_height: 800.0,
            ground_y: 730.0,
            ceiling_y: 0.0,
            jump_velocity: -10.5,
            gravity: 1.5,
            terminal_displacement: 16.0,
            rising_bias: 2.0,
            bird_spawn_x: 230.0,
            bird_spawn_y: 350.0,
            bird_width: 68,
            bird_height: 48,
            pipe_gap: 200.0,
            pipe_width: 104,
            pipe_height: 640,
            pipe_lip_height: 48,
            pipe_lip_inset: 4,
            pipe_speed: 5.0,
            pipe_spawn_x: 700.0,
            gap_min: 50,
            gap_max: 450,
            base_width: 672.0,
            base_speed: 5.0,
            survival_reward: 0.1,
            pass_reward: 5.0,
            collision_penalty: 1.0,
            jump_threshold: 0.5,
            early_stop_score: Some(20),
            population_size: 50,
            layer_sizes: vec![3, 6, 1],
            weight_scale: 1.0,
            elite_count: 2,
            survival_fraction: 0.2,
            mutation_scale_min: 0.01,
            mutation_scale_max: 0.5,
            generations: 50,
            fitness_threshold: Some(100.0),
            frame_rate: 30,
            rng_seed: None,
        }
    }
}

impl Params {
    /// Checks that the parameters describe a playable world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            return Err(ConfigError::invalid("window", "dimensions must be positive"));
        }
        if self.ground_y <= self.ceiling_y {
            return Err(ConfigError::invalid("ground_y", "must lie below ceiling_y"));
        }
        if self.terminal_displacement <= 0.0 {
            return Err(ConfigError::invalid(
                "terminal_displacement",
                "must be positive",
            ));
        }
        if self.bird_width == 0 || self.bird_height == 0 {
            return Err(ConfigError::invalid("bird", "sprite box must be non-empty"));
        }
        if self.pipe_width == 0 || self.pipe_height == 0 {
            return Err(ConfigError::invalid("pipe", "sprite box must be non-empty"));
        }
        if self.pipe_lip_height > self.pipe_height || 2 * self.pipe_lip_inset >= self.pipe_width
        {
            return Err(ConfigError::invalid("pipe_lip", "lip does not fit the pipe"));
        }
        if self.pipe_gap <= 0.0 {
            return Err(ConfigError::invalid("pipe_gap", "must be positive"));
        }
        if self.pipe_speed <= 0.0 {
            return Err(ConfigError::invalid("pipe_speed", "must be positive"));
        }
        if self.gap_min >= self.gap_max {
            return Err(ConfigError::invalid("gap_min", "must be below gap_max"));
        }
        if self.base_width <= 0.0 {
            return Err(ConfigError::invalid("base_width", "must be positive"));
        }
        if self.population_size == 0 {
            return Err(ConfigError::invalid("population_size", "must be at least 1"));
        }
        if self.layer_sizes.len() < 2
            || self.layer_sizes.first() != Some(&3)
            || self.layer_sizes.last() == Some(&0)
        {
            return Err(ConfigError::invalid(
                "layer_sizes",
                "needs 3 inputs and at least one output",
            ));
        }
        if self.weight_scale <= 0.0 {
            return Err(ConfigError::invalid("weight_scale", "must be positive"));
        }
        if self.elite_count > self.population_size {
            return Err(ConfigError::invalid(
                "elite_count",
                "cannot exceed population_size",
            ));
        }
        if !(self.survival_fraction > 0.0 && self.survival_fraction <= 1.0) {
            return Err(ConfigError::invalid("survival_fraction", "must be in (0, 1]"));
        }
        if !(self.mutation_scale_min > 0.0 && self.mutation_scale_min < self.mutation_scale_max) {
            return Err(ConfigError::invalid(
                "mutation_scale_min",
                "must be positive and below mutation_scale_max",
            ));
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::invalid("frame_rate", "must be positive"));
        }
        Ok(())
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), SimulationError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates parameters from a JSON file.
    ///
    /// Missing fields take their default value.
    pub fn load_from_file(path: &str) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
