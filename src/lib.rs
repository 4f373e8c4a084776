//! # Flappy Evo - Neuroevolution for a side-scrolling game
//!
//! A deterministic, tick-driven flappy-bird simulation and the loop that
//! trains a population of neural network controllers to play it.
//!
//! ## Features
//!
//! - Tick-count driven bird kinematics (jump arc, terminal velocity)
//! - Randomised pipes with a seedable random source
//! - Pixel-accurate collision against precomputed shape masks
//! - Population evaluation in one shared world with parallel decisions
//! - MLP controllers evolved by elitism, crossover and mutation
//! - Real-time visualization with egui/macroquad
//!
//! ## Core Modules
//!
//! - [`simulation::bird`] - Bird state and kinematics
//! - [`simulation::pipe`] - Pipes
//! - [`simulation::collision`] - Shape-accurate collision checks
//! - [`simulation::environment`] - Per-tick world state machine
//! - [`simulation::evaluation`] - Generation loop and fitness
//! - [`simulation::evolution`] - Population of brains

/// Core simulation logic and data structures.
pub mod simulation {
    /// Scrolling ground tiles.
    pub mod base;
    /// Bird state and kinematics.
    pub mod bird;
    /// Neural network controller.
    pub mod brain;
    /// Bird/pipe collision and play-area bounds.
    pub mod collision;
    /// World state advanced one tick at a time.
    pub mod environment;
    /// Error types.
    pub mod error;
    /// Generation loop, controller contracts and fitness.
    pub mod evaluation;
    /// Recent training events for display.
    pub mod event_log;
    /// Events collected during the collision phase.
    pub mod events;
    /// Population of brains evolved between generations.
    pub mod evolution;
    /// Precomputed pixel masks.
    pub mod mask;
    /// World constants and training parameters.
    pub mod params;
    /// Pipes.
    pub mod pipe;
    /// Seedable random sources.
    pub mod rng;
    /// Trait for elements that scroll left.
    ///
    /// The [`scrolling::Scrolling`] trait is implemented by [`pipe::Pipe`]
    /// and [`base::Base`].
    pub mod scrolling;
    /// Renderer snapshots and cosmetic overlay.
    pub mod snapshot;
}
