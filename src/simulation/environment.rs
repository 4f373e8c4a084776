//! The shared world a generation of birds plays in.
//!
//! The environment owns every bird, pipe, the ground and the score, and
//! advances them by one discrete tick given the birds' jump decisions.
//! Per-bird work runs on rayon; everything that touches shared state
//! (score, pipe list) happens serially afterwards.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::base::Base;
use super::bird::{Bird, BirdId};
use super::collision;
use super::events::{self, EventQueue, TickEvent};
use super::mask::ShapeSet;
use super::params::Params;
use super::pipe::Pipe;
use super::rng::SimRng;
use super::scrolling::Scrolling;

/// Why a generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every bird collided or left the play area.
    Extinct,
    /// The score passed the early-stop limit with more than one bird in play.
    ScoreLimit,
    /// Abandoned by an external quit signal. Only produced by the evaluation
    /// loop, never by the environment itself.
    Cancelled,
}

/// Lifecycle of an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvState {
    /// Ticks are being applied.
    Running,
    /// Terminal.
    Ended(EndReason),
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Birds removed by hitting a pipe.
    pub collided: Vec<BirdId>,
    /// Birds removed by touching the ground or leaving through the ceiling.
    pub out_of_bounds: Vec<BirdId>,
    /// Whether the score was incremented.
    pub scored: bool,
}

/// Authoritative per-tick simulation state.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Bird arena; a bird's index is its id and never changes.
    pub birds: Vec<Bird>,
    /// Pipes in spawn order, ascending x.
    pub pipes: Vec<Pipe>,
    /// Scrolling ground.
    pub base: Base,
    /// Pipes passed, shared by the whole population.
    pub score: u32,
    /// Ticks applied so far.
    pub ticks: u64,
    state: EnvState,
    params: Params,
    shapes: Arc<ShapeSet>,
    rng: SimRng,
}

impl Environment {
    /// Creates an environment with `population` birds and a single pipe.
    ///
    /// Shape masks are built here; use [`Environment::with_shapes`] to share
    /// them across environments.
    pub fn new(population: usize, params: &Params, rng: SimRng) -> Self {
        Self::with_shapes(population, params, Arc::new(ShapeSet::new(params)), rng)
    }

    /// Creates an environment reusing precomputed shape masks.
    ///
    /// # Arguments
    ///
    /// * `population` - Number of birds to spawn
    /// * `params` - World constants
    /// * `shapes` - Masks built from the same `params`
    /// * `rng` - Source for pipe gap draws
    pub fn with_shapes(
        population: usize,
        params: &Params,
        shapes: Arc<ShapeSet>,
        mut rng: SimRng,
    ) -> Self {
        let birds = (0..population).map(|id| Bird::spawn(id, params)).collect();
        let first_pipe = Pipe::new(params.pipe_spawn_x, params, &mut rng);

        let state = if population == 0 {
            EnvState::Ended(EndReason::Extinct)
        } else {
            EnvState::Running
        };

        Self {
            birds,
            pipes: vec![first_pipe],
            base: Base::new(params),
            score: 0,
            ticks: 0,
            state,
            params: params.clone(),
            shapes,
            rng,
        }
    }

    /// Advances the world by one tick.
    ///
    /// `decisions[i]` is the jump decision of bird `i`; missing entries mean
    /// no jump. Ticking an ended environment does nothing.
    pub fn tick(&mut self, decisions: &[bool]) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::default();
        }
        debug_assert!(!self.pipes.is_empty(), "a running world always has a pipe");

        let params = &self.params;

        // per-bird kinematics, no shared state involved. A jump re-arms the
        // arc after this tick's move, so the move uses the pre-jump counter.
        self.birds
            .par_iter_mut()
            .filter(|bird| bird.is_alive())
            .for_each(|bird| {
                bird.advance(params);
                if decisions.get(bird.id).copied().unwrap_or(false) {
                    bird.jump(params);
                }
            });

        // collision scan in parallel, findings applied serially
        let shapes = self.shapes.as_ref();
        let pipes = &self.pipes;
        let found: Vec<Vec<TickEvent>> = self
            .birds
            .par_iter()
            .filter(|bird| bird.is_alive())
            .map(|bird| scan_bird(bird, pipes, shapes))
            .collect();

        let mut queue = EventQueue::new();
        queue.extend(found.into_iter().flatten());
        let applied = events::apply_events(&mut self.birds, &mut self.pipes, queue);

        self.pipes.retain(|pipe| !pipe.is_off_screen());

        if applied.spawn_pipe {
            self.score += 1;
            let pipe = Pipe::new(self.params.pipe_spawn_x, &self.params, &mut self.rng);
            trace!(score = self.score, height = pipe.height, "spawned pipe");
            self.pipes.push(pipe);
        }

        let mut out_of_bounds = Vec::new();
        for bird in self.birds.iter_mut().filter(|bird| bird.is_alive()) {
            if collision::out_of_bounds(bird, &self.params) {
                bird.kill();
                out_of_bounds.push(bird.id);
            }
        }

        for pipe in &mut self.pipes {
            pipe.scroll();
        }
        self.base.scroll();
        self.ticks += 1;

        self.update_state();

        TickOutcome {
            collided: applied.collided,
            out_of_bounds,
            scored: applied.spawn_pipe,
        }
    }

    fn update_state(&mut self) {
        let reason = if self.alive_count() == 0 {
            Some(EndReason::Extinct)
        } else if self.params.early_stop_score.is_some_and(|limit| {
            self.birds.len() > 1 && self.score > limit
        }) {
            Some(EndReason::ScoreLimit)
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!(
                ticks = self.ticks,
                score = self.score,
                ?reason,
                "environment ended"
            );
            self.state = EnvState::Ended(reason);
        }
    }

    /// X of the live bird furthest to the right.
    pub fn lead_bird_x(&self) -> Option<f32> {
        self.live_birds().map(|bird| bird.x).reduce(f32::max)
    }

    /// Index of the pipe still ahead of the lead bird.
    ///
    /// Switches to the second pipe once the lead bird is past the first
    /// pipe's trailing edge.
    pub fn active_pipe_index(&self) -> usize {
        match self.lead_bird_x() {
            Some(x) if self.pipes.len() > 1 && x > self.pipes[0].right_edge() => 1,
            _ => 0,
        }
    }

    /// The pipe birds should steer for.
    pub fn active_pipe(&self) -> Option<&Pipe> {
        let index = self.active_pipe_index();
        self.pipes.get(index).or_else(|| self.pipes.last())
    }

    /// Iterates over birds still in play.
    pub fn live_birds(&self) -> impl Iterator<Item = &Bird> {
        self.birds.iter().filter(|bird| bird.is_alive())
    }

    /// Number of birds still in play.
    pub fn alive_count(&self) -> usize {
        self.live_birds().count()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EnvState {
        self.state
    }

    /// Checks if the environment still accepts ticks.
    pub fn is_running(&self) -> bool {
        self.state == EnvState::Running
    }

    /// World constants this environment was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shared shape masks.
    pub fn shapes(&self) -> &Arc<ShapeSet> {
        &self.shapes
    }
}

fn scan_bird(bird: &Bird, pipes: &[Pipe], shapes: &ShapeSet) -> Vec<TickEvent> {
    let mut local_events = Vec::new();
    for (pipe_index, pipe) in pipes.iter().enumerate() {
        if collision::collides(bird, pipe, shapes) {
            local_events.push(TickEvent::Collided {
                bird_id: bird.id,
                pipe_index,
            });
        }
        if !pipe.passed && pipe.is_passed_by(bird.x) {
            local_events.push(TickEvent::Crossed {
                bird_id: bird.id,
                pipe_index,
            });
        }
    }
    local_events
}
