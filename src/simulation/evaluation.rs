//! Evaluation loop: plays one generation of controllers in a shared
//! environment and turns their survival into fitness.
//!
//! Each tick every live bird observes the pipe ahead, its controller decides
//! whether to jump, and the environment applies all decisions at once.
//! Fitness accrues per tick survived and per pipe passed by the population;
//! hitting a pipe costs a penalty.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::bird::Bird;
use super::environment::{EndReason, EnvState, Environment};
use super::error::SimulationError;
use super::mask::ShapeSet;
use super::params::Params;
use super::rng::{self, SimRng};
use super::snapshot::Snapshot;

/// Fixed-size controller input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Bird's vertical position.
    pub y: f32,
    /// Distance to the lower edge of the active pipe's top part.
    pub top_distance: f32,
    /// Distance to the upper edge of the active pipe's bottom part.
    pub bottom_distance: f32,
}

impl Observation {
    /// Observation of `bird` against the environment's active pipe.
    pub fn of(environment: &Environment, bird: &Bird) -> Self {
        let pipe = environment.active_pipe();
        debug_assert!(pipe.is_some(), "a running world always has a pipe");

        let (height, bottom) = pipe.map_or((bird.y, bird.y), |pipe| (pipe.height, pipe.bottom));
        Self {
            y: bird.y,
            top_distance: (bird.y - height).abs(),
            bottom_distance: (bird.y - bottom).abs(),
        }
    }

    /// The observation as network inputs.
    pub fn to_array(&self) -> [f32; 3] {
        [self.y, self.top_distance, self.bottom_distance]
    }
}

/// Maps an observation to a scalar output. Stateless across ticks.
pub trait Controller: Send + Sync {
    /// Returns the controller's output for one observation.
    fn activate(&self, observation: &Observation) -> f32;
}

/// Converts a controller output to a jump decision. Non-finite outputs never
/// jump.
pub fn decide(output: f32, threshold: f32) -> bool {
    output.is_finite() && output > threshold
}

/// Fitness bookkeeping of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Index of the controller (and of its bird).
    pub controller: usize,
    /// Accumulated fitness, starts at 0.
    pub fitness: f32,
}

/// Progress of a generation after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// More ticks to play.
    Running,
    /// No more ticks will be applied.
    Finished(EndReason),
}

/// How fast a generation is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// As fast as possible; physics only depends on the tick count.
    Unthrottled,
    /// One tick per frame at the given rate.
    Fixed {
        /// Ticks per second.
        frame_rate: u32,
    },
}

impl Pacing {
    /// Target duration of one tick, if throttled.
    pub fn tick_duration(&self) -> Option<Duration> {
        match self {
            Pacing::Unthrottled => None,
            Pacing::Fixed { frame_rate } => {
                Some(Duration::from_secs(1) / (*frame_rate).max(1))
            }
        }
    }
}

/// A controller together with its final fitness.
#[derive(Debug, Clone)]
pub struct Evaluated<C> {
    /// The controller, handed back to its provider.
    pub controller: C,
    /// Fitness at generation end.
    pub fitness: f32,
}

/// Result of one generation.
#[derive(Debug, Clone)]
pub struct GenerationReport<C> {
    /// Generation number.
    pub generation: u32,
    /// Ticks played.
    pub ticks: u64,
    /// Final score.
    pub score: u32,
    /// Why the generation stopped.
    pub end: EndReason,
    /// Controllers in their original order with their fitness.
    pub evaluated: Vec<Evaluated<C>>,
}

impl<C> GenerationReport<C> {
    /// Fitness values in controller order.
    pub fn fitness(&self) -> Vec<f32> {
        self.evaluated.iter().map(|e| e.fitness).collect()
    }

    /// Condensed, serializable form of the report.
    pub fn summary(&self) -> GenerationSummary {
        let fitness = self.fitness();
        let best_fitness = fitness.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f32>() / fitness.len() as f32
        };

        GenerationSummary {
            generation: self.generation,
            ticks: self.ticks,
            score: self.score,
            end: self.end,
            population: fitness.len(),
            best_fitness,
            mean_fitness,
        }
    }
}

/// Per-generation statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation number.
    pub generation: u32,
    /// Ticks played.
    pub ticks: u64,
    /// Final score.
    pub score: u32,
    /// Why the generation stopped.
    pub end: EndReason,
    /// Number of controllers evaluated.
    pub population: usize,
    /// Highest fitness.
    pub best_fitness: f32,
    /// Average fitness.
    pub mean_fitness: f32,
}

/// One generation in progress.
pub struct Generation<C> {
    number: u32,
    controllers: Vec<C>,
    records: Vec<EvaluationRecord>,
    environment: Environment,
    params: Params,
    end: Option<EndReason>,
}

impl<C: Controller> Generation<C> {
    /// Starts a generation with one bird per controller.
    pub fn new(
        number: u32,
        controllers: Vec<C>,
        params: &Params,
        rng: SimRng,
    ) -> Result<Self, SimulationError> {
        Self::with_shapes(number, controllers, params, Arc::new(ShapeSet::new(params)), rng)
    }

    /// Starts a generation reusing precomputed shape masks.
    ///
    /// # Arguments
    ///
    /// * `number` - Generation number, reported back in snapshots and reports
    /// * `controllers` - One controller per bird
    /// * `params` - World constants and rewards
    /// * `shapes` - Masks built from the same `params`
    /// * `rng` - Source for pipe gap draws
    pub fn with_shapes(
        number: u32,
        controllers: Vec<C>,
        params: &Params,
        shapes: Arc<ShapeSet>,
        rng: SimRng,
    ) -> Result<Self, SimulationError> {
        if controllers.is_empty() {
            return Err(SimulationError::EmptyPopulation);
        }

        let records = (0..controllers.len())
            .map(|controller| EvaluationRecord {
                controller,
                fitness: 0.0,
            })
            .collect();
        let environment = Environment::with_shapes(controllers.len(), params, shapes, rng);

        Ok(Self {
            number,
            controllers,
            records,
            environment,
            params: params.clone(),
            end: None,
        })
    }

    /// Plays one tick.
    pub fn step(&mut self) -> GenerationStatus {
        if let Some(reason) = self.end {
            return GenerationStatus::Finished(reason);
        }

        let environment = &self.environment;
        let controllers = &self.controllers;
        let records = &self.records;
        let threshold = self.params.jump_threshold;

        let decisions: Vec<bool> = environment
            .birds
            .par_iter()
            .map(|bird| {
                if !bird.is_alive() {
                    return false;
                }
                let observation = Observation::of(environment, bird);
                let controller = &controllers[records[bird.id].controller];
                decide(controller.activate(&observation), threshold)
            })
            .collect();

        for bird in self.environment.birds.iter().filter(|bird| bird.is_alive()) {
            self.records[bird.id].fitness += self.params.survival_reward;
        }

        let outcome = self.environment.tick(&decisions);

        for &id in &outcome.collided {
            self.records[id].fitness -= self.params.collision_penalty;
        }

        if outcome.scored {
            // every bird in play when the pipe was passed shares the bonus
            let rewarded = self
                .environment
                .live_birds()
                .map(|bird| bird.id)
                .chain(outcome.out_of_bounds.iter().copied())
                .collect::<Vec<_>>();
            for id in rewarded {
                self.records[id].fitness += self.params.pass_reward;
            }
        }

        if let EnvState::Ended(reason) = self.environment.state() {
            self.end = Some(reason);
            return GenerationStatus::Finished(reason);
        }
        GenerationStatus::Running
    }

    /// Plays until the generation ends or `cancel` is raised.
    pub fn run(mut self, cancel: &AtomicBool, pacing: Pacing) -> GenerationReport<C> {
        let tick_duration = pacing.tick_duration();

        loop {
            if cancel.load(Ordering::Relaxed) {
                self.end = Some(EndReason::Cancelled);
                break;
            }

            let started = Instant::now();
            if let GenerationStatus::Finished(_) = self.step() {
                break;
            }

            if let Some(target) = tick_duration {
                if let Some(remaining) = target.checked_sub(started.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }

        self.finish()
    }

    /// Plays unthrottled until the generation ends.
    pub fn run_to_end(self) -> GenerationReport<C> {
        self.run(&AtomicBool::new(false), Pacing::Unthrottled)
    }

    /// Ends the generation and hands the controllers back with their fitness.
    ///
    /// A generation finished before its environment ended counts as cancelled.
    pub fn finish(self) -> GenerationReport<C> {
        let end = self.end.unwrap_or(EndReason::Cancelled);
        debug!(
            generation = self.number,
            ticks = self.environment.ticks,
            score = self.environment.score,
            ?end,
            "generation finished"
        );

        let evaluated = self
            .controllers
            .into_iter()
            .zip(&self.records)
            .map(|(controller, record)| Evaluated {
                controller,
                fitness: record.fitness,
            })
            .collect();

        GenerationReport {
            generation: self.number,
            ticks: self.environment.ticks,
            score: self.environment.score,
            end,
            evaluated,
        }
    }

    /// Renderer view including generation number and best live fitness.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.environment).with_counters(self.number, self.max_live_fitness())
    }

    /// Highest fitness among birds still in play.
    pub fn max_live_fitness(&self) -> Option<f32> {
        self.environment
            .live_birds()
            .map(|bird| self.records[bird.id].fitness)
            .reduce(f32::max)
    }

    /// Generation number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The shared environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Mutable access to the environment, e.g. to stage a pipe layout before
    /// the first tick.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Fitness records in controller order.
    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    /// Checks if no more ticks will be applied.
    pub fn is_finished(&self) -> bool {
        self.end.is_some()
    }
}

/// Supplies controllers each generation and learns from their fitness.
pub trait ControllerProvider {
    /// Controller type handed to the evaluation loop.
    type Controller: Controller;

    /// Controllers to evaluate in the given generation.
    fn controllers(&mut self, generation: u32) -> Vec<Self::Controller>;

    /// Consumes the final fitness of a finished generation.
    fn report(&mut self, report: GenerationReport<Self::Controller>);
}

/// Why training stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// All configured generations were played.
    GenerationLimit,
    /// A controller reached the fitness threshold.
    FitnessThreshold,
    /// An external quit signal arrived.
    Cancelled,
}

/// Outcome of a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// One entry per completed generation.
    pub generations: Vec<GenerationSummary>,
    /// Why training stopped.
    pub stopped: StopReason,
}

impl TrainingSummary {
    /// Best fitness over all completed generations.
    pub fn best_fitness(&self) -> Option<f32> {
        self.generations
            .iter()
            .map(|summary| summary.best_fitness)
            .reduce(f32::max)
    }
}

/// Random source for the pipes of generation `number`.
///
/// With a seed in `params` every generation gets its own reproducible
/// stream; without one it draws from the OS.
pub fn generation_rng(params: &Params, number: u32) -> SimRng {
    match params.rng_seed {
        Some(seed) => rng::derive_generation_rng(seed, number),
        None => rng::rng_from_seed(None),
    }
}

/// Whether training ends after the generation described by `summary`.
///
/// The fitness threshold takes precedence over the generation limit.
pub fn stop_after(params: &Params, summary: &GenerationSummary) -> Option<StopReason> {
    if params
        .fitness_threshold
        .is_some_and(|threshold| summary.best_fitness >= threshold)
    {
        Some(StopReason::FitnessThreshold)
    } else if summary.generation >= params.generations {
        Some(StopReason::GenerationLimit)
    } else {
        None
    }
}

/// Trains a provider for up to `params.generations` generations.
///
/// Generations are numbered from 1. With a seed in `params`, generation `n`
/// plays a reproducible pipe sequence derived from it. A cancelled
/// generation is abandoned and not reported to the provider.
pub fn train<P: ControllerProvider>(
    provider: &mut P,
    params: &Params,
    cancel: &AtomicBool,
    mut on_generation: impl FnMut(&GenerationSummary),
) -> Result<TrainingSummary, SimulationError> {
    params.validate()?;
    let shapes = Arc::new(ShapeSet::new(params));
    let mut generations = Vec::new();

    for number in 1..=params.generations {
        let controllers = provider.controllers(number);
        let generation = Generation::with_shapes(
            number,
            controllers,
            params,
            Arc::clone(&shapes),
            generation_rng(params, number),
        )?;
        let report = generation.run(cancel, Pacing::Unthrottled);

        if report.end == EndReason::Cancelled {
            info!(generation = number, "training cancelled");
            return Ok(TrainingSummary {
                generations,
                stopped: StopReason::Cancelled,
            });
        }

        let summary = report.summary();
        info!(
            generation = summary.generation,
            ticks = summary.ticks,
            score = summary.score,
            best = summary.best_fitness,
            mean = summary.mean_fitness,
            "generation complete"
        );
        on_generation(&summary);
        provider.report(report);

        let stopped = stop_after(params, &summary);
        generations.push(summary);

        if let Some(stopped) = stopped {
            return Ok(TrainingSummary {
                generations,
                stopped,
            });
        }
    }

    Ok(TrainingSummary {
        generations,
        stopped: StopReason::GenerationLimit,
    })
}
