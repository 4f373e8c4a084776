//! Windowed front end: a configuration screen, live training of a bird
//! population and a keyboard-driven play mode.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use flappy_evo::simulation;
use simulation::brain::Brain;
use simulation::environment::Environment;
use simulation::error::SimulationError;
use simulation::evaluation::{
    self, ControllerProvider, Generation, GenerationStatus, GenerationSummary, StopReason,
};
use simulation::evolution::Population;
use simulation::mask::ShapeSet;
use simulation::params::Params;
use simulation::rng;
use simulation::snapshot::{Presentation, Snapshot};
use macroquad::prelude::*;
use tracing::{info, warn};

mod graphics;
mod ui;

const CONFIG_PATH: &str = "flappy_config.json";
const MAX_TICKS_PER_FRAME: u32 = 2000;

fn window_conf() -> Conf {
    Conf {
        window_title: "Flappy Evo".to_owned(),
        window_width: 800,
        window_height: 800,
        ..Default::default()
    }
}

/// A population being trained one tick at a time.
struct TrainingSession {
    population: Population,
    generation: Option<Generation<Brain>>,
    shapes: Arc<ShapeSet>,
    params: Params,
    last_snapshot: Option<Snapshot>,
    stopped: Option<StopReason>,
}

impl TrainingSession {
    fn new(params: &Params) -> Result<Self, SimulationError> {
        params.validate()?;
        let mut session = Self {
            population: Population::new(params),
            generation: None,
            shapes: Arc::new(ShapeSet::new(params)),
            params: params.clone(),
            last_snapshot: None,
            stopped: None,
        };
        session.start_generation(1)?;
        Ok(session)
    }

    fn start_generation(&mut self, number: u32) -> Result<(), SimulationError> {
        let controllers = self.population.controllers(number);
        self.generation = Some(Generation::with_shapes(
            number,
            controllers,
            &self.params,
            Arc::clone(&self.shapes),
            evaluation::generation_rng(&self.params, number),
        )?);
        Ok(())
    }

    /// Plays one tick and returns the summary of a generation that just ended.
    fn step(&mut self) -> Result<Option<GenerationSummary>, SimulationError> {
        let Some(generation) = self.generation.as_mut() else {
            return Ok(None);
        };
        if generation.step() == GenerationStatus::Running {
            return Ok(None);
        }

        let Some(finished) = self.generation.take() else {
            return Ok(None);
        };
        self.last_snapshot = Some(finished.snapshot());
        let report = finished.finish();
        let summary = report.summary();
        info!(
            generation = summary.generation,
            score = summary.score,
            best = summary.best_fitness,
            mean = summary.mean_fitness,
            "generation complete"
        );
        self.population.report(report);

        self.stopped = evaluation::stop_after(&self.params, &summary);
        if self.stopped.is_none() {
            self.start_generation(summary.generation + 1)?;
        }

        Ok(Some(summary))
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.generation
            .as_ref()
            .map(Generation::snapshot)
            .or_else(|| self.last_snapshot.clone())
    }
}

/// A single keyboard-driven bird.
struct PlaySession {
    environment: Environment,
    flap_pending: bool,
}

impl PlaySession {
    fn new(params: &Params) -> Self {
        Self {
            environment: Environment::new(1, params, rng::rng_from_seed(params.rng_seed)),
            flap_pending: false,
        }
    }

    fn step(&mut self) {
        let flap = std::mem::take(&mut self.flap_pending);
        self.environment.tick(&[flap]);
    }
}

enum Mode {
    Genesis,
    Training(TrainingSession),
    Play(PlaySession),
}

/// Number of whole ticks due this frame at the given tick rate.
fn due_ticks(accumulator: &mut f32, ticks_per_second: f32) -> u32 {
    *accumulator += get_frame_time() * ticks_per_second;
    let ticks = accumulator.floor().max(0.0) as u32;
    if ticks > MAX_TICKS_PER_FRAME {
        *accumulator = 0.0;
        return MAX_TICKS_PER_FRAME;
    }
    *accumulator -= ticks as f32;
    ticks
}

fn load_params() -> Params {
    if !Path::new(CONFIG_PATH).exists() {
        return Params::default();
    }
    match Params::load_from_file(CONFIG_PATH) {
        Ok(params) => {
            info!(path = CONFIG_PATH, "loaded configuration");
            params
        }
        Err(err) => {
            warn!(path = CONFIG_PATH, error = %err, "ignoring configuration file");
            Params::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let mut params = load_params();
    let mut mode = Mode::Genesis;
    let mut ui_state = ui::UIState::new();
    let mut presentation = Presentation::new();
    let mut tick_accumulator = 0.0f32;

    info!("Starting flappy evo");

    loop {
        let mut next_mode = None;

        match &mut mode {
            Mode::Genesis => match ui::draw_genesis_screen(&mut params) {
                Some(ui::StartMode::Train) => match TrainingSession::new(&params) {
                    Ok(session) => {
                        ui_state.reset();
                        next_mode = Some(Mode::Training(session));
                    }
                    Err(err) => warn!(error = %err, "cannot start training"),
                },
                Some(ui::StartMode::Play) => {
                    next_mode = Some(Mode::Play(PlaySession::new(&params)));
                }
                None => {}
            },

            Mode::Training(session) => {
                if !ui_state.paused && session.stopped.is_none() {
                    let started = Instant::now();
                    let ticks = due_ticks(
                        &mut tick_accumulator,
                        params.frame_rate as f32 * ui_state.simulation_speed as f32,
                    );

                    for _ in 0..ticks {
                        match session.step() {
                            Ok(Some(summary)) => {
                                ui_state.record_generation(&summary);
                                presentation.clear();
                            }
                            Ok(None) => {}
                            Err(err) => {
                                warn!(error = %err, "training step failed");
                                ui_state.status_message = Some(err.to_string());
                                session.stopped = Some(StopReason::Cancelled);
                            }
                        }
                        if session.stopped.is_some() {
                            break;
                        }
                        if ui_state.rendering_enabled {
                            if let Some(snapshot) = session.snapshot() {
                                presentation.update(&snapshot);
                            }
                        }
                    }

                    if ticks > 0 {
                        let elapsed = started.elapsed().as_secs_f32();
                        ui_state.last_step_time_ms = elapsed * 1000.0 / ticks as f32;
                    }
                    let frame_time = get_frame_time();
                    if frame_time > 0.0 {
                        ui_state.actual_ticks_per_sec = ticks as f32 / frame_time;
                    }
                }

                if let Some(reason) = session.stopped {
                    if ui_state.status_message.is_none() {
                        let best = session.population.best_fitness().unwrap_or(0.0);
                        ui_state.status_message =
                            Some(format!("Training stopped ({:?}), best fitness {:.1}", reason, best));
                    }
                }

                if let Some(snapshot) = session.snapshot() {
                    if ui_state.rendering_enabled {
                        graphics::draw_world(&snapshot, &presentation, &params);
                        graphics::draw_counters(&snapshot);
                    } else {
                        clear_background(DARKGRAY);
                    }
                    ui::draw_ui(&mut ui_state, &snapshot, &params);
                    ui::process_egui();
                }

                if ui_state.save_requested {
                    ui_state.save_requested = false;
                    ui_state.status_message = Some(match params.save_to_file(CONFIG_PATH) {
                        Ok(()) => format!("Saved configuration to {}", CONFIG_PATH),
                        Err(err) => format!("Save failed: {}", err),
                    });
                }

                if ui_state.reset_requested {
                    ui_state.reset_requested = false;
                    presentation.clear();
                    next_mode = Some(Mode::Genesis);
                }
            }

            Mode::Play(session) => {
                session.flap_pending |=
                    is_key_pressed(KeyCode::Space) || is_mouse_button_pressed(MouseButton::Left);

                if session.environment.is_running() {
                    let ticks = due_ticks(&mut tick_accumulator, params.frame_rate as f32);
                    for _ in 0..ticks {
                        session.step();
                        presentation.update(&Snapshot::capture(&session.environment));
                    }
                } else if is_key_pressed(KeyCode::R) {
                    presentation.clear();
                    *session = PlaySession::new(&params);
                }

                let snapshot = Snapshot::capture(&session.environment);
                graphics::draw_world(&snapshot, &presentation, &params);

                if !session.environment.is_running() {
                    let text = "Game over - press R to restart";
                    let text_size = measure_text(text, None, 30, 1.0);
                    draw_text(
                        text,
                        screen_width() / 2. - text_size.width / 2.,
                        screen_height() / 2.,
                        30.0,
                        WHITE,
                    );
                }
            }
        }

        if is_key_pressed(KeyCode::Escape) && !matches!(mode, Mode::Genesis) {
            presentation.clear();
            next_mode = Some(Mode::Genesis);
        }

        if let Some(next) = next_mode {
            tick_accumulator = 0.0;
            mode = next;
        }

        next_frame().await
    }
}
