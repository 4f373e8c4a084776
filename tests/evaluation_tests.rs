#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::sync::atomic::AtomicBool;

use flappy_evo::simulation::environment::EndReason;
use flappy_evo::simulation::error::SimulationError;
use flappy_evo::simulation::evaluation::{
    Controller, ControllerProvider, Generation, GenerationReport, GenerationStatus,
    GenerationSummary, Observation, Pacing, StopReason, decide, generation_rng, stop_after, train,
};
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::pipe::Pipe;
use flappy_evo::simulation::rng::create_rng;

fn create_test_params() -> Params {
    Params {
        population_size: 3,
        generations: 3,
        fitness_threshold: None,
        rng_seed: Some(5),
        ..Params::default()
    }
}

#[derive(Debug, Clone)]
struct Constant(f32);

impl Controller for Constant {
    fn activate(&self, _observation: &Observation) -> f32 {
        self.0
    }
}

/// Jumps when below the gap or when its lower edge nears the bottom pipe.
#[derive(Debug, Clone)]
struct GapSeeker;

impl Controller for GapSeeker {
    fn activate(&self, observation: &Observation) -> f32 {
        let below_gap = observation.top_distance - observation.bottom_distance >= 199.0;
        let bottom_pipe = observation.y + observation.bottom_distance;
        if below_gap || observation.y + 48.0 > bottom_pipe - 40.0 {
            1.0
        } else {
            -1.0
        }
    }
}

struct FixedProvider {
    controllers: Vec<Constant>,
    reports: Vec<(u32, Vec<f32>)>,
}

impl ControllerProvider for FixedProvider {
    type Controller = Constant;

    fn controllers(&mut self, _generation: u32) -> Vec<Constant> {
        self.controllers.clone()
    }

    fn report(&mut self, report: GenerationReport<Constant>) {
        self.reports.push((report.generation, report.fitness()));
    }
}

fn play(controllers: Vec<Constant>, params: &Params) -> GenerationReport<Constant> {
    Generation::new(1, controllers, params, create_rng(3))
        .expect("non-empty population")
        .run_to_end()
}

#[test]
fn test_decide_threshold_and_non_finite_outputs() {
    assert!(decide(0.6, 0.5));
    assert!(!decide(0.5, 0.5));
    assert!(!decide(-1.0, 0.5));
    assert!(!decide(f32::NAN, 0.5));
    assert!(!decide(f32::INFINITY, 0.5));
}

#[test]
fn test_never_jumping_bird_hits_the_ground() {
    let params = create_test_params();

    let report = play(vec![Constant(-1.0)], &params);

    assert_eq!(report.end, EndReason::Extinct);
    assert_eq!(report.ticks, 23);
    assert_eq!(report.score, 0);
    // survival only, leaving through the ground costs nothing
    assert!((report.evaluated[0].fitness - 2.3).abs() < 1e-4);
}

#[test]
fn test_always_jumping_bird_leaves_through_the_ceiling() {
    let params = create_test_params();

    let report = play(vec![Constant(1.0)], &params);

    // the first jump only takes effect on the second tick
    assert_eq!(report.end, EndReason::Extinct);
    assert_eq!(report.ticks, 33);
    assert_eq!(report.score, 0);
    assert!((report.evaluated[0].fitness - 3.3).abs() < 1e-4);
}

#[test]
fn test_nan_output_behaves_like_no_jump() {
    let params = create_test_params();

    let report = play(vec![Constant(f32::NAN)], &params);

    assert_eq!(report.ticks, 23);
}

#[test]
fn test_identical_controllers_get_identical_fitness() {
    let params = create_test_params();

    let report = play(vec![Constant(0.0); 4], &params);
    let fitness = report.fitness();

    assert_eq!(report.end, EndReason::Extinct);
    assert_eq!(fitness.len(), 4);
    assert!(fitness.iter().all(|&f| f == fitness[0]));
}

#[test]
fn test_fitness_reported_in_controller_order() {
    let params = create_test_params();

    let report = play(vec![Constant(1.0), Constant(-1.0)], &params);
    let fitness = report.fitness();

    assert!(fitness[0] > fitness[1]);
    let summary = report.summary();
    assert_eq!(summary.population, 2);
    assert_eq!(summary.best_fitness, fitness[0]);
    assert!((summary.mean_fitness - (fitness[0] + fitness[1]) / 2.0).abs() < 1e-5);
}

#[test]
fn test_step_reports_finish_once_extinct() {
    let params = create_test_params();
    let mut generation = Generation::new(7, vec![Constant(-1.0)], &params, create_rng(1))
        .expect("non-empty population");

    let mut steps = 0;
    while generation.step() == GenerationStatus::Running {
        steps += 1;
        assert!(generation.max_live_fitness().is_some());
    }

    assert_eq!(steps, 22);
    assert!(generation.is_finished());
    assert_eq!(
        generation.step(),
        GenerationStatus::Finished(EndReason::Extinct)
    );
    assert_eq!(generation.environment().ticks, 23);
    assert_eq!(generation.snapshot().generation, Some(7));
    assert_eq!(generation.number(), 7);
}

#[test]
fn test_empty_population_is_an_error() {
    let params = create_test_params();

    let result = Generation::<Constant>::new(1, Vec::new(), &params, create_rng(1));

    assert!(matches!(result, Err(SimulationError::EmptyPopulation)));
}

#[test]
fn test_cancelled_generation_stops_immediately() {
    let params = create_test_params();
    let generation = Generation::new(1, vec![Constant(-1.0)], &params, create_rng(1))
        .expect("non-empty population");

    let report = generation.run(&AtomicBool::new(true), Pacing::Unthrottled);

    assert_eq!(report.end, EndReason::Cancelled);
    assert_eq!(report.ticks, 0);
    assert_eq!(report.fitness(), vec![0.0]);
}

#[test]
fn test_pacing_tick_duration() {
    assert_eq!(Pacing::Unthrottled.tick_duration(), None);
    assert_eq!(
        Pacing::Fixed { frame_rate: 50 }.tick_duration(),
        Some(std::time::Duration::from_millis(20))
    );
}

fn staged(birds_y: &[f32], pipes: Vec<Pipe>, params: &Params) -> Generation<Constant> {
    let mut generation = Generation::new(
        1,
        vec![Constant(-1.0); birds_y.len()],
        params,
        create_rng(8),
    )
    .expect("non-empty population");
    let environment = generation.environment_mut();
    environment.pipes = pipes;
    for (bird, &y) in environment.birds.iter_mut().zip(birds_y) {
        bird.y = y;
    }
    generation
}

fn assert_fitness(generation: &Generation<Constant>, expected: &[f32]) {
    let fitness: Vec<f32> = generation.records().iter().map(|r| r.fitness).collect();
    assert_eq!(fitness.len(), expected.len());
    for (actual, expected) in fitness.iter().zip(expected) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "fitness {:?}, expected {:?}",
            fitness,
            expected
        );
    }
}

#[test]
fn test_collision_costs_penalty_and_survivor_gets_pass_reward() {
    let params = create_test_params();
    // the first pipe is crossed but lies left of every bird, the second one
    // blocks bird 1 with its top part
    let pipes = vec![
        Pipe::with_height(125.0, 300.0, &params),
        Pipe::with_height(240.0, 300.0, &params),
    ];
    let mut generation = staged(&[350.0, 200.0], pipes, &params);

    assert_eq!(generation.step(), GenerationStatus::Running);

    let environment = generation.environment();
    assert_eq!(environment.score, 1);
    assert!(environment.birds[0].is_alive());
    assert!(!environment.birds[1].is_alive());
    assert_fitness(
        &generation,
        &[
            params.survival_reward + params.pass_reward,
            params.survival_reward - params.collision_penalty,
        ],
    );
}

#[test]
fn test_bird_leaving_on_scoring_tick_keeps_pass_reward() {
    let params = create_test_params();
    let pipes = vec![Pipe::with_height(125.0, 300.0, &params)];
    let mut generation = staged(&[350.0, 690.0], pipes, &params);

    assert_eq!(generation.step(), GenerationStatus::Running);

    let environment = generation.environment();
    assert_eq!(environment.score, 1);
    assert!(!environment.birds[1].is_alive());
    let expected = params.survival_reward + params.pass_reward;
    assert_fitness(&generation, &[expected, expected]);
}

#[test]
fn test_every_pass_pays_the_same_reward() {
    let params = create_test_params();
    let pipes = vec![Pipe::with_height(125.0, 300.0, &params)];
    let mut generation = staged(&[350.0, 350.0, 350.0], pipes, &params);

    generation.step();
    let after_pass: Vec<f32> = generation.records().iter().map(|r| r.fitness).collect();
    generation.step();

    for (record, before) in generation.records().iter().zip(&after_pass) {
        assert!((before - (params.survival_reward + params.pass_reward)).abs() < 1e-5);
        // no pipe passed on the second tick
        assert!((record.fitness - before - params.survival_reward).abs() < 1e-5);
    }
}

#[test]
fn test_gap_seeker_reaches_score_limit() {
    let params = create_test_params();

    let report = Generation::new(1, vec![GapSeeker, GapSeeker], &params, create_rng(21))
        .expect("non-empty population")
        .run_to_end();

    assert_eq!(report.end, EndReason::ScoreLimit);
    assert_eq!(report.score, 21);
    let fitness = report.fitness();
    assert_eq!(fitness[0], fitness[1]);
    let expected = report.ticks as f32 * params.survival_reward + 21.0 * params.pass_reward;
    assert!((fitness[0] - expected).abs() < 0.1, "fitness {}", fitness[0]);
}

#[test]
fn test_train_runs_all_generations_in_order() {
    let params = create_test_params();
    let mut provider = FixedProvider {
        controllers: vec![Constant(-1.0); 3],
        reports: Vec::new(),
    };

    let summary = train(&mut provider, &params, &AtomicBool::new(false), |_| {})
        .expect("valid parameters");

    assert_eq!(summary.stopped, StopReason::GenerationLimit);
    let numbers: Vec<u32> = summary.generations.iter().map(|g| g.generation).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(provider.reports.len(), 3);
    assert_eq!(provider.reports[0].0, 1);
    assert_eq!(provider.reports[0].1.len(), 3);
}

#[test]
fn test_train_stops_at_fitness_threshold() {
    let params = Params {
        fitness_threshold: Some(2.0),
        ..create_test_params()
    };
    let mut provider = FixedProvider {
        controllers: vec![Constant(-1.0)],
        reports: Vec::new(),
    };
    let mut seen = Vec::new();

    let summary = train(&mut provider, &params, &AtomicBool::new(false), |g| {
        seen.push(g.generation);
    })
    .expect("valid parameters");

    assert_eq!(summary.stopped, StopReason::FitnessThreshold);
    assert_eq!(seen, vec![1]);
    assert!(summary.best_fitness().is_some_and(|best| best >= 2.0));
}

#[test]
fn test_train_cancelled_reports_nothing() {
    let params = create_test_params();
    let mut provider = FixedProvider {
        controllers: vec![Constant(-1.0)],
        reports: Vec::new(),
    };

    let summary = train(&mut provider, &params, &AtomicBool::new(true), |_| {})
        .expect("valid parameters");

    assert_eq!(summary.stopped, StopReason::Cancelled);
    assert!(summary.generations.is_empty());
    assert!(provider.reports.is_empty());
}

#[test]
fn test_train_rejects_invalid_params() {
    let params = Params {
        gap_min: 500,
        ..create_test_params()
    };
    let mut provider = FixedProvider {
        controllers: vec![Constant(-1.0)],
        reports: Vec::new(),
    };

    let result = train(&mut provider, &params, &AtomicBool::new(false), |_| {});

    assert!(matches!(result, Err(SimulationError::Config(_))));
}

fn summary_of(generation: u32, best_fitness: f32) -> GenerationSummary {
    GenerationSummary {
        generation,
        ticks: 10,
        score: 0,
        end: EndReason::Extinct,
        population: 3,
        best_fitness,
        mean_fitness: best_fitness,
    }
}

#[test]
fn test_stop_after_prefers_fitness_threshold() {
    let params = Params {
        fitness_threshold: Some(50.0),
        ..create_test_params()
    };

    assert_eq!(stop_after(&params, &summary_of(1, 10.0)), None);
    assert_eq!(
        stop_after(&params, &summary_of(1, 50.0)),
        Some(StopReason::FitnessThreshold)
    );
    assert_eq!(
        stop_after(&params, &summary_of(3, 10.0)),
        Some(StopReason::GenerationLimit)
    );
    assert_eq!(
        stop_after(&params, &summary_of(3, 60.0)),
        Some(StopReason::FitnessThreshold)
    );
}

#[test]
fn test_seeded_generations_replay_the_same_pipes() {
    let params = create_test_params();
    let pipe_heights = |number: u32| {
        let generation = Generation::new(
            number,
            vec![Constant(-1.0)],
            &params,
            generation_rng(&params, number),
        )
        .expect("non-empty population");
        generation.environment().pipes[0].height
    };

    assert_eq!(pipe_heights(2), pipe_heights(2));
    let heights: Vec<f32> = (1..=5).map(pipe_heights).collect();
    assert!(heights.windows(2).any(|w| w[0] != w[1]));
}
