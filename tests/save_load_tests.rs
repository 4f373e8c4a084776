#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use flappy_evo::simulation::brain::Brain;
use flappy_evo::simulation::error::SimulationError;
use flappy_evo::simulation::params::Params;
use flappy_evo::simulation::rng::create_weight_rng;
use std::fs;

fn create_test_params() -> Params {
    Params {
        population_size: 80,
        layer_sizes: vec![3, 8, 4, 1],
        pipe_gap: 180.0,
        early_stop_score: None,
        rng_seed: Some(1234),
        ..Params::default()
    }
}

fn path_in(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn test_default_params_are_valid() {
    assert!(Params::default().validate().is_ok());
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let save_path = path_in(&dir, "params.json");
    let params = create_test_params();

    params.save_to_file(&save_path).expect("Failed to save params");
    let loaded = Params::load_from_file(&save_path).expect("Failed to load params");

    assert_eq!(loaded, params);
    assert_eq!(loaded.layer_sizes, vec![3, 8, 4, 1]);
    assert_eq!(loaded.early_stop_score, None);
    assert_eq!(loaded.rng_seed, Some(1234));
}

#[test]
fn test_missing_fields_take_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let save_path = path_in(&dir, "partial.json");
    fs::write(&save_path, r#"{ "population_size": 12, "pipe_speed": 7.0 }"#)
        .expect("Failed to write config");

    let loaded = Params::load_from_file(&save_path).expect("Failed to load params");

    assert_eq!(loaded.population_size, 12);
    assert_eq!(loaded.pipe_speed, 7.0);
    assert_eq!(loaded.pipe_gap, Params::default().pipe_gap);
    assert_eq!(loaded.ground_y, 730.0);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let save_path = path_in(&dir, "invalid.json");
    fs::write(&save_path, r#"{ "gap_min": 400, "gap_max": 100 }"#)
        .expect("Failed to write config");

    let result = Params::load_from_file(&save_path);

    match result {
        Err(SimulationError::Config(err)) => assert_eq!(err.field, "gap_min"),
        other => panic!("expected a config error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_json_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let save_path = path_in(&dir, "broken.json");
    fs::write(&save_path, "{ not json").expect("Failed to write config");

    assert!(matches!(
        Params::load_from_file(&save_path),
        Err(SimulationError::Json(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let save_path = path_in(&dir, "absent.json");

    assert!(matches!(
        Params::load_from_file(&save_path),
        Err(SimulationError::Io(_))
    ));
}

#[test]
fn test_validation_errors_name_the_field() {
    let cases = [
        (
            Params {
                population_size: 0,
                ..Params::default()
            },
            "population_size",
        ),
        (
            Params {
                layer_sizes: vec![2, 1],
                ..Params::default()
            },
            "layer_sizes",
        ),
        (
            Params {
                elite_count: 100,
                ..Params::default()
            },
            "elite_count",
        ),
        (
            Params {
                ground_y: -1.0,
                ..Params::default()
            },
            "ground_y",
        ),
        (
            Params {
                mutation_scale_min: 0.9,
                ..Params::default()
            },
            "mutation_scale_min",
        ),
        (
            Params {
                survival_fraction: 0.0,
                ..Params::default()
            },
            "survival_fraction",
        ),
        (
            Params {
                frame_rate: 0,
                ..Params::default()
            },
            "frame_rate",
        ),
    ];

    for (params, field) in cases {
        let err = params.validate().expect_err("params should be rejected");
        assert_eq!(err.field, field);
        assert!(err.to_string().contains(field));
    }
}

#[test]
fn test_brain_survives_json_round_trip() {
    let brain = Brain::new(&[3, 6, 1], 1.0, &mut create_weight_rng(6));

    let json = serde_json::to_string(&brain).expect("Failed to encode brain");
    let loaded: Brain = serde_json::from_str(&json).expect("Failed to decode brain");

    assert_eq!(loaded.architecture(), brain.architecture());
    for (a, b) in loaded.layers.iter().zip(&brain.layers) {
        for (x, y) in a.weights.iter().zip(b.weights.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
        for (x, y) in a.biases.iter().zip(b.biases.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}
