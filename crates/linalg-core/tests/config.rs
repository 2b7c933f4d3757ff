//! Integration tests for solver configuration and axis parsing.

use linalg_core::{Axis, SolverConfig};

#[test]
fn test_solver_config_json_round_trip() {
    let config = SolverConfig::new(1e-8, 25).with_singular_threshold(1e-9);
    let text = serde_json::to_string(&config).expect("serialize config");
    let back: SolverConfig = serde_json::from_str(&text).expect("deserialize config");
    assert_eq!(back, config);
}

#[test]
fn test_solver_config_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.eigen_tolerance, 1e-10);
    assert_eq!(config.max_sweeps, 100);
    assert_eq!(config.singular_threshold, 1e-11);
    assert_eq!(config.display_precision, 4);
}

#[test]
fn test_axis_serde_and_parsing() {
    assert_eq!(serde_json::to_string(&Axis::Col).unwrap(), "\"col\"");
    let axis: Axis = serde_json::from_str("\"row\"").unwrap();
    assert_eq!(axis, Axis::Row);
    assert_eq!("columns".parse::<Axis>().unwrap(), Axis::Col);
    assert!("diagonal".parse::<Axis>().is_err());
}
