use stellar::Filter;

use crate::config::{InversionConfig, load_json};
use crate::convergence::FitStrategy;
use crate::error::{ConfigError, InversionError};

#[test]
fn defaults_are_valid() {
    let config = InversionConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.fit_strategy, FitStrategy::SlidingLinear);
    assert_eq!(config.filter, Filter::V);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let config: InversionConfig = serde_json::from_str(
        r#"{ "wdPerBin": 250, "fitStrategy": "powerLaw", "filter": "g", "hydrogenFraction": 1.0 }"#,
    )
    .expect("valid config json");

    assert_eq!(config.wd_per_bin, 250);
    assert_eq!(config.fit_strategy, FitStrategy::PowerLaw);
    assert_eq!(config.filter, Filter::G);
    assert_eq!(config.hydrogen_fraction, 1.0);
    assert_eq!(config.max_iterations, InversionConfig::default().max_iterations);
    assert!(config.validate().is_ok());
}

#[test]
fn hydrogen_fraction_outside_unit_interval_is_rejected() {
    let config = InversionConfig {
        hydrogen_fraction: 1.2,
        ..InversionConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange {
            name: "hydrogenFraction",
            ..
        })
    ));
}

#[test]
fn iteration_bounds_must_be_ordered() {
    let config = InversionConfig {
        min_iterations: 10,
        max_iterations: 5,
        ..InversionConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange {
            name: "maxIterations",
            ..
        })
    ));
}

#[test]
fn draw_budget_must_cover_the_target() {
    let config = InversionConfig {
        wd_per_bin: 500,
        max_draws_per_bin: 100,
        ..InversionConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn nan_threshold_is_rejected() {
    let config = InversionConfig {
        convergence_threshold: f64::NAN,
        ..InversionConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn missing_file_reports_its_path() {
    let err = load_json::<InversionConfig>("/nonexistent/wdlf/config.json").unwrap_err();
    assert!(matches!(err, InversionError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/wdlf/config.json"));
}
