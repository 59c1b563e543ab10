use units::Time;

use crate::config::InversionConfig;
use crate::controller::{InversionController, Phase, Termination, termination_for};
use crate::error::ConfigError;
use crate::generator::StellarPhysics;
use crate::luminosity_function::ObservedLuminosityFunction;
use crate::sfr::BinnedSfr;

fn observed() -> ObservedLuminosityFunction {
    let centers: Vec<f64> = (0..8).map(|i| 9.5 + i as f64).collect();
    ObservedLuminosityFunction::new(centers, vec![1.0; 8], vec![1.0e8; 8], vec![1.0e7; 8]).unwrap()
}

fn small_config(min_iterations: usize, max_iterations: usize) -> InversionConfig {
    InversionConfig {
        wd_per_bin: 50,
        min_iterations,
        max_iterations,
        convergence_threshold: 1e-12,
        ..InversionConfig::default()
    }
}

fn controller(config: &InversionConfig) -> InversionController {
    let initial = BinnedSfr::flat(Time::from_gyr(10.0), 3, 1.0).unwrap();
    InversionController::new(config, observed(), initial, StellarPhysics::reference()).unwrap()
}

#[test]
fn convergence_never_ends_the_run_before_the_minimum() {
    assert_eq!(termination_for(1, 3, 25, true), None);
    assert_eq!(termination_for(2, 3, 25, true), None);
    assert_eq!(termination_for(3, 3, 25, true), Some(Termination::Converged));
    assert_eq!(termination_for(10, 3, 25, false), None);
}

#[test]
fn iteration_limit_ends_the_run() {
    assert_eq!(
        termination_for(25, 3, 25, false),
        Some(Termination::IterationLimitReached)
    );
    // Convergence on the last allowed iteration still counts
    assert_eq!(termination_for(25, 3, 25, true), Some(Termination::Converged));
}

#[test]
fn exit_codes_follow_termination() {
    assert_eq!(Termination::Converged.exit_code(), 0);
    assert_eq!(Termination::IterationLimitReached.exit_code(), 1);
    assert_eq!(Termination::Stopped.exit_code(), 1);
}

#[test]
fn run_stops_at_the_iteration_limit() {
    let mut controller = controller(&small_config(2, 2));
    let mut seen = Vec::new();

    let outcome = controller.run_with_observer(|report| {
        seen.push(report.iteration);
        assert_eq!(report.model_lf.density.len(), 8);
        assert_eq!(report.outcomes.len(), 3);
    });

    assert_eq!(seen, vec![1, 2]);
    assert_eq!(outcome.iterations, 2);
    assert_eq!(outcome.chi_square_history.len(), 2);
    assert_eq!(outcome.termination, Termination::IterationLimitReached);
    assert_eq!(
        controller.phase(),
        Phase::Finished(Termination::IterationLimitReached)
    );
    assert!(controller.step().is_none());
}

#[test]
fn updated_model_becomes_current() {
    let mut controller = controller(&small_config(3, 5));
    assert_eq!(controller.phase(), Phase::Init);

    let report = controller.step().unwrap();

    assert_eq!(controller.phase(), Phase::Iterating);
    assert_eq!(controller.state().iteration_count(), 1);
    assert_eq!(controller.state().current_model(), &report.model);
    assert_eq!(controller.state().updated_model(), Some(&report.model));
    assert_eq!(controller.state().chi_square_history(), &[report.chi_square]);
}

#[test]
fn stop_handle_ends_after_current_iteration() {
    let mut controller = controller(&small_config(3, 10));
    let handle = controller.stop_handle();

    let outcome = controller.run_with_observer(|_| handle.stop());

    assert_eq!(outcome.termination, Termination::Stopped);
    assert_eq!(outcome.iterations, 1);
}

#[test]
fn stop_before_start_keeps_initial_model() {
    let mut controller = controller(&small_config(3, 10));
    controller.stop_handle().stop();

    let outcome = controller.run();

    assert_eq!(outcome.termination, Termination::Stopped);
    assert_eq!(outcome.iterations, 0);
    assert_eq!(&outcome.model, controller.state().current_model());
    assert!(outcome.model_luminosity_function.is_none());
}

#[test]
fn invalid_configuration_is_rejected_before_iterating() {
    let config = InversionConfig {
        min_iterations: 0,
        ..InversionConfig::default()
    };
    let initial = BinnedSfr::flat(Time::from_gyr(10.0), 3, 1.0).unwrap();
    let result =
        InversionController::new(&config, observed(), initial, StellarPhysics::reference());
    assert!(matches!(
        result,
        Err(ConfigError::OutOfRange {
            name: "minIterations",
            ..
        })
    ));
}

#[test]
fn zero_initial_rate_is_rejected() {
    let initial = BinnedSfr::flat(Time::from_gyr(10.0), 3, 0.0).unwrap();
    let result = InversionController::new(
        &InversionConfig::default(),
        observed(),
        initial,
        StellarPhysics::reference(),
    );
    assert!(result.is_err());
}
