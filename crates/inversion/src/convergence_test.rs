use approx::assert_relative_eq;

use crate::convergence::{ConvergenceMonitor, FitStrategy, FittedModel, MonitorState};
use crate::error::ConvergenceError;

#[test]
fn single_point_is_unconstrained() {
    let mut monitor = ConvergenceMonitor::new(FitStrategy::SlidingLinear, 0);
    assert_eq!(monitor.state(), MonitorState::Unconstrained);

    monitor.push(100.0);
    assert_eq!(monitor.state(), MonitorState::Unconstrained);
    assert_eq!(
        monitor.fitted_chi_square(1),
        Err(ConvergenceError::InsufficientHistory {
            points: 1,
            required: 2
        })
    );
    assert!(!monitor.has_converged(0.5));

    monitor.push(80.0);
    assert_eq!(monitor.state(), MonitorState::Constrained);
    assert_relative_eq!(monitor.fitted_chi_square(3).unwrap(), 60.0, epsilon = 1e-9);
}

#[test]
fn skipped_iterations_delay_the_fit() {
    let mut monitor = ConvergenceMonitor::new(FitStrategy::SlidingLinear, 2);
    for chi in [500.0, 300.0, 100.0] {
        monitor.push(chi);
    }
    assert!(!monitor.is_constrained());
    assert!(matches!(
        monitor.model(),
        Err(ConvergenceError::InsufficientHistory { points: 1, .. })
    ));

    monitor.push(90.0);
    // Only iterations 3 and 4 are fitted
    let Ok(FittedModel::Linear { slope, intercept }) = monitor.model() else {
        panic!("expected a linear fit");
    };
    assert_relative_eq!(slope, -10.0, epsilon = 1e-9);
    assert_relative_eq!(intercept, 130.0, epsilon = 1e-9);
}

#[test]
fn sliding_linear_detects_a_flattening_sequence() {
    let mut monitor = ConvergenceMonitor::new(FitStrategy::SlidingLinear, 0);
    for chi in [100.0, 80.0, 65.0, 55.0, 50.0, 48.0, 47.5] {
        monitor.push(chi);
        assert!(!monitor.has_converged(0.01), "converged early at {chi}");
    }

    // The window still sees the steep drop from 50 to 48
    monitor.push(47.4);
    assert!(!monitor.has_converged(0.01));
    monitor.push(47.3);
    assert!(!monitor.has_converged(0.01));

    monitor.push(47.3);
    assert!(monitor.has_converged(0.01));
}

#[test]
fn sliding_window_forgets_early_iterations() {
    let mut monitor = ConvergenceMonitor::new(FitStrategy::SlidingLinear, 0);
    for chi in [1000.0, 10.0, 10.0, 10.0, 10.0, 10.0] {
        monitor.push(chi);
    }
    let Ok(FittedModel::Linear { slope, intercept }) = monitor.model() else {
        panic!("expected a linear fit");
    };
    assert_relative_eq!(slope, 0.0, epsilon = 1e-9);
    assert_relative_eq!(intercept, 10.0, epsilon = 1e-9);
    assert!(monitor.has_converged(1e-6));
}

#[test]
fn power_law_recovers_exact_coefficients() {
    let mut monitor = ConvergenceMonitor::new(FitStrategy::PowerLaw, 0);
    for k in 1..=6 {
        monitor.push(50.0 * (k as f64).powf(-0.8));
    }
    let Ok(FittedModel::PowerLaw { exponent, scale }) = monitor.model() else {
        panic!("expected a power-law fit");
    };
    assert_relative_eq!(exponent, -0.8, epsilon = 1e-9);
    assert_relative_eq!(scale, 50.0, max_relative = 1e-9);

    // 1 - (6/5)^-0.8 ≈ 13.6 %
    assert!(!monitor.has_converged(0.1));
    assert!(monitor.has_converged(0.2));
}

#[test]
fn zero_chi_square_history_counts_as_converged() {
    let mut monitor = ConvergenceMonitor::new(FitStrategy::SlidingLinear, 0);
    monitor.push(0.0);
    monitor.push(0.0);
    assert!(monitor.has_converged(0.01));
}
