use approx::assert_relative_eq;

use crate::error::ConfigError;
use crate::particles::{Histogram, ParticleArena, test_particle};

fn magnitude_histogram() -> Histogram {
    Histogram::new("test", &[10.25, 10.75, 11.25], &[0.5, 0.5, 0.5]).expect("valid bins")
}

// =============================================================================
// Bin assignment
// =============================================================================

#[test]
fn value_on_shared_edge_goes_to_upper_bin() {
    let hist = magnitude_histogram();

    assert_eq!(hist.bin_index(10.5), Some(1));
    assert_eq!(hist.bin_index(11.0), Some(2));
    assert_eq!(hist.bin_index(10.0), Some(0));
}

#[test]
fn upper_edge_of_last_bin_is_outside() {
    let hist = magnitude_histogram();

    assert_eq!(hist.bin_index(11.5), None);
    assert_eq!(hist.bin_index(9.999), None);
    assert_eq!(hist.bin_index(f64::NAN), None);
}

#[test]
fn edge_particle_is_counted_exactly_once() {
    let mut arena = ParticleArena::new();
    let mut hist = magnitude_histogram();

    let id = arena.push(test_particle(10.5, 5.0, 1.0));
    let landed = hist.insert(id, 10.5);

    assert_eq!(landed, Some(1));
    assert_eq!(hist.member_count(), 1);
    let containing = hist.bins().iter().filter(|b| b.contains(10.5)).count();
    assert_eq!(containing, 1);
}

#[test]
fn bins_share_boundaries() {
    let hist = Histogram::new("test", &[0.1, 0.3, 0.6], &[0.2, 0.2, 0.4]).expect("valid bins");
    let bins = hist.bins();

    for pair in bins.windows(2) {
        assert_eq!(pair[0].upper(), pair[1].lower());
    }
    let (lower, upper) = hist.range();
    assert_relative_eq!(lower, 0.0);
    assert_relative_eq!(upper, 0.8, epsilon = 1e-12);
}

// =============================================================================
// Aggregates
// =============================================================================

#[test]
fn density_and_variance_are_per_unit_width() {
    let mut arena = ParticleArena::new();
    let mut hist = magnitude_histogram();

    for (mag, weight, variance) in [(10.1, 2.0, 0.5), (10.3, 3.0, 0.25)] {
        let mut p = test_particle(mag, 5.0, weight);
        p.weight_variance = variance;
        let id = arena.push(p);
        hist.insert(id, mag);
    }

    let bin = &hist.bins()[0];
    assert_relative_eq!(bin.total_weight(&arena), 5.0);
    assert_relative_eq!(bin.density(&arena), 10.0);
    assert_relative_eq!(bin.density_variance(&arena), 0.75 / 0.25);
    assert_relative_eq!(bin.sampling_variance(&arena), 13.0);
    assert!(hist.bins()[1].is_empty());
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn rejects_gaps_between_bins() {
    let err = Histogram::new("test", &[1.0, 3.0], &[1.0, 1.0]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::NonContiguous {
            what: "test",
            index: 0
        }
    );
}

#[test]
fn rejects_non_positive_width() {
    let err = Histogram::new("test", &[1.0, 2.0], &[1.0, 0.0]).unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveWidth { index: 1, .. }));
}

#[test]
fn rejects_decreasing_centres() {
    let err = Histogram::new("test", &[2.0, 1.0], &[1.0, 1.0]).unwrap_err();
    assert!(matches!(err, ConfigError::NonMonotonic { index: 1, .. }));
}

#[test]
fn rejects_mismatched_lengths_and_empty_input() {
    let err = Histogram::new("test", &[1.0, 2.0], &[1.0]).unwrap_err();
    assert!(matches!(err, ConfigError::LengthMismatch { found: 1, .. }));

    let err = Histogram::new("test", &[], &[]).unwrap_err();
    assert_eq!(err, ConfigError::Empty { what: "test" });
}
