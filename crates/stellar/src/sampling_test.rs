use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::sampling::{
    power_law_integral, sample_gaussian, sample_positive_gaussian, sample_power_law,
};

#[test]
fn sample_gaussian_produces_reasonable_values() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    let samples: Vec<f64> = (0..2000)
        .map(|_| sample_gaussian(&mut rng, 5.0, 1.0))
        .collect();
    let mean: f64 = samples.iter().sum::<f64>() / samples.len() as f64;
    let variance: f64 =
        samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

    assert!((mean - 5.0).abs() < 0.1, "Mean {} should be close to 5.0", mean);
    assert!(
        (variance.sqrt() - 1.0).abs() < 0.1,
        "Std dev {} should be close to 1.0",
        variance.sqrt()
    );
    assert!(samples.iter().all(|x| x.is_finite()));
}

#[test]
fn positive_gaussian_never_returns_non_positive() {
    let mut rng = ChaChaRng::seed_from_u64(7);

    // Mean one sigma above zero: ~16% of raw draws would be rejected
    for _ in 0..5000 {
        let z = sample_positive_gaussian(&mut rng, 0.01, 0.01).expect("positive mass");
        assert!(z > 0.0, "Draw {} must be strictly positive", z);
    }
}

#[test]
fn positive_gaussian_with_zero_sigma_is_the_mean() {
    let mut rng = ChaChaRng::seed_from_u64(1);
    assert_eq!(sample_positive_gaussian(&mut rng, 0.3, 0.0), Some(0.3));
    assert_eq!(sample_positive_gaussian(&mut rng, -0.3, 0.0), None);
}

#[test]
fn positive_gaussian_gives_up_without_positive_mass() {
    let mut rng = ChaChaRng::seed_from_u64(3);
    assert_eq!(sample_positive_gaussian(&mut rng, -100.0, 1.0), None);
}

#[test]
fn sample_power_law_respects_bounds() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    for _ in 0..500 {
        let sample = sample_power_law(0.6, 7.0, -2.35, &mut rng);
        assert!((0.6..=7.0).contains(&sample), "Sample {} out of range", sample);
    }
}

#[test]
fn sample_power_law_handles_logarithmic_exponent() {
    let mut rng = ChaChaRng::seed_from_u64(11);

    for _ in 0..500 {
        let sample = sample_power_law(1.0, 10.0, -1.0, &mut rng);
        assert!((1.0..=10.0).contains(&sample));
    }
}

#[test]
fn power_law_integral_matches_closed_forms() {
    assert_relative_eq!(power_law_integral(1.0, 2.0, 0.0), 1.0);
    assert_relative_eq!(power_law_integral(1.0, 2.0, 1.0), 1.5);
    assert_relative_eq!(power_law_integral(1.0, std::f64::consts::E, -1.0), 1.0);
}
