use std::f64::consts::PI;

use rand::Rng;
use rand_chacha::ChaChaRng;

/// Cap on resampling attempts for [`sample_positive_gaussian`].
const MAX_POSITIVE_ATTEMPTS: usize = 10_000;

/// Sample from a Gaussian (normal) distribution using Box-Muller transform
///
/// # Arguments
/// * `rng` - Random number generator
/// * `mean` - Mean of the distribution
/// * `std_dev` - Standard deviation
///
/// # Returns
/// A sample from the normal distribution N(mean, std_dev²)
pub fn sample_gaussian(rng: &mut ChaChaRng, mean: f64, std_dev: f64) -> f64 {
    // u1 in (0, 1] keeps the logarithm finite
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z
}

/// Sample a strictly positive value from N(mean, std_dev²) by rejection.
///
/// Non-positive draws are discarded and redrawn, so the result follows the
/// normal distribution truncated at zero. Returns `None` only when the
/// distribution has essentially no positive mass (mean many sigma below
/// zero) and the attempt cap is exhausted.
pub fn sample_positive_gaussian(rng: &mut ChaChaRng, mean: f64, std_dev: f64) -> Option<f64> {
    if std_dev == 0.0 {
        return (mean > 0.0).then_some(mean);
    }
    (0..MAX_POSITIVE_ATTEMPTS)
        .map(|_| sample_gaussian(rng, mean, std_dev))
        .find(|&x| x > 0.0)
}

/// Sample from a power-law distribution
///
/// Samples from p(x) ∝ x^α between x_min and x_max using inverse transform sampling.
/// The α = -1 case, where the inverse transform is logarithmic, is handled separately.
pub fn sample_power_law(x_min: f64, x_max: f64, alpha: f64, rng: &mut ChaChaRng) -> f64 {
    let u: f64 = rng.random();
    let alpha1 = alpha + 1.0;
    if alpha1.abs() < 1e-12 {
        return x_min * (x_max / x_min).powf(u);
    }
    (u * (x_max.powf(alpha1) - x_min.powf(alpha1)) + x_min.powf(alpha1)).powf(1.0 / alpha1)
}

/// Integral of x^α over [x_min, x_max].
///
/// Used to weight the segments of broken power laws.
pub fn power_law_integral(x_min: f64, x_max: f64, alpha: f64) -> f64 {
    let alpha1 = alpha + 1.0;
    if alpha1.abs() < 1e-12 {
        (x_max / x_min).ln()
    } else {
        (x_max.powf(alpha1) - x_min.powf(alpha1)) / alpha1
    }
}
