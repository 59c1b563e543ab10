use serde::Serialize;
use stellar::Atmosphere;
use units::{Mass, Time};

/// One simulated white dwarf standing in for `weight` real stars.
///
/// Created by the generator for a single iteration and discarded with its
/// arena at the end of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub progenitor_mass: Mass,
    /// Metallicity Z (mass fraction)
    pub metallicity: f64,
    /// Helium mass fraction Y
    pub helium: f64,
    pub pre_wd_lifetime: Time,
    /// Lookback time of formation
    pub total_age: Time,
    pub white_dwarf_mass: Mass,
    pub atmosphere: Atmosphere,
    /// Absolute magnitude including observational noise
    pub magnitude: f64,
    /// Cooling model was queried outside its calibrated range
    pub extrapolated: bool,
    /// Magnitude falls inside the observed luminosity function
    pub observed: bool,
    /// Expected number of real stars represented
    pub weight: f64,
    pub weight_variance: f64,
    /// Set once the particle's weight has been rescaled this iteration
    pub rescaled: bool,
    /// Index of the lookback-time bin the particle was drawn in
    pub lookback_bin: usize,
}

impl Particle {
    /// Time since the star became a white dwarf, if it has become one.
    pub fn cooling_age(&self) -> Option<Time> {
        (self.total_age > self.pre_wd_lifetime).then(|| self.total_age - self.pre_wd_lifetime)
    }

    /// Rescale the weight by `scale ± sigma_scale`, propagating the variance.
    pub fn apply_scale(&mut self, scale: f64, sigma_scale: f64) {
        let (weight, variance) =
            propagate_weight(self.weight, self.weight_variance, scale, sigma_scale);
        self.weight = weight;
        self.weight_variance = variance;
    }
}

/// Scale a weight and its variance by an uncertain factor.
///
/// The weight and the scale factor are treated as independent:
///
/// σ²' = w² σ_s² + s² σ²,  w' = s w
///
/// The variance uses the weight before scaling.
pub fn propagate_weight(weight: f64, variance: f64, scale: f64, sigma_scale: f64) -> (f64, f64) {
    let new_variance = weight * weight * sigma_scale * sigma_scale + scale * scale * variance;
    (scale * weight, new_variance)
}
