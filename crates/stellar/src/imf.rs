//! Initial mass functions.

use rand::Rng;
use rand_chacha::ChaChaRng;
use units::Mass;

use crate::sampling::{power_law_integral, sample_power_law};

/// Draws progenitor masses from an initial mass function.
pub trait InitialMassFunction: Send + Sync {
    fn draw_mass(&self, rng: &mut ChaChaRng) -> Mass;
}

/// Single-slope power law p(M) ∝ M^α on [min, max].
///
/// The default is Salpeter (α = -2.35) restricted to the 0.6–7 M☉ range of
/// progenitors that can leave a white dwarf within a Hubble time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawImf {
    pub min_mass: f64,
    pub max_mass: f64,
    pub exponent: f64,
}

impl PowerLawImf {
    pub fn new(min_mass: Mass, max_mass: Mass, exponent: f64) -> Self {
        Self {
            min_mass: min_mass.to_solar_masses(),
            max_mass: max_mass.to_solar_masses(),
            exponent,
        }
    }

    pub fn salpeter() -> Self {
        Self {
            min_mass: 0.6,
            max_mass: 7.0,
            exponent: -2.35,
        }
    }
}

impl Default for PowerLawImf {
    fn default() -> Self {
        Self::salpeter()
    }
}

impl InitialMassFunction for PowerLawImf {
    fn draw_mass(&self, rng: &mut ChaChaRng) -> Mass {
        Mass::from_solar_masses(sample_power_law(
            self.min_mass,
            self.max_mass,
            self.exponent,
            rng,
        ))
    }
}

/// Kroupa (2001) broken power law
///
/// - M < 0.5 M☉: α = -1.3
/// - M ≥ 0.5 M☉: α = -2.3
///
/// The two segments join continuously at 0.5 M☉; segment probabilities are
/// the integrals of each piece over the requested mass range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KroupaImf {
    pub min_mass: f64,
    pub max_mass: f64,
}

impl KroupaImf {
    const BREAK_MASS: f64 = 0.5;
    const LOW_SLOPE: f64 = -1.3;
    const HIGH_SLOPE: f64 = -2.3;

    pub fn new(min_mass: Mass, max_mass: Mass) -> Self {
        Self {
            min_mass: min_mass.to_solar_masses(),
            max_mass: max_mass.to_solar_masses(),
        }
    }

    /// Probability that a draw falls below the break mass.
    fn low_segment_probability(&self) -> f64 {
        if self.min_mass >= Self::BREAK_MASS {
            return 0.0;
        }
        if self.max_mass <= Self::BREAK_MASS {
            return 1.0;
        }
        let low = power_law_integral(self.min_mass, Self::BREAK_MASS, Self::LOW_SLOPE);
        // Continuity at the break: k_high = k_low × M_break^(α_low - α_high)
        let k_high = Self::BREAK_MASS.powf(Self::LOW_SLOPE - Self::HIGH_SLOPE);
        let high = k_high * power_law_integral(Self::BREAK_MASS, self.max_mass, Self::HIGH_SLOPE);
        low / (low + high)
    }
}

impl InitialMassFunction for KroupaImf {
    fn draw_mass(&self, rng: &mut ChaChaRng) -> Mass {
        let p_low = self.low_segment_probability();
        let mass = if rng.random::<f64>() < p_low {
            sample_power_law(
                self.min_mass,
                self.max_mass.min(Self::BREAK_MASS),
                Self::LOW_SLOPE,
                rng,
            )
        } else {
            sample_power_law(
                self.min_mass.max(Self::BREAK_MASS),
                self.max_mass,
                Self::HIGH_SLOPE,
                rng,
            )
        };
        Mass::from_solar_masses(mass)
    }
}
