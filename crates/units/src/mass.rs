use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A stellar mass using f64 precision.
///
/// Solar masses are the base unit: progenitor masses live in 0.6–8 M☉ and
/// white-dwarf masses in 0.5–1.3 M☉.
///
/// ```rust
/// use units::Mass;
///
/// let progenitor = Mass::from_solar_masses(2.0);
/// assert_eq!(progenitor.to_solar_masses(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: Solar Masses

impl Mass {
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in solar masses.
    pub fn from_solar_masses(value: f64) -> Self {
        Self(value)
    }

    /// Returns the mass in solar masses.
    pub fn to_solar_masses(&self) -> f64 {
        self.0
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}
