use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Million years in regular years
pub const MYR_TO_YEARS: f64 = 1.0e6;

/// Billion years in regular years
pub const GYR_TO_YEARS: f64 = 1.0e9;

/// A time interval or lookback time using f64 precision.
///
/// Years are the base unit. Stellar ages, pre-white-dwarf lifetimes and
/// cooling ages all span 10⁶–10¹⁰ yr, so the Myr/Gyr constructors are the
/// usual entry points.
///
/// # Examples
///
/// ```rust
/// use units::Time;
///
/// let formed = Time::from_gyr(8.0);
/// let lifetime = Time::from_myr(350.0);
/// let cooling = formed - lifetime;
///
/// assert!(cooling.to_gyr() > 7.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(f64); // Base unit: Years

impl Time {
    /// Creates a zero time value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Time` from a value in years.
    pub fn from_years(value: f64) -> Self {
        Self(value)
    }

    /// Creates a time from a value in million years (Myr)
    pub fn from_myr(value: f64) -> Self {
        Self(value * MYR_TO_YEARS)
    }

    /// Creates a time from a value in billion years (Gyr)
    pub fn from_gyr(value: f64) -> Self {
        Self(value * GYR_TO_YEARS)
    }

    /// Returns the time in years.
    pub fn to_years(&self) -> f64 {
        self.0
    }

    /// Returns the time in billion years
    pub fn to_gyr(&self) -> f64 {
        self.0 / GYR_TO_YEARS
    }

    /// True for a finite, strictly positive interval.
    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    pub fn max(self, other: Time) -> Time {
        Time(self.0.max(other.0))
    }

    pub fn min(self, other: Time) -> Time {
        Time(self.0.min(other.0))
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Mul<f64> for Time {
    type Output = Time;

    fn mul(self, rhs: f64) -> Time {
        Time(self.0 * rhs)
    }
}

impl Div<f64> for Time {
    type Output = Time;

    fn div(self, rhs: f64) -> Time {
        Time(self.0 / rhs)
    }
}

/// Ratio of two times is dimensionless
impl Div for Time {
    type Output = f64;

    fn div(self, rhs: Time) -> f64 {
        self.0 / rhs.0
    }
}
