//! White-dwarf cooling: cooling age → present-day absolute magnitude.

use units::{Mass, Time};

use crate::atmosphere::{Atmosphere, Filter};

/// Absolute bolometric magnitude of the Sun
const SOLAR_MBOL: f64 = 4.74;

/// Returns the absolute magnitude of a white dwarf of the given cooling age,
/// mass and atmosphere, in the requested band.
///
/// The boolean is `true` when the query lies outside the range the model is
/// calibrated on and the magnitude is an extrapolation.
pub trait CoolingModel: Send + Sync {
    fn magnitude(
        &self,
        cooling_age: Time,
        mass: Mass,
        atmosphere: Atmosphere,
        filter: Filter,
    ) -> (f64, bool);
}

/// Mestel (1952) cooling law.
///
/// t_cool = τ × M^(5/7) × L^(-5/7), inverted to L = (t / (τ M^(5/7)))^(-7/5).
/// Helium atmospheres are more transparent and cool faster, modelled as a
/// shorter effective τ. Band magnitudes apply a constant bolometric
/// correction per filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MestelCooling {
    pub timescale: Time,
    pub helium_speedup: f64,
    pub min_age: Time,
    pub max_age: Time,
    pub min_mass: f64,
    pub max_mass: f64,
}

impl Default for MestelCooling {
    fn default() -> Self {
        Self {
            timescale: Time::from_myr(8.8),
            helium_speedup: 0.85,
            min_age: Time::from_myr(1.0),
            max_age: Time::from_gyr(14.0),
            min_mass: 0.45,
            max_mass: 1.2,
        }
    }
}

impl MestelCooling {
    /// Bolometric correction subtracted from Mbol for each band.
    fn bolometric_correction(filter: Filter) -> f64 {
        match filter {
            Filter::Bolometric => 0.0,
            Filter::V => -0.5,
            Filter::G => -0.3,
        }
    }

    /// Luminosity in solar units after cooling for `cooling_age`.
    pub fn luminosity(&self, cooling_age: Time, mass: Mass, atmosphere: Atmosphere) -> f64 {
        let tau = match atmosphere {
            Atmosphere::H => self.timescale,
            Atmosphere::He => self.timescale * self.helium_speedup,
        };
        let scale = tau * mass.to_solar_masses().powf(5.0 / 7.0);
        // One year floor keeps the magnitude finite at zero cooling age
        let t = cooling_age.max(Time::from_years(1.0));
        (t / scale).powf(-7.0 / 5.0)
    }
}

impl CoolingModel for MestelCooling {
    fn magnitude(
        &self,
        cooling_age: Time,
        mass: Mass,
        atmosphere: Atmosphere,
        filter: Filter,
    ) -> (f64, bool) {
        let l = self.luminosity(cooling_age, mass, atmosphere);
        let mbol = SOLAR_MBOL - 2.5 * l.log10();
        let m_wd = mass.to_solar_masses();
        let extrapolated = cooling_age < self.min_age
            || cooling_age > self.max_age
            || m_wd < self.min_mass
            || m_wd > self.max_mass;
        (mbol - Self::bolometric_correction(filter), extrapolated)
    }
}
