use units::{Mass, Time};

/// Time from a star's formation until it becomes a white dwarf.
///
/// Depends on the progenitor's metallicity `z`, helium mass fraction `y`
/// and initial mass.
pub trait PreWdLifetime: Send + Sync {
    fn lifetime(&self, z: f64, y: f64, mass: Mass) -> Time;
}

/// Phenomenological power-law lifetime.
///
/// t = t☉ × M^α × (Z/Z☉)^β × ((1-Y)/(1-Y☉))^γ × f_post
///
/// The main-sequence scaling is the usual M^-2.5; metal-rich stars are more
/// opaque and live longer, helium-rich stars burn faster. `post_ms_factor`
/// adds the giant-branch and AGB phases on top of the main sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawLifetime {
    pub solar_lifetime: Time,
    pub mass_exponent: f64,
    pub solar_metallicity: f64,
    pub metallicity_exponent: f64,
    pub solar_helium: f64,
    pub helium_exponent: f64,
    pub post_ms_factor: f64,
}

impl Default for PowerLawLifetime {
    fn default() -> Self {
        Self {
            solar_lifetime: Time::from_gyr(10.0),
            mass_exponent: -2.5,
            solar_metallicity: 0.017,
            metallicity_exponent: 0.25,
            solar_helium: 0.27,
            helium_exponent: 1.5,
            post_ms_factor: 1.1,
        }
    }
}

impl PreWdLifetime for PowerLawLifetime {
    fn lifetime(&self, z: f64, y: f64, mass: Mass) -> Time {
        let mass_term = mass.to_solar_masses().powf(self.mass_exponent);
        let z_term = (z / self.solar_metallicity).powf(self.metallicity_exponent);
        let y_term = ((1.0 - y) / (1.0 - self.solar_helium))
            .max(f64::MIN_POSITIVE)
            .powf(self.helium_exponent);
        self.solar_lifetime * (mass_term * z_term * y_term * self.post_ms_factor)
    }
}
