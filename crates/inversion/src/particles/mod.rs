//! Simulated white dwarfs and the histograms that index them.
//!
//! Every particle of an iteration lives in one [`ParticleArena`]. The
//! magnitude histogram and the lookback-time histogram both store
//! [`ParticleId`]s into that arena, so a weight rescaled through one
//! histogram is seen by the other without any aliasing.

mod arena;
mod histogram;
mod particle;

#[cfg(test)]
mod histogram_test;

pub use arena::{ParticleArena, ParticleId};
pub use histogram::{Histogram, HistogramBin};
pub(crate) use histogram::bin_edges;
pub use particle::{Particle, propagate_weight};

#[cfg(test)]
pub(crate) fn test_particle(magnitude: f64, total_age_gyr: f64, weight: f64) -> Particle {
    use stellar::Atmosphere;
    use units::{Mass, Time};

    Particle {
        progenitor_mass: Mass::from_solar_masses(2.0),
        metallicity: 0.017,
        helium: 0.27,
        pre_wd_lifetime: Time::from_gyr(1.0),
        total_age: Time::from_gyr(total_age_gyr),
        white_dwarf_mass: Mass::from_solar_masses(0.6),
        atmosphere: Atmosphere::H,
        magnitude,
        extrapolated: false,
        observed: true,
        weight,
        weight_variance: 0.0,
        rescaled: false,
        lookback_bin: 0,
    }
}
