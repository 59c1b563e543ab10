//! Monte Carlo white dwarfs for every lookback-time bin of a rate model.

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use rayon::prelude::*;
use serde::Serialize;
use stellar::sampling::{sample_gaussian, sample_positive_gaussian};
use stellar::{
    Atmosphere, CoolingModel, Filter, InitialFinalMassRelation, InitialMassFunction, LinearIfmr,
    MestelCooling, PowerLawImf, PowerLawLifetime, PreWdLifetime,
};
use units::Time;

use crate::config::InversionConfig;
use crate::error::GenerationStalled;
use crate::luminosity_function::ObservedLuminosityFunction;
use crate::particles::{Histogram, Particle, ParticleArena};
use crate::sfr::BinnedSfr;

/// The physics a population is simulated with.
pub struct StellarPhysics {
    pub imf: Box<dyn InitialMassFunction>,
    pub ifmr: Box<dyn InitialFinalMassRelation>,
    pub lifetime: Box<dyn PreWdLifetime>,
    pub cooling: Box<dyn CoolingModel>,
}

impl StellarPhysics {
    /// Salpeter IMF, Kalirai (2008) IFMR, power-law lifetimes and Mestel cooling.
    pub fn reference() -> Self {
        Self {
            imf: Box::new(PowerLawImf::salpeter()),
            ifmr: Box::new(LinearIfmr::kalirai_2008()),
            lifetime: Box::new(PowerLawLifetime::default()),
            cooling: Box::new(MestelCooling::default()),
        }
    }
}

impl Default for StellarPhysics {
    fn default() -> Self {
        Self::reference()
    }
}

/// Population parameters the generator draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationParams {
    pub metallicity_mean: f64,
    pub metallicity_sigma: f64,
    pub helium_mean: f64,
    pub helium_sigma: f64,
    pub hydrogen_fraction: f64,
    pub magnitude_sigma: f64,
    pub wd_per_bin: usize,
    pub max_draws_per_bin: u64,
    pub filter: Filter,
}

impl From<&InversionConfig> for PopulationParams {
    fn from(config: &InversionConfig) -> Self {
        Self {
            metallicity_mean: config.metallicity_mean,
            metallicity_sigma: config.metallicity_sigma,
            helium_mean: config.helium_mean,
            helium_sigma: config.helium_sigma,
            hydrogen_fraction: config.hydrogen_fraction,
            magnitude_sigma: config.magnitude_sigma,
            wd_per_bin: config.wd_per_bin,
            max_draws_per_bin: config.max_draws_per_bin,
            filter: config.filter,
        }
    }
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self::from(&InversionConfig::default())
    }
}

/// Generation bookkeeping for one lookback-time bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinTally {
    /// Stars drawn, whether or not they became white dwarfs
    pub draws: u64,
    pub realized: usize,
    /// Realized white dwarfs inside the observed magnitude range
    pub observed: usize,
    pub stalled: bool,
}

/// One iteration's particles and both histograms over them.
#[derive(Debug, Clone)]
pub struct Population {
    pub arena: ParticleArena,
    /// Keyed by magnitude, bins of the observed luminosity function
    pub white_dwarfs: Histogram,
    /// Keyed by lookback time in years, bins of the rate model
    pub progenitors: Histogram,
    pub tallies: Vec<BinTally>,
    pub stalled: Vec<GenerationStalled>,
}

struct BinSample {
    particles: Vec<Particle>,
    draws: u64,
}

pub struct ParticleGenerator {
    physics: StellarPhysics,
    params: PopulationParams,
}

impl ParticleGenerator {
    pub fn new(physics: StellarPhysics, params: PopulationParams) -> Self {
        Self { physics, params }
    }

    pub fn params(&self) -> &PopulationParams {
        &self.params
    }

    /// Simulate every bin of `model` and index the white dwarfs.
    ///
    /// Bins run in parallel, each on its own `ChaChaRng` seeded from `rng`
    /// in bin order, so the result depends only on `rng` and not on thread
    /// scheduling. A bin that exhausts its draw budget contributes no
    /// particles and is reported in [`Population::stalled`].
    pub fn generate(
        &self,
        model: &BinnedSfr,
        observed: &ObservedLuminosityFunction,
        rng: &mut ChaChaRng,
    ) -> Population {
        let seeds: Vec<u64> = (0..model.len()).map(|_| rng.random()).collect();

        let samples: Vec<Result<BinSample, GenerationStalled>> = seeds
            .par_iter()
            .enumerate()
            .map(|(bin, &seed)| {
                let mut bin_rng = ChaChaRng::seed_from_u64(seed);
                self.generate_bin(model, bin, &mut bin_rng)
            })
            .collect();

        let capacity = samples
            .iter()
            .map(|s| s.as_ref().map_or(0, |s| s.particles.len()))
            .sum();
        let mut arena = ParticleArena::with_capacity(capacity);
        let mut white_dwarfs = observed.histogram();
        let mut progenitors = model.histogram();
        let mut tallies = Vec::with_capacity(model.len());
        let mut stalled = Vec::new();

        for (bin, sample) in samples.into_iter().enumerate() {
            let sample = match sample {
                Ok(sample) => sample,
                Err(stall) => {
                    warn!("{stall}, skipping the bin this iteration");
                    tallies.push(BinTally {
                        draws: stall.draws,
                        realized: stall.realized,
                        observed: 0,
                        stalled: true,
                    });
                    stalled.push(stall);
                    continue;
                }
            };

            let realized = sample.particles.len();
            let mut observed_count = 0;
            for mut particle in sample.particles {
                debug_assert_eq!(
                    progenitors.bin_index(particle.total_age.to_years()),
                    Some(bin)
                );
                let magnitude_bin = white_dwarfs.bin_index(particle.magnitude);
                particle.observed = magnitude_bin.is_some();
                let id = arena.push(particle);
                progenitors.insert_at(bin, id);
                if let Some(m) = magnitude_bin {
                    white_dwarfs.insert_at(m, id);
                    observed_count += 1;
                }
            }

            debug!(
                "lookback bin {}: {} draws, {} white dwarfs, {} observed",
                bin, sample.draws, realized, observed_count
            );
            tallies.push(BinTally {
                draws: sample.draws,
                realized,
                observed: observed_count,
                stalled: false,
            });
        }

        Population {
            arena,
            white_dwarfs,
            progenitors,
            tallies,
            stalled,
        }
    }

    /// Draw stars uniformly over bin `bin` until `wd_per_bin` have become
    /// white dwarfs.
    ///
    /// Every realized particle stands for `expected / draws` real stars,
    /// which also corrects for the stars still on the main sequence.
    fn generate_bin(
        &self,
        model: &BinnedSfr,
        bin: usize,
        rng: &mut ChaChaRng,
    ) -> Result<BinSample, GenerationStalled> {
        let p = &self.params;
        let physics = &self.physics;
        let (lower, upper) = (
            model.lower_edge(bin).to_years(),
            model.upper_edge(bin).to_years(),
        );
        let expected = model.integrate_bin(bin).value;

        let mut particles = Vec::with_capacity(p.wd_per_bin);
        let mut draws: u64 = 0;
        let stall = |draws, realized| GenerationStalled {
            bin,
            draws,
            realized,
        };

        while particles.len() < p.wd_per_bin {
            if draws >= p.max_draws_per_bin {
                return Err(stall(draws, particles.len()));
            }
            draws += 1;

            let mass = physics.imf.draw_mass(rng);
            let Some(metallicity) =
                sample_positive_gaussian(rng, p.metallicity_mean, p.metallicity_sigma)
            else {
                return Err(stall(draws, particles.len()));
            };
            let Some(helium) = sample_positive_gaussian(rng, p.helium_mean, p.helium_sigma) else {
                return Err(stall(draws, particles.len()));
            };
            let pre_wd_lifetime = physics.lifetime.lifetime(metallicity, helium, mass);
            let white_dwarf_mass = physics.ifmr.final_mass(mass);
            let atmosphere = if rng.random::<f64>() < p.hydrogen_fraction {
                Atmosphere::H
            } else {
                Atmosphere::He
            };
            let total_age = Time::from_years(rng.random_range(lower..upper));

            if total_age <= pre_wd_lifetime {
                continue;
            }

            let (magnitude, extrapolated) = physics.cooling.magnitude(
                total_age - pre_wd_lifetime,
                white_dwarf_mass,
                atmosphere,
                p.filter,
            );
            let magnitude = sample_gaussian(rng, magnitude, p.magnitude_sigma);

            particles.push(Particle {
                progenitor_mass: mass,
                metallicity,
                helium,
                pre_wd_lifetime,
                total_age,
                white_dwarf_mass,
                atmosphere,
                magnitude,
                extrapolated,
                observed: false,
                weight: 0.0,
                weight_variance: 0.0,
                rescaled: false,
                lookback_bin: bin,
            });
        }

        if draws > 0 {
            let weight = expected / draws as f64;
            for particle in &mut particles {
                particle.weight = weight;
            }
        }
        Ok(BinSample { particles, draws })
    }
}
