//! Star-formation history inversion from a white-dwarf luminosity function.
//!
//! Recovers the formation rate of a stellar population as a function of
//! lookback time by repeatedly forward-simulating white dwarfs, comparing the
//! simulated luminosity function with an observed one, and feeding the
//! per-magnitude corrections back into the time-binned rate.
//!
//! # Architecture
//!
//! One iteration runs, in order:
//! 1. **Generation** ([`ParticleGenerator`]): Monte Carlo white dwarfs for every
//!    lookback-time bin of the current rate, stored in a [`ParticleArena`]
//! 2. **Binning**: the same particles indexed twice, by magnitude and by
//!    formation time ([`Histogram`])
//! 3. **Reweighting** ([`scale_to_observed`]): per-magnitude-bin scale factors
//!    matching the observation, with variance propagation
//! 4. **Rate update** ([`update_rate`]): corrected weights summed back into
//!    rate-per-bin estimates
//! 5. **Convergence** ([`ConvergenceMonitor`]): a two-parameter fit to the
//!    chi-square history
//!
//! [`InversionController`] owns the loop and the [`InversionState`].

pub mod config;
pub mod controller;
pub mod convergence;
pub mod error;
pub mod generator;
pub mod luminosity_function;
pub mod particles;
pub mod reweight;
pub mod sfr;
pub mod update;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod controller_test;
#[cfg(test)]
mod convergence_test;
#[cfg(test)]
mod error_test;
#[cfg(test)]
mod luminosity_function_test;

pub use config::InversionConfig;
pub use controller::{
    InversionController, InversionOutcome, InversionState, IterationReport, Phase, StopHandle,
    Termination,
};
pub use convergence::{ConvergenceMonitor, FitStrategy, FittedModel, MonitorState};
pub use error::{ConfigError, ConvergenceError, GenerationStalled, InversionError};
pub use generator::{BinTally, ParticleGenerator, Population, PopulationParams, StellarPhysics};
pub use luminosity_function::{ModelLuminosityFunction, ObservedLuminosityFunction};
pub use particles::{Histogram, HistogramBin, Particle, ParticleArena, ParticleId};
pub use reweight::{BinCorrection, Reweighting, scale_factor, scale_to_observed};
pub use sfr::{BinnedSfr, Integral, SfrBin, SfrModel};
pub use update::{BinUpdate, RateUpdate, update_rate};
