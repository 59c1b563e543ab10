//! Run configuration and JSON loading.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stellar::Filter;

use crate::convergence::FitStrategy;
use crate::error::{ConfigError, InversionError};

/// Every scalar an inversion run needs, validated once before the first
/// iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InversionConfig {
    /// Mean metallicity Z of the progenitors
    pub metallicity_mean: f64,
    pub metallicity_sigma: f64,
    /// Mean helium fraction Y of the progenitors
    pub helium_mean: f64,
    pub helium_sigma: f64,
    /// Probability w_H that a white dwarf has a hydrogen atmosphere
    pub hydrogen_fraction: f64,
    /// Gaussian noise added to simulated magnitudes
    pub magnitude_sigma: f64,
    /// White dwarfs realized per lookback-time bin
    pub wd_per_bin: usize,
    /// Draw budget per lookback-time bin
    pub max_draws_per_bin: u64,
    pub min_iterations: usize,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
    /// Leading iterations excluded from the convergence fit
    pub skip_iterations: usize,
    pub fit_strategy: FitStrategy,
    pub filter: Filter,
    pub seed: u64,
}

impl Default for InversionConfig {
    fn default() -> Self {
        Self {
            metallicity_mean: 0.017,
            metallicity_sigma: 0.0,
            helium_mean: 0.27,
            helium_sigma: 0.0,
            hydrogen_fraction: 0.8,
            magnitude_sigma: 0.0,
            wd_per_bin: 1000,
            max_draws_per_bin: 10_000_000,
            min_iterations: 3,
            max_iterations: 25,
            convergence_threshold: 0.01,
            skip_iterations: 0,
            fit_strategy: FitStrategy::SlidingLinear,
            filter: Filter::V,
            seed: 42,
        }
    }
}

impl InversionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_parameter(
            "metallicityMean",
            self.metallicity_mean,
            self.metallicity_mean > 0.0,
            "> 0",
        )?;
        check_parameter(
            "metallicitySigma",
            self.metallicity_sigma,
            self.metallicity_sigma >= 0.0,
            ">= 0",
        )?;
        check_parameter("heliumMean", self.helium_mean, self.helium_mean > 0.0, "> 0")?;
        check_parameter(
            "heliumSigma",
            self.helium_sigma,
            self.helium_sigma >= 0.0,
            ">= 0",
        )?;
        check_parameter(
            "hydrogenFraction",
            self.hydrogen_fraction,
            (0.0..=1.0).contains(&self.hydrogen_fraction),
            "in [0, 1]",
        )?;
        check_parameter(
            "magnitudeSigma",
            self.magnitude_sigma,
            self.magnitude_sigma >= 0.0,
            ">= 0",
        )?;
        check_parameter(
            "wdPerBin",
            self.wd_per_bin as f64,
            self.wd_per_bin >= 1,
            ">= 1",
        )?;
        check_parameter(
            "maxDrawsPerBin",
            self.max_draws_per_bin as f64,
            self.max_draws_per_bin >= self.wd_per_bin as u64,
            ">= wdPerBin",
        )?;
        check_parameter(
            "minIterations",
            self.min_iterations as f64,
            self.min_iterations >= 1,
            ">= 1",
        )?;
        check_parameter(
            "maxIterations",
            self.max_iterations as f64,
            self.max_iterations >= self.min_iterations,
            ">= minIterations",
        )?;
        check_parameter(
            "convergenceThreshold",
            self.convergence_threshold,
            self.convergence_threshold > 0.0,
            "> 0",
        )?;
        Ok(())
    }

    /// Load and validate a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, InversionError> {
        let config: Self = load_json(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Non-finite values always fail.
pub(crate) fn check_parameter(
    name: &'static str,
    value: f64,
    ok: bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected,
        })
    }
}

/// Read and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, InversionError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| InversionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InversionError::Parse {
        path: path.display().to_string(),
        source,
    })
}
