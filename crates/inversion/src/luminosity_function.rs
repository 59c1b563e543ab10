//! Observed and modelled white-dwarf luminosity functions.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::particles::{Histogram, bin_edges};

const WHAT: &str = "observed luminosity function";

/// Number density of white dwarfs per unit magnitude, as supplied by a survey.
///
/// Immutable once constructed; every constructor validates the bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLuminosityFunction", rename_all = "camelCase")]
pub struct ObservedLuminosityFunction {
    bin_centers: Vec<f64>,
    bin_widths: Vec<f64>,
    density: Vec<f64>,
    density_error: Vec<f64>,
    #[serde(skip)]
    edges: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLuminosityFunction {
    bin_centers: Vec<f64>,
    bin_widths: Vec<f64>,
    density: Vec<f64>,
    density_error: Vec<f64>,
}

impl TryFrom<RawLuminosityFunction> for ObservedLuminosityFunction {
    type Error = ConfigError;

    fn try_from(raw: RawLuminosityFunction) -> Result<Self, Self::Error> {
        Self::new(raw.bin_centers, raw.bin_widths, raw.density, raw.density_error)
    }
}

impl ObservedLuminosityFunction {
    pub fn new(
        bin_centers: Vec<f64>,
        bin_widths: Vec<f64>,
        density: Vec<f64>,
        density_error: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        let edges = bin_edges(WHAT, &bin_centers, &bin_widths)?;

        for (field, values) in [("density", &density), ("density error", &density_error)] {
            if values.len() != bin_centers.len() {
                return Err(ConfigError::LengthMismatch {
                    what: WHAT,
                    field,
                    expected: bin_centers.len(),
                    found: values.len(),
                });
            }
            for (index, &value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite {
                        what: WHAT,
                        field,
                        index,
                    });
                }
                if value < 0.0 {
                    return Err(ConfigError::Negative {
                        what: WHAT,
                        field,
                        index,
                        value,
                    });
                }
            }
        }

        Ok(Self {
            bin_centers,
            bin_widths,
            density,
            density_error,
            edges,
        })
    }

    pub fn len(&self) -> usize {
        self.bin_centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bin_centers.is_empty()
    }

    pub fn bin_centers(&self) -> &[f64] {
        &self.bin_centers
    }

    pub fn bin_widths(&self) -> &[f64] {
        &self.bin_widths
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn density_error(&self) -> &[f64] {
        &self.density_error
    }

    /// Magnitude range `[bright, faint)` covered by the observation.
    pub fn magnitude_range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    /// Empty histogram with the observation's magnitude bins.
    pub fn histogram(&self) -> Histogram {
        Histogram::from_edges(&self.bin_centers, &self.bin_widths, &self.edges)
    }
}

/// Simulated luminosity function on the observed magnitude bins.
///
/// Densities are taken before the reweighting correction, so this is the
/// prediction of the rate model that generated the particles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelLuminosityFunction {
    pub bin_centers: Vec<f64>,
    pub density: Vec<f64>,
    pub density_sigma: Vec<f64>,
}
