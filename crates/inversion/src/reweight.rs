//! Rescaling particle weights so the simulated luminosity function matches
//! the observed one.
//!
//! For magnitude bin `i` with model density `D_m ± σ_m` (σ_m from the Monte
//! Carlo sampling variance Σw²) and observed density `D_o ± σ_o`:
//!
//! ```text
//! s    = D_o / D_m
//! σ_s² = (σ_o / D_m)² + (D_o σ_m / D_m²)²
//! χ²_i = (D_m − D_o)² / (σ_o² + σ_m²)
//! ```
//!
//! χ² is taken before the correction; afterwards every corrected bin matches
//! the observation exactly.

use log::{debug, warn};
use serde::Serialize;

use crate::luminosity_function::{ModelLuminosityFunction, ObservedLuminosityFunction};
use crate::particles::{Histogram, ParticleArena};

/// Correction applied to one magnitude bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinCorrection {
    pub scale: f64,
    pub sigma_scale: f64,
    /// This bin's contribution to the iteration's chi-square
    pub chi_square: f64,
}

/// Result of one reweighting pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reweighting {
    pub chi_square: f64,
    /// One entry per magnitude bin; `None` where the model had no weight
    pub corrections: Vec<Option<BinCorrection>>,
    model_lf: ModelLuminosityFunction,
}

impl Reweighting {
    /// Model densities before the correction was applied.
    pub fn model_luminosity_function(&self) -> &ModelLuminosityFunction {
        &self.model_lf
    }

    pub fn skipped_bins(&self) -> usize {
        self.corrections.iter().filter(|c| c.is_none()).count()
    }
}

/// Scale factor `s ± σ_s` taking `model ± model_sigma` onto
/// `observed ± observed_sigma`.
///
/// `None` when the model density is not positive.
pub fn scale_factor(
    model: f64,
    model_sigma: f64,
    observed: f64,
    observed_sigma: f64,
) -> Option<(f64, f64)> {
    if model <= 0.0 || !model.is_finite() {
        return None;
    }
    let scale = observed / model;
    let variance =
        (observed_sigma / model).powi(2) + (observed * model_sigma / (model * model)).powi(2);
    Some((scale, variance.sqrt()))
}

/// Rescale every particle in `white_dwarfs` so each bin's total weight equals
/// the observed count, and return the pre-correction chi-square.
///
/// `white_dwarfs` must use the bins of `observed`. Each particle is visited
/// once, through the single magnitude bin that holds it; it is then flagged
/// `rescaled`.
pub fn scale_to_observed(
    arena: &mut ParticleArena,
    white_dwarfs: &Histogram,
    observed: &ObservedLuminosityFunction,
) -> Reweighting {
    debug_assert_eq!(white_dwarfs.len(), observed.len());

    let mut chi_square = 0.0;
    let mut corrections = Vec::with_capacity(white_dwarfs.len());
    let mut model_lf = ModelLuminosityFunction {
        bin_centers: observed.bin_centers().to_vec(),
        density: Vec::with_capacity(white_dwarfs.len()),
        density_sigma: Vec::with_capacity(white_dwarfs.len()),
    };

    for (i, bin) in white_dwarfs.bins().iter().enumerate() {
        let width = bin.width();
        let total = bin.total_weight(arena);
        let model = total / width;
        let model_sigma = bin.sampling_variance(arena).sqrt() / width;
        model_lf.density.push(model);
        model_lf.density_sigma.push(model_sigma);

        let obs = observed.density()[i];
        let obs_sigma = observed.density_error()[i];

        let Some((scale, sigma_scale)) = scale_factor(model, model_sigma, obs, obs_sigma) else {
            if obs > 0.0 {
                warn!(
                    "magnitude bin {} (M = {:.2}) observed but has no model weight, left uncorrected",
                    i,
                    bin.center()
                );
            }
            corrections.push(None);
            continue;
        };

        let combined = obs_sigma * obs_sigma + model_sigma * model_sigma;
        let contribution = if combined > 0.0 {
            (model - obs).powi(2) / combined
        } else {
            0.0
        };
        chi_square += contribution;

        for &id in bin.members() {
            let particle = arena.get_mut(id);
            debug_assert!(!particle.rescaled, "particle {} rescaled twice", id.index());
            particle.apply_scale(scale, sigma_scale);
            particle.rescaled = true;
        }

        // Observational floor, shared out in proportion to the new weights
        let corrected_total = scale * total;
        let count_variance = (obs_sigma * width).powi(2);
        if corrected_total > 0.0 && count_variance > 0.0 {
            for &id in bin.members() {
                let particle = arena.get_mut(id);
                particle.weight_variance += particle.weight / corrected_total * count_variance;
            }
        }

        debug!(
            "magnitude bin {}: {} particles, scale {:.4} ± {:.4}, chi-square {:.4}",
            i,
            bin.len(),
            scale,
            sigma_scale,
            contribution
        );
        corrections.push(Some(BinCorrection {
            scale,
            sigma_scale,
            chi_square: contribution,
        }));
    }

    Reweighting {
        chi_square,
        corrections,
        model_lf,
    }
}
