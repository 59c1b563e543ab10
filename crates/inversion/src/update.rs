//! Folding corrected particle weights back into a formation-rate estimate.

use log::warn;
use serde::Serialize;
use units::Time;

use crate::generator::BinTally;
use crate::particles::{Histogram, ParticleArena};
use crate::sfr::BinnedSfr;

/// Outcome of updating one lookback-time bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum BinUpdate {
    #[serde(rename_all = "camelCase")]
    Updated { rate: f64, rate_sigma: f64 },
    /// No particle from this bin reached the observed magnitude range; the
    /// prior rate is kept.
    Unconstrained,
}

/// The next rate model and how each of its bins was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct RateUpdate {
    pub model: BinnedSfr,
    pub outcomes: Vec<BinUpdate>,
}

impl RateUpdate {
    pub fn unconstrained_bins(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BinUpdate::Unconstrained))
            .count()
    }
}

/// Re-estimate the rate of every bin of `prior` from the corrected weights.
///
/// Only particles inside the observed magnitude range carry corrected
/// weights. Their total is divided by the fraction of the bin's draws that
/// landed there (`observed / draws` from the tally), giving the number of
/// stars formed in the bin:
///
/// ```text
/// N    = Σ w · draws / observed
/// σ_N  = sqrt(Σ σ²_w) · draws / observed
/// rate = N / width
/// ```
///
/// Using `Σ w` alone as the star count would ignore the stars that formed in
/// the bin but are still on the main sequence or already fainter than the
/// observed range, and the estimate would fall every iteration even when the
/// model already matches the data. With the `draws / observed` factor an
/// uncorrected population maps back to the rate it was drawn from.
pub fn update_rate(
    arena: &ParticleArena,
    progenitors: &Histogram,
    tallies: &[BinTally],
    prior: &BinnedSfr,
) -> RateUpdate {
    debug_assert_eq!(progenitors.len(), prior.len());
    debug_assert_eq!(tallies.len(), prior.len());

    let mut model = prior.clone();
    let mut outcomes = Vec::with_capacity(prior.len());

    for (i, bin) in progenitors.bins().iter().enumerate() {
        let (count, weight, variance) = bin
            .members()
            .iter()
            .map(|&id| arena.get(id))
            .filter(|p| p.observed)
            .fold((0usize, 0.0, 0.0), |(n, w, v), p| {
                (n + 1, w + p.weight, v + p.weight_variance)
            });

        let completeness = tallies[i].draws as f64 / count as f64;
        let width = bin.width();
        let rate = weight * completeness / width;
        let rate_sigma = variance.sqrt() * completeness / width;

        if count == 0 || !rate.is_finite() || !rate_sigma.is_finite() {
            warn!(
                "lookback bin {} ({:.2}-{:.2} Gyr) is unconstrained, keeping rate {:.4e}",
                i,
                Time::from_years(bin.lower()).to_gyr(),
                Time::from_years(bin.upper()).to_gyr(),
                prior.bins()[i].rate
            );
            outcomes.push(BinUpdate::Unconstrained);
            continue;
        }

        model.set_rate(i, rate, rate_sigma);
        outcomes.push(BinUpdate::Updated { rate, rate_sigma });
    }

    RateUpdate { model, outcomes }
}
