//! Piecewise-constant formation rate.

use rand::Rng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use units::Time;

use crate::error::ConfigError;
use crate::particles::{Histogram, bin_edges};

const WHAT: &str = "formation-rate model";

/// An expected star count and its one-sigma uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Integral {
    pub value: f64,
    pub sigma: f64,
}

/// One lookback-time bin of a piecewise-constant rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SfrBin {
    pub center: Time,
    pub width: Time,
    /// Stars formed per year
    pub rate: f64,
    #[serde(default)]
    pub rate_sigma: f64,
}

impl SfrBin {
    pub fn lower(&self) -> Time {
        self.center - self.width / 2.0
    }

    pub fn upper(&self) -> Time {
        self.center + self.width / 2.0
    }

    /// Stars formed over the whole bin.
    pub fn expected_stars(&self) -> Integral {
        let width = self.width.to_years();
        Integral {
            value: self.rate * width,
            sigma: self.rate_sigma * width,
        }
    }
}

/// Contiguous lookback-time bins with a constant rate in each.
///
/// Serializes as the plain list of bins; deserialization validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SfrBin>", into = "Vec<SfrBin>")]
pub struct BinnedSfr {
    bins: Vec<SfrBin>,
    /// Shared bin edges in years
    edges: Vec<f64>,
}

impl BinnedSfr {
    pub fn new(bins: Vec<SfrBin>) -> Result<Self, ConfigError> {
        let centers: Vec<f64> = bins.iter().map(|b| b.center.to_years()).collect();
        let widths: Vec<f64> = bins.iter().map(|b| b.width.to_years()).collect();
        let edges = bin_edges(WHAT, &centers, &widths)?;

        for (index, bin) in bins.iter().enumerate() {
            check_rate(index, bin.rate, bin.rate_sigma)?;
        }

        Ok(Self { bins, edges })
    }

    /// Equal-width bins over `[t_min, t_max)` with `(rate, sigma)` from `f(lower, upper)`.
    pub fn from_fn<F>(t_min: Time, t_max: Time, n_bins: usize, f: F) -> Result<Self, ConfigError>
    where
        F: Fn(Time, Time) -> (f64, f64),
    {
        if n_bins == 0 {
            return Err(ConfigError::Empty { what: WHAT });
        }
        let width = (t_max - t_min) / n_bins as f64;
        let bins = (0..n_bins)
            .map(|i| {
                let lower = t_min + width * i as f64;
                let (rate, rate_sigma) = f(lower, lower + width);
                SfrBin {
                    center: lower + width / 2.0,
                    width,
                    rate,
                    rate_sigma,
                }
            })
            .collect();
        Self::new(bins)
    }

    /// Constant `rate` over `n_bins` equal bins from the present back to `t_max`.
    pub fn flat(t_max: Time, n_bins: usize, rate: f64) -> Result<Self, ConfigError> {
        Self::from_fn(Time::zero(), t_max, n_bins, |_, _| (rate, 0.0))
    }

    pub fn bins(&self) -> &[SfrBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Lower edge of bin `index`, as used for drawing creation times.
    pub fn lower_edge(&self, index: usize) -> Time {
        Time::from_years(self.edges[index])
    }

    /// Upper edge of bin `index`; equals the next bin's lower edge exactly.
    pub fn upper_edge(&self, index: usize) -> Time {
        Time::from_years(self.edges[index + 1])
    }

    pub fn t_min(&self) -> Time {
        Time::from_years(self.edges[0])
    }

    pub fn t_max(&self) -> Time {
        Time::from_years(self.edges[self.edges.len() - 1])
    }

    pub fn bin_index(&self, t: Time) -> Option<usize> {
        let t = t.to_years();
        if !(self.edges[0]..self.edges[self.edges.len() - 1]).contains(&t) {
            return None;
        }
        Some(self.edges.partition_point(|&edge| edge <= t) - 1)
    }

    /// Rate at lookback time `t`; zero outside the model's domain.
    pub fn rate(&self, t: Time) -> f64 {
        self.bin_index(t).map_or(0.0, |i| self.bins[i].rate)
    }

    /// Stars formed between lookback times `lower` and `upper`.
    ///
    /// Partial overlaps contribute proportionally. Uncertainties of
    /// different bins are combined in quadrature.
    pub fn integrate(&self, lower: Time, upper: Time) -> Integral {
        let (lo, hi) = (lower.to_years(), upper.to_years());
        let mut value = 0.0;
        let mut variance = 0.0;
        for (i, bin) in self.bins.iter().enumerate() {
            let overlap = (hi.min(self.edges[i + 1]) - lo.max(self.edges[i])).max(0.0);
            value += bin.rate * overlap;
            variance += (bin.rate_sigma * overlap).powi(2);
        }
        Integral {
            value,
            sigma: variance.sqrt(),
        }
    }

    /// Stars formed over bin `index`, using the shared edges.
    pub fn integrate_bin(&self, index: usize) -> Integral {
        self.integrate(self.lower_edge(index), self.upper_edge(index))
    }

    /// Total stars formed over the whole domain.
    pub fn total_stars(&self) -> Integral {
        self.integrate(self.t_min(), self.t_max())
    }

    /// Draw a formation time with probability proportional to the rate.
    ///
    /// Returns `None` when no stars form anywhere in the domain.
    pub fn draw_creation_time(&self, rng: &mut ChaChaRng) -> Option<Time> {
        let total = self.total_stars().value;
        if total <= 0.0 || !total.is_finite() {
            return None;
        }
        let target = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        for (i, bin) in self.bins.iter().enumerate() {
            cumulative += bin.expected_stars().value;
            if target < cumulative && bin.rate > 0.0 {
                let t = rng.random_range(self.edges[i]..self.edges[i + 1]);
                return Some(Time::from_years(t));
            }
        }
        // Rounding left `target` at the very top: use the last populated bin
        let last = self.bins.iter().rposition(|b| b.rate > 0.0)?;
        Some(Time::from_years(
            rng.random_range(self.edges[last]..self.edges[last + 1]),
        ))
    }

    /// Replace the rate estimate of bin `index`.
    pub fn set_rate(&mut self, index: usize, rate: f64, rate_sigma: f64) {
        let bin = &mut self.bins[index];
        bin.rate = rate;
        bin.rate_sigma = rate_sigma;
    }

    /// Mean rate over the domain, stars per year.
    pub fn mean_rate(&self) -> f64 {
        self.total_stars().value / (self.t_max() - self.t_min()).to_years()
    }

    /// Empty histogram keyed by lookback time in years, one bin per rate bin.
    pub fn histogram(&self) -> Histogram {
        let centers: Vec<f64> = self.bins.iter().map(|b| b.center.to_years()).collect();
        let widths: Vec<f64> = self.bins.iter().map(|b| b.width.to_years()).collect();
        Histogram::from_edges(&centers, &widths, &self.edges)
    }
}

fn check_rate(index: usize, rate: f64, rate_sigma: f64) -> Result<(), ConfigError> {
    for (field, value) in [("rate", rate), ("rate sigma", rate_sigma)] {
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
    Ok(())
}

impl TryFrom<Vec<SfrBin>> for BinnedSfr {
    type Error = ConfigError;

    fn try_from(bins: Vec<SfrBin>) -> Result<Self, Self::Error> {
        Self::new(bins)
    }
}

impl From<BinnedSfr> for Vec<SfrBin> {
    fn from(model: BinnedSfr) -> Self {
        model.bins
    }
}
