//! The formation-rate model family.

use rand::Rng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};
use stellar::sampling::sample_gaussian;
use units::Time;

use super::{BinnedSfr, Integral};
use crate::config::check_parameter;
use crate::error::ConfigError;

/// A star-formation rate as a function of lookback time, in stars per year.
///
/// Analytic forms are evaluated directly; the binned forms wrap a
/// [`BinnedSfr`]. All variants answer the same questions: the rate at a
/// time, the stars formed over an interval, and a random creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", try_from = "UncheckedSfrModel")]
pub enum SfrModel {
    /// Constant rate over `[t_min, t_max)`.
    #[serde(rename_all = "camelCase")]
    Constant { rate: f64, t_min: Time, t_max: Time },

    /// Burst at `t_max` decaying towards the present with e-folding `timescale`.
    ///
    /// `initial_rate` is the rate at the onset, `t_max`.
    #[serde(rename_all = "camelCase")]
    ExponentialDecay {
        initial_rate: f64,
        timescale: Time,
        t_min: Time,
        t_max: Time,
    },

    /// Random self-similar history, see [`SfrModel::fractal`].
    Fractal { bins: BinnedSfr },

    /// Arbitrary user-supplied bins.
    Freeform { bins: BinnedSfr },

    /// Starting point of an inversion.
    PiecewiseGuess { bins: BinnedSfr },
}

/// Wire form of [`SfrModel`], checked by `TryFrom` before use.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum UncheckedSfrModel {
    #[serde(rename_all = "camelCase")]
    Constant { rate: f64, t_min: Time, t_max: Time },
    #[serde(rename_all = "camelCase")]
    ExponentialDecay {
        initial_rate: f64,
        timescale: Time,
        t_min: Time,
        t_max: Time,
    },
    Fractal { bins: BinnedSfr },
    Freeform { bins: BinnedSfr },
    PiecewiseGuess { bins: BinnedSfr },
}

impl TryFrom<UncheckedSfrModel> for SfrModel {
    type Error = ConfigError;

    fn try_from(unchecked: UncheckedSfrModel) -> Result<Self, Self::Error> {
        let model = match unchecked {
            UncheckedSfrModel::Constant { rate, t_min, t_max } => {
                SfrModel::Constant { rate, t_min, t_max }
            }
            UncheckedSfrModel::ExponentialDecay {
                initial_rate,
                timescale,
                t_min,
                t_max,
            } => SfrModel::ExponentialDecay {
                initial_rate,
                timescale,
                t_min,
                t_max,
            },
            UncheckedSfrModel::Fractal { bins } => SfrModel::Fractal { bins },
            UncheckedSfrModel::Freeform { bins } => SfrModel::Freeform { bins },
            UncheckedSfrModel::PiecewiseGuess { bins } => SfrModel::PiecewiseGuess { bins },
        };
        model.validate()?;
        Ok(model)
    }
}

impl SfrModel {
    /// Flat initial guess over `n_bins` from the present back to `t_max`.
    pub fn flat_guess(t_max: Time, n_bins: usize, rate: f64) -> Result<Self, ConfigError> {
        BinnedSfr::flat(t_max, n_bins, rate).map(|bins| SfrModel::PiecewiseGuess { bins })
    }

    /// Constant `rate` over `[t_min, t_max)`.
    pub fn constant(rate: f64, t_min: Time, t_max: Time) -> Result<Self, ConfigError> {
        let model = SfrModel::Constant { rate, t_min, t_max };
        model.validate()?;
        Ok(model)
    }

    /// Exponential decay from `initial_rate` at `t_max` with e-folding `timescale`.
    pub fn exponential_decay(
        initial_rate: f64,
        timescale: Time,
        t_min: Time,
        t_max: Time,
    ) -> Result<Self, ConfigError> {
        let model = SfrModel::ExponentialDecay {
            initial_rate,
            timescale,
            t_min,
            t_max,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check the parameters of the analytic forms.
    ///
    /// The domain must be finite with `0 <= t_min < t_max`, rates finite and
    /// non-negative, and the decay timescale positive. Binned variants are
    /// validated when their bins are built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            SfrModel::Constant { rate, t_min, t_max } => {
                check_domain(*t_min, *t_max)?;
                check_parameter("rate", *rate, *rate >= 0.0, ">= 0")
            }
            SfrModel::ExponentialDecay {
                initial_rate,
                timescale,
                t_min,
                t_max,
            } => {
                check_domain(*t_min, *t_max)?;
                check_parameter("initialRate", *initial_rate, *initial_rate >= 0.0, ">= 0")?;
                check_parameter(
                    "timescale",
                    timescale.to_years(),
                    timescale.is_positive(),
                    "> 0",
                )
            }
            SfrModel::Fractal { .. }
            | SfrModel::Freeform { .. }
            | SfrModel::PiecewiseGuess { .. } => Ok(()),
        }
    }

    /// Random history by midpoint displacement.
    ///
    /// A log-rate profile is built on `2^k + 1` nodes: each refinement level
    /// offsets new midpoints by a Gaussian whose amplitude shrinks by
    /// `2^-hurst`. Bins take the exponential of the profile and are then
    /// normalised to `mean_rate`. Larger `hurst` gives smoother histories.
    pub fn fractal(
        t_max: Time,
        n_bins: usize,
        mean_rate: f64,
        hurst: f64,
        rng: &mut ChaChaRng,
    ) -> Result<Self, ConfigError> {
        if n_bins == 0 {
            return Err(ConfigError::Empty {
                what: "formation-rate model",
            });
        }
        let levels = n_bins.next_power_of_two().trailing_zeros();
        let size = (1usize << levels) + 1;
        let mut profile = vec![0.0; size];
        let mut step = size - 1;
        let mut amplitude = 1.0;
        while step > 1 {
            let half = step / 2;
            for mid in (half..size - 1).step_by(step) {
                let mean = (profile[mid - half] + profile[mid + half]) / 2.0;
                profile[mid] = mean + sample_gaussian(rng, 0.0, amplitude);
            }
            amplitude *= 2f64.powf(-hurst);
            step = half;
        }

        let raw: Vec<f64> = (0..n_bins)
            .map(|i| {
                let node = ((i as f64 + 0.5) * (size - 1) as f64 / n_bins as f64).round();
                profile[node as usize].exp()
            })
            .collect();
        let norm = mean_rate * n_bins as f64 / raw.iter().sum::<f64>();

        let width = t_max / n_bins as f64;
        BinnedSfr::from_fn(Time::zero(), t_max, n_bins, |lower, _| {
            let i = ((lower / width).round() as usize).min(n_bins - 1);
            (raw[i] * norm, 0.0)
        })
        .map(|bins| SfrModel::Fractal { bins })
    }

    /// The binned representation, if this is a binned variant.
    pub fn as_binned(&self) -> Option<&BinnedSfr> {
        match self {
            SfrModel::Fractal { bins: b }
            | SfrModel::Freeform { bins: b }
            | SfrModel::PiecewiseGuess { bins: b } => Some(b),
            SfrModel::Constant { .. } | SfrModel::ExponentialDecay { .. } => None,
        }
    }

    /// Lookback-time domain `[t_min, t_max)`.
    pub fn domain(&self) -> (Time, Time) {
        match self {
            SfrModel::Constant { t_min, t_max, .. }
            | SfrModel::ExponentialDecay { t_min, t_max, .. } => (*t_min, *t_max),
            SfrModel::Fractal { bins: b }
            | SfrModel::Freeform { bins: b }
            | SfrModel::PiecewiseGuess { bins: b } => (b.t_min(), b.t_max()),
        }
    }

    /// Rate at lookback time `t`; zero outside the domain.
    pub fn rate(&self, t: Time) -> f64 {
        let (t_min, t_max) = self.domain();
        match self {
            _ if t < t_min || t >= t_max => 0.0,
            SfrModel::Constant { rate, .. } => *rate,
            SfrModel::ExponentialDecay {
                initial_rate,
                timescale,
                t_max,
                ..
            } => initial_rate * (-((*t_max - t) / *timescale)).exp(),
            SfrModel::Fractal { bins: b }
            | SfrModel::Freeform { bins: b }
            | SfrModel::PiecewiseGuess { bins: b } => b.rate(t),
        }
    }

    /// Stars formed between lookback times `lower` and `upper`.
    pub fn integrate(&self, lower: Time, upper: Time) -> Integral {
        let (t_min, t_max) = self.domain();
        let lo = lower.max(t_min);
        let hi = upper.min(t_max);
        if hi <= lo {
            return Integral::default();
        }
        match self {
            SfrModel::Constant { rate, .. } => Integral {
                value: rate * (hi - lo).to_years(),
                sigma: 0.0,
            },
            SfrModel::ExponentialDecay {
                initial_rate,
                timescale,
                t_max,
                ..
            } => {
                // ∫ r0 exp(-(T - t)/τ) dt = r0 τ [exp(-(T - hi)/τ) - exp(-(T - lo)/τ)]
                let tau = timescale.to_years();
                let upper_term = (-((*t_max - hi) / *timescale)).exp();
                let lower_term = (-((*t_max - lo) / *timescale)).exp();
                Integral {
                    value: initial_rate * tau * (upper_term - lower_term),
                    sigma: 0.0,
                }
            }
            SfrModel::Fractal { bins: b }
            | SfrModel::Freeform { bins: b }
            | SfrModel::PiecewiseGuess { bins: b } => b.integrate(lo, hi),
        }
    }

    /// Draw a creation time in `[t_min, t_max)` with probability proportional
    /// to the rate.
    ///
    /// Returns `None` when no stars form or the parameters are invalid.
    pub fn draw_creation_time(&self, rng: &mut ChaChaRng) -> Option<Time> {
        self.validate().ok()?;
        match self {
            SfrModel::Constant { rate, t_min, t_max } => (*rate > 0.0)
                .then(|| Time::from_years(rng.random_range(t_min.to_years()..t_max.to_years()))),
            SfrModel::ExponentialDecay {
                initial_rate,
                timescale,
                t_min,
                t_max,
            } => {
                if *initial_rate <= 0.0 {
                    return None;
                }
                // Inverse transform in time since onset, u = t_max - t
                let span = (*t_max - *t_min) / *timescale;
                let v: f64 = 1.0 - rng.random::<f64>();
                let u = -(1.0 - v * (1.0 - (-span).exp())).ln();
                // u rounds to zero for the smallest v; stay inside the half-open domain
                let latest = Time::from_years(largest_below(t_max.to_years()));
                Some((*t_max - *timescale * u).max(*t_min).min(latest))
            }
            SfrModel::Fractal { bins: b }
            | SfrModel::Freeform { bins: b }
            | SfrModel::PiecewiseGuess { bins: b } => b.draw_creation_time(rng),
        }
    }

    /// Discretise onto `n_bins` equal bins over the domain.
    ///
    /// Each bin carries the mean rate of the model across it. Binned variants
    /// already have their own bins and return a copy of them.
    pub fn to_binned(&self, n_bins: usize) -> Result<BinnedSfr, ConfigError> {
        if let Some(binned) = self.as_binned() {
            return Ok(binned.clone());
        }
        let (t_min, t_max) = self.domain();
        BinnedSfr::from_fn(t_min, t_max, n_bins, |lower, upper| {
            let stars = self.integrate(lower, upper);
            (stars.value / (upper - lower).to_years(), 0.0)
        })
    }
}

fn check_domain(t_min: Time, t_max: Time) -> Result<(), ConfigError> {
    let (lo, hi) = (t_min.to_years(), t_max.to_years());
    check_parameter("tMin", lo, lo >= 0.0, ">= 0")?;
    check_parameter("tMax", hi, hi > lo, "> tMin")
}

/// Largest `f64` strictly below a positive finite `x`.
fn largest_below(x: f64) -> f64 {
    f64::from_bits(x.to_bits() - 1)
}
