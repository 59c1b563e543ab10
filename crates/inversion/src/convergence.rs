//! Chi-square history and the two-parameter fit that decides when to stop.

use log::debug;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::ConvergenceError;

/// Free parameters of every fitting strategy.
pub const FIT_PARAMETERS: usize = 2;

/// Points used by [`FitStrategy::SlidingLinear`].
pub const SLIDING_WINDOW: usize = 5;

/// How the chi-square history is smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitStrategy {
    /// `ln χ² = T ln k + ln S` over the whole post-skip history
    PowerLaw,
    /// `χ² = m k + c` over the last few iterations only
    #[default]
    SlidingLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MonitorState {
    Unconstrained,
    Constrained,
}

/// Coefficients of the current fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FittedModel {
    PowerLaw { exponent: f64, scale: f64 },
    Linear { slope: f64, intercept: f64 },
}

impl FittedModel {
    /// Fitted chi-square at a 1-based iteration number.
    pub fn evaluate(&self, iteration: usize) -> f64 {
        let k = iteration as f64;
        match *self {
            FittedModel::PowerLaw { exponent, scale } => scale * k.powf(exponent),
            FittedModel::Linear { slope, intercept } => slope * k + intercept,
        }
    }
}

/// Tracks chi-square per iteration and refits on every append.
///
/// Iterations are numbered from 1: `history()[k]` belongs to iteration
/// `k + 1`. The first `skip` iterations are kept in the history but never
/// fitted.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    strategy: FitStrategy,
    skip: usize,
    history: Vec<f64>,
    fit: Option<FittedModel>,
}

impl ConvergenceMonitor {
    pub fn new(strategy: FitStrategy, skip: usize) -> Self {
        Self {
            strategy,
            skip,
            history: Vec::new(),
            fit: None,
        }
    }

    pub fn strategy(&self) -> FitStrategy {
        self.strategy
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Append the chi-square of the iteration just finished.
    pub fn push(&mut self, chi_square: f64) {
        self.history.push(chi_square);
        self.fit = match self.state() {
            MonitorState::Unconstrained => None,
            MonitorState::Constrained => self.fit_history(),
        };
        debug!(
            "chi-square history has {} points, fit {:?}",
            self.history.len(),
            self.fit
        );
    }

    pub fn state(&self) -> MonitorState {
        if self.fitted_points() < FIT_PARAMETERS {
            MonitorState::Unconstrained
        } else {
            MonitorState::Constrained
        }
    }

    pub fn is_constrained(&self) -> bool {
        self.state() == MonitorState::Constrained
    }

    /// Current fit coefficients.
    pub fn model(&self) -> Result<FittedModel, ConvergenceError> {
        if !self.is_constrained() {
            return Err(ConvergenceError::InsufficientHistory {
                points: self.fitted_points(),
                required: FIT_PARAMETERS,
            });
        }
        self.fit.ok_or(ConvergenceError::DegenerateFit)
    }

    /// Fitted chi-square at the 1-based `iteration`.
    pub fn fitted_chi_square(&self, iteration: usize) -> Result<f64, ConvergenceError> {
        self.model().map(|model| model.evaluate(iteration))
    }

    /// Whether the fitted chi-square changed by less than `threshold`
    /// (relative) between the last two iterations.
    ///
    /// Always `false` while unconstrained.
    pub fn has_converged(&self, threshold: f64) -> bool {
        let Ok(model) = self.model() else {
            return false;
        };
        let n = self.history.len();
        let previous = model.evaluate(n - 1);
        let latest = model.evaluate(n);
        if previous == 0.0 {
            return latest == 0.0;
        }
        ((previous - latest) / previous).abs() < threshold
    }

    fn fitted_points(&self) -> usize {
        self.history.len().saturating_sub(self.skip)
    }

    fn fit_history(&self) -> Option<FittedModel> {
        let fitted = &self.history[self.skip..];
        let first = match self.strategy {
            FitStrategy::PowerLaw => 0,
            FitStrategy::SlidingLinear => fitted.len().saturating_sub(SLIDING_WINDOW),
        };
        let points = fitted[first..].iter().enumerate().map(|(i, &chi)| {
            let iteration = (self.skip + first + i + 1) as f64;
            match self.strategy {
                FitStrategy::PowerLaw => (iteration.ln(), chi.max(f64::MIN_POSITIVE).ln()),
                FitStrategy::SlidingLinear => (iteration, chi),
            }
        });
        let (intercept, slope) = least_squares(points)?;
        Some(match self.strategy {
            FitStrategy::PowerLaw => FittedModel::PowerLaw {
                exponent: slope,
                scale: intercept.exp(),
            },
            FitStrategy::SlidingLinear => FittedModel::Linear { slope, intercept },
        })
    }
}

/// Straight-line least squares via the 2×2 normal equations.
///
/// Returns `(intercept, slope)`, or `None` when the abscissae do not span a
/// line.
fn least_squares(points: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let mut normal = Matrix2::zeros();
    let mut rhs = Vector2::zeros();
    for (x, y) in points {
        normal += Matrix2::new(1.0, x, x, x * x);
        rhs += Vector2::new(y, x * y);
    }
    let solution = normal.try_inverse()? * rhs;
    let (intercept, slope) = (solution[0], solution[1]);
    (intercept.is_finite() && slope.is_finite()).then_some((intercept, slope))
}
