//! Contiguous half-open bins holding particle ids.

use crate::error::ConfigError;
use crate::particles::{ParticleArena, ParticleId};

/// Relative tolerance when checking that neighbouring bins share an edge.
const EDGE_TOLERANCE: f64 = 1e-6;

/// Validate bin centres and widths and return the shared bin edges.
///
/// Bins must be finite, have positive width, strictly increasing centres and
/// no gaps or overlaps. The returned edges have length `n + 1`; bin `i`
/// covers `[edges[i], edges[i + 1])`, so neighbouring bins share the exact
/// same boundary value.
pub(crate) fn bin_edges(
    what: &'static str,
    centers: &[f64],
    widths: &[f64],
) -> Result<Vec<f64>, ConfigError> {
    if centers.is_empty() {
        return Err(ConfigError::Empty { what });
    }
    if widths.len() != centers.len() {
        return Err(ConfigError::LengthMismatch {
            what,
            field: "widths",
            expected: centers.len(),
            found: widths.len(),
        });
    }

    for (index, (&center, &width)) in centers.iter().zip(widths).enumerate() {
        if !center.is_finite() {
            return Err(ConfigError::NonFinite {
                what,
                field: "center",
                index,
            });
        }
        if !width.is_finite() {
            return Err(ConfigError::NonFinite {
                what,
                field: "width",
                index,
            });
        }
        if width <= 0.0 {
            return Err(ConfigError::NonPositiveWidth { what, index, width });
        }
    }

    let mut edges = Vec::with_capacity(centers.len() + 1);
    edges.push(centers[0] - widths[0] / 2.0);
    for index in 0..centers.len() - 1 {
        if centers[index + 1] <= centers[index] {
            return Err(ConfigError::NonMonotonic {
                what,
                index: index + 1,
            });
        }
        let upper = centers[index] + widths[index] / 2.0;
        let next_lower = centers[index + 1] - widths[index + 1] / 2.0;
        let tolerance = EDGE_TOLERANCE * widths[index].min(widths[index + 1]);
        if (upper - next_lower).abs() > tolerance {
            return Err(ConfigError::NonContiguous { what, index });
        }
        edges.push(upper);
    }
    let last = centers.len() - 1;
    edges.push(centers[last] + widths[last] / 2.0);

    Ok(edges)
}

/// One histogram bin: its extent and the particles that fall in it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    center: f64,
    width: f64,
    lower: f64,
    upper: f64,
    members: Vec<ParticleId>,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn members(&self) -> &[ParticleId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Half-open membership test, `lower <= x < upper`.
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x < self.upper
    }

    /// Σ weight over members
    pub fn total_weight(&self, arena: &ParticleArena) -> f64 {
        self.members.iter().map(|&id| arena.get(id).weight).sum()
    }

    /// Σ weight variance over members
    pub fn total_variance(&self, arena: &ParticleArena) -> f64 {
        self.members
            .iter()
            .map(|&id| arena.get(id).weight_variance)
            .sum()
    }

    /// Σ weight² over members: the Monte Carlo sampling variance of the total.
    pub fn sampling_variance(&self, arena: &ParticleArena) -> f64 {
        self.members
            .iter()
            .map(|&id| arena.get(id).weight.powi(2))
            .sum()
    }

    /// Weight per unit of the binned quantity.
    pub fn density(&self, arena: &ParticleArena) -> f64 {
        self.total_weight(arena) / self.width
    }

    pub fn density_variance(&self, arena: &ParticleArena) -> f64 {
        self.total_variance(arena) / (self.width * self.width)
    }
}

/// An ordered run of contiguous, non-overlapping bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
    edges: Vec<f64>,
}

impl Histogram {
    /// Build an empty histogram, validating the bin layout.
    pub fn new(what: &'static str, centers: &[f64], widths: &[f64]) -> Result<Self, ConfigError> {
        let edges = bin_edges(what, centers, widths)?;
        Ok(Self::from_edges(centers, widths, &edges))
    }

    /// Build from edges already returned by [`bin_edges`] for the same bins.
    pub(crate) fn from_edges(centers: &[f64], widths: &[f64], edges: &[f64]) -> Self {
        let bins = centers
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (&center, &width))| HistogramBin {
                center,
                width,
                lower: edges[i],
                upper: edges[i + 1],
                members: Vec::new(),
            })
            .collect();
        Self {
            bins,
            edges: edges.to_vec(),
        }
    }

    /// Index of the bin containing `x`, or `None` outside the covered range.
    ///
    /// A value equal to a shared edge belongs to the upper bin.
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        let (first, last) = (self.edges[0], self.edges[self.edges.len() - 1]);
        if !(first..last).contains(&x) {
            return None;
        }
        Some(self.edges.partition_point(|&edge| edge <= x) - 1)
    }

    /// Add a particle keyed by `x`; returns the bin it landed in.
    pub fn insert(&mut self, id: ParticleId, x: f64) -> Option<usize> {
        let index = self.bin_index(x)?;
        self.bins[index].members.push(id);
        Some(index)
    }

    /// Add a particle to a bin chosen by the caller.
    pub(crate) fn insert_at(&mut self, bin: usize, id: ParticleId) {
        self.bins[bin].members.push(id);
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total number of particle ids across all bins.
    pub fn member_count(&self) -> usize {
        self.bins.iter().map(HistogramBin::len).sum()
    }

    /// Covered range `[lower, upper)`.
    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }
}
