//! Star-formation rate models over lookback time.
//!
//! [`SfrModel`] is the single tagged type for every functional form; the
//! inversion itself always iterates on the [`BinnedSfr`] representation.

mod binned;
mod model;


pub use binned::{BinnedSfr, Integral, SfrBin};
pub use model::SfrModel;
