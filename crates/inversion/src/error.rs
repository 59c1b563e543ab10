//! Error types for configuration, generation and convergence.

use thiserror::Error;

/// Malformed input detected before the first iteration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{what}: no bins supplied")]
    Empty { what: &'static str },

    #[error("{what}: {field} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what}: bin {index} has non-positive width {width}")]
    NonPositiveWidth {
        what: &'static str,
        index: usize,
        width: f64,
    },

    #[error("{what}: bin {index} has negative {field} {value}")]
    Negative {
        what: &'static str,
        field: &'static str,
        index: usize,
        value: f64,
    },

    #[error("{what}: bin {index} has non-finite {field}")]
    NonFinite {
        what: &'static str,
        field: &'static str,
        index: usize,
    },

    #[error("{what}: bin centres not strictly increasing at bin {index}")]
    NonMonotonic { what: &'static str, index: usize },

    #[error("{what}: bins {index} and {next} are not contiguous", next = .index + 1)]
    NonContiguous { what: &'static str, index: usize },

    #[error("parameter {name} = {value} out of range (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// A lookback-time bin exhausted its draw budget before realizing its target
/// number of white dwarfs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lookback bin {bin} stalled after {draws} draws ({realized} white dwarfs realized)")]
pub struct GenerationStalled {
    pub bin: usize,
    pub draws: u64,
    pub realized: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvergenceError {
    #[error("convergence fit needs {required} chi-square points after skipped iterations, have {points}")]
    InsufficientHistory { points: usize, required: usize },

    #[error("least-squares normal equations are singular")]
    DegenerateFit,
}

/// Terminal errors for a whole inversion run.
#[derive(Debug, Error)]
pub enum InversionError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl InversionError {
    /// Process exit status for a command-line run that failed with this error.
    ///
    /// Bad input gives 2. A run that finished but whose result could not be
    /// written gives 3.
    pub fn exit_code(&self) -> u8 {
        match self {
            InversionError::InvalidConfiguration(_)
            | InversionError::Io { .. }
            | InversionError::Parse { .. } => 2,
            InversionError::Output { .. } => 3,
        }
    }
}
