use thiserror::Error;

/// Errors raised while building or transforming a histogram.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HistogramError {
    #[error("Axis must contain at least one bin")]
    EmptyAxis,

    #[error("Bin edges must be strictly increasing (edge {index} is {value})")]
    NonMonotonicEdges { index: usize, value: f64 },

    #[error("Bin edge {index} is not finite")]
    NonFiniteEdge { index: usize },

    #[error("Expected {expected} bin contents, got {actual}")]
    ContentLengthMismatch { expected: usize, actual: usize },

    #[error("Content of bin {index} is not finite")]
    NonFiniteContent { index: usize },

    #[error("Invalid rebin factor {factor} for an axis of {n_bins} bins")]
    InvalidRebinFactor { factor: usize, n_bins: usize },
}
