use thiserror::Error;

use crate::histogram::HistogramError;

/// Errors that reject a cut search before it runs, or abort it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CutError {
    #[error("Optimization order must be at least 1, got {order}")]
    InvalidOrder { order: usize },

    #[error("Rebin factor must be at least 1, got {factor}")]
    InvalidRebin { factor: usize },

    #[error("Signal and background histograms do not share the same binning")]
    IncompatibleBinning,

    #[error("Search range is inverted: x_min resolves to bin {x_min}, x_max to bin {x_max}")]
    InvertedRange { x_min: usize, x_max: usize },

    #[error("Unknown group filter '{0}' (expected odd, even or both)")]
    UnknownGroupFilter(String),

    #[error("Search was cancelled")]
    Cancelled,

    #[error(transparent)]
    Histogram(#[from] HistogramError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_order_display() {
        let e = CutError::InvalidOrder { order: 0 };
        assert_eq!(e.to_string(), "Optimization order must be at least 1, got 0");
    }

    #[test]
    fn incompatible_binning_display() {
        assert_eq!(
            CutError::IncompatibleBinning.to_string(),
            "Signal and background histograms do not share the same binning"
        );
    }

    #[test]
    fn inverted_range_display() {
        let e = CutError::InvertedRange { x_min: 7, x_max: 2 };
        assert!(e.to_string().contains("bin 7"));
    }

    #[test]
    fn histogram_error_is_wrapped() {
        let e: CutError = HistogramError::EmptyAxis.into();
        assert_eq!(e, CutError::Histogram(HistogramError::EmptyAxis));
        assert_eq!(e.to_string(), "Axis must contain at least one bin");
    }
}
