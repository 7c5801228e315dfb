//! Binned signal/background counts over a one-dimensional axis.
//!
//! The search engine never touches bin storage directly. It consumes the
//! [`BinnedCounts`] contract (range integrals, bin edges, coordinate lookup
//! and rebinning), which [`Histogram`] implements for in-memory data.

mod axis;
mod counts;
mod error;
mod traits;

pub use axis::BinnedAxis;
pub use counts::Histogram;
pub use error::HistogramError;
pub use traits::BinnedCounts;
