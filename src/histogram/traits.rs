//! The read-only contract the cut search consumes.

use qtty::{Quantity, Unit};

use super::error::HistogramError;

/// Binned counts over a one-dimensional axis.
///
/// The search only needs range integrals, bin edges and coordinate lookup.
/// Signal and background are two independent implementors that must share
/// the same binning (see [`BinnedCounts::same_binning`]).
///
/// All indices are zero-based and live in the implementor's own (possibly
/// rebinned) index space.
///
/// # Example
///
/// ```ignore
/// use cutopt::histogram::{BinnedCounts, Histogram};
/// use qtty::{Quantity, Second};
///
/// let h = Histogram::<Second>::uniform(&[2.0, 5.0, 8.0], Quantity::new(0.0), Quantity::new(3.0))?;
/// assert_eq!(h.integral(0, 1), 7.0);
/// assert_eq!(h.integral(2, 1), 0.0);
/// ```
pub trait BinnedCounts: Sized {
    /// Unit of the axis coordinates.
    type AxisUnit: Unit;

    /// Merges `factor` adjacent bins into one. A factor of 1 is a copy.
    fn rebin(&self, factor: usize) -> Result<Self, HistogramError>;

    /// Bin containing the coordinate `x`, or `None` if `x` is off the axis.
    fn bin_index_for_coordinate(&self, x: Quantity<Self::AxisUnit>) -> Option<usize>;

    /// First usable bin index.
    fn first_bin_index(&self) -> usize;

    /// Last usable bin index.
    fn last_bin_index(&self) -> usize;

    /// Sum of bin contents over `[lo, hi]` inclusive; `0.0` when `lo > hi`.
    fn integral(&self, lo: usize, hi: usize) -> f64;

    /// Lower coordinate edge of bin `index`.
    fn bin_low_edge(&self, index: usize) -> Quantity<Self::AxisUnit>;

    /// Upper coordinate edge of bin `index`.
    fn bin_high_edge(&self, index: usize) -> Quantity<Self::AxisUnit>;

    /// Returns true if both share identical bin edges.
    fn same_binning(&self, other: &Self) -> bool;
}
