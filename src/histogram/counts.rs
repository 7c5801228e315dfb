//! In-memory histogram with prefix sums for constant-time range integrals.

use qtty::{Quantity, Unit};

use super::axis::BinnedAxis;
use super::error::HistogramError;
use super::traits::BinnedCounts;

/// A one-dimensional histogram of counts.
///
/// Alongside the raw contents a cumulative table is kept, so that
/// [`BinnedCounts::integral`] is O(1) regardless of range width. Counts
/// that fall off the axis after a rebin are kept in an overflow
/// accumulator and never enter an integral.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram<U: Unit> {
    axis: BinnedAxis<U>,
    contents: Vec<f64>,
    cumulative: Vec<f64>,
    overflow: f64,
}

impl<U: Unit> Histogram<U> {
    /// Creates a histogram over `axis` with one content per bin.
    pub fn new(axis: BinnedAxis<U>, contents: Vec<f64>) -> Result<Self, HistogramError> {
        Self::with_overflow(axis, contents, 0.0)
    }

    /// Creates a histogram of equal-width bins spanning `[low, high]`.
    pub fn uniform(
        contents: &[f64],
        low: Quantity<U>,
        high: Quantity<U>,
    ) -> Result<Self, HistogramError> {
        let axis = BinnedAxis::uniform(contents.len(), low, high)?;
        Self::new(axis, contents.to_vec())
    }

    fn with_overflow(
        axis: BinnedAxis<U>,
        contents: Vec<f64>,
        overflow: f64,
    ) -> Result<Self, HistogramError> {
        if contents.len() != axis.n_bins() {
            return Err(HistogramError::ContentLengthMismatch {
                expected: axis.n_bins(),
                actual: contents.len(),
            });
        }
        if let Some(index) = contents.iter().position(|c| !c.is_finite()) {
            return Err(HistogramError::NonFiniteContent { index });
        }

        let mut cumulative = Vec::with_capacity(contents.len() + 1);
        let mut running = 0.0;
        cumulative.push(running);
        for content in &contents {
            running += content;
            cumulative.push(running);
        }

        Ok(Self {
            axis,
            contents,
            cumulative,
            overflow,
        })
    }

    pub fn axis(&self) -> &BinnedAxis<U> {
        &self.axis
    }

    pub fn n_bins(&self) -> usize {
        self.contents.len()
    }

    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// Content of bin `index`, or `0.0` off the axis.
    pub fn bin_content(&self, index: usize) -> f64 {
        self.contents.get(index).copied().unwrap_or(0.0)
    }

    /// Counts merged past the last bin by a rebin.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Sum of every bin on the axis.
    pub fn total(&self) -> f64 {
        self.cumulative[self.contents.len()]
    }
}

impl<U: Unit> BinnedCounts for Histogram<U> {
    type AxisUnit = U;

    fn rebin(&self, factor: usize) -> Result<Self, HistogramError> {
        if factor == 1 {
            return Ok(self.clone());
        }
        let axis = self.axis.merged(factor)?;
        let kept = axis.n_bins() * factor;
        let contents = self.contents[..kept]
            .chunks(factor)
            .map(|group| group.iter().sum())
            .collect();
        let spilled: f64 = self.contents[kept..].iter().sum();
        Self::with_overflow(axis, contents, self.overflow + spilled)
    }

    fn bin_index_for_coordinate(&self, x: Quantity<U>) -> Option<usize> {
        self.axis.find_bin(x)
    }

    fn first_bin_index(&self) -> usize {
        0
    }

    fn last_bin_index(&self) -> usize {
        self.contents.len() - 1
    }

    fn integral(&self, lo: usize, hi: usize) -> f64 {
        let n = self.contents.len();
        if lo > hi || lo >= n {
            return 0.0;
        }
        let hi = hi.min(n - 1);
        self.cumulative[hi + 1] - self.cumulative[lo]
    }

    fn bin_low_edge(&self, index: usize) -> Quantity<U> {
        self.axis.bin_low_edge(index)
    }

    fn bin_high_edge(&self, index: usize) -> Quantity<U> {
        self.axis.bin_high_edge(index)
    }

    fn same_binning(&self, other: &Self) -> bool {
        self.axis.raw_edges() == other.axis.raw_edges()
    }
}
