//! Bin edges of a one-dimensional measurement axis.

use std::fmt::Display;
use std::marker::PhantomData;

use qtty::{Quantity, Unit};

use super::error::HistogramError;

/// Strictly increasing bin edges `[e_0, e_1, …, e_n]` describing `n` bins.
///
/// Bin `i` spans `[e_i, e_{i+1})`. Edges are stored as raw values in the axis
/// unit `U` and handed out as [`Quantity<U>`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedAxis<U: Unit> {
    edges: Vec<f64>,
    _unit: PhantomData<fn() -> U>,
}

impl<U: Unit> BinnedAxis<U> {
    /// Creates `n_bins` equal-width bins over `[low, high]`.
    pub fn uniform(
        n_bins: usize,
        low: Quantity<U>,
        high: Quantity<U>,
    ) -> Result<Self, HistogramError> {
        if n_bins == 0 {
            return Err(HistogramError::EmptyAxis);
        }
        let (low, high) = (low.value(), high.value());
        let width = (high - low) / n_bins as f64;
        let edges = (0..=n_bins)
            .map(|i| if i == n_bins { high } else { low + width * i as f64 })
            .collect();
        Self::from_raw_edges(edges)
    }

    /// Creates an axis from explicit bin edges.
    pub fn from_edges(edges: &[Quantity<U>]) -> Result<Self, HistogramError> {
        Self::from_raw_edges(edges.iter().map(|e| e.value()).collect())
    }

    pub(crate) fn from_raw_edges(edges: Vec<f64>) -> Result<Self, HistogramError> {
        if edges.len() < 2 {
            return Err(HistogramError::EmptyAxis);
        }
        for (index, value) in edges.iter().enumerate() {
            if !value.is_finite() {
                return Err(HistogramError::NonFiniteEdge { index });
            }
        }
        for (index, pair) in edges.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(HistogramError::NonMonotonicEdges {
                    index: index + 1,
                    value: pair[1],
                });
            }
        }
        Ok(Self {
            edges,
            _unit: PhantomData,
        })
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Lower edge of the first bin.
    pub fn low(&self) -> Quantity<U> {
        Quantity::new(self.edges[0])
    }

    /// Upper edge of the last bin.
    pub fn high(&self) -> Quantity<U> {
        Quantity::new(self.edges[self.n_bins()])
    }

    /// Lower edge of bin `index`, clamped to the axis.
    pub fn bin_low_edge(&self, index: usize) -> Quantity<U> {
        Quantity::new(self.edges[index.min(self.n_bins() - 1)])
    }

    /// Upper edge of bin `index`, clamped to the axis.
    pub fn bin_high_edge(&self, index: usize) -> Quantity<U> {
        Quantity::new(self.edges[index.min(self.n_bins() - 1) + 1])
    }

    /// Bin containing `x`, or `None` when `x` lies outside the axis.
    ///
    /// Bins are half-open except the last one, which also owns the axis
    /// upper edge.
    pub fn find_bin(&self, x: Quantity<U>) -> Option<usize> {
        let x = x.value();
        let last = self.n_bins();
        if x.is_nan() || x < self.edges[0] || x > self.edges[last] {
            return None;
        }
        if x == self.edges[last] {
            return Some(last - 1);
        }
        Some(self.edges.partition_point(|edge| *edge <= x) - 1)
    }

    /// Merges `factor` adjacent bins. Trailing bins that do not fill a whole
    /// group are dropped from the axis.
    pub(crate) fn merged(&self, factor: usize) -> Result<Self, HistogramError> {
        let n_bins = self.n_bins();
        if factor == 0 || factor > n_bins {
            return Err(HistogramError::InvalidRebinFactor { factor, n_bins });
        }
        let edges = self
            .edges
            .iter()
            .step_by(factor)
            .take(n_bins / factor + 1)
            .copied()
            .collect();
        Self::from_raw_edges(edges)
    }

    pub(crate) fn raw_edges(&self) -> &[f64] {
        &self.edges
    }
}

impl<U: Unit> Display for BinnedAxis<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} bins [{:.3}, {:.3}]",
            self.n_bins(),
            self.edges[0],
            self.edges[self.n_bins()]
        )
    }
}
