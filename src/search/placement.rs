//! Odometer-style enumeration of boundary placements.
//!
//! A placement of order `k` over `[x_min, x_max]` is the sequence
//! `[x_min, b_1, …, b_k, x_max]` with `x_min <= b_1 < b_2 < … < b_k < x_max`.
//! The enumerator starts with the interior packed at the low end and walks
//! every placement exactly once, in colexicographic order, mutating a single
//! buffer in place. It finishes with the interior packed at the high end,
//! `[x_min, x_max-k, …, x_max-1, x_max]`.
//!
//! When the range is too narrow to hold `k` distinct interior boundaries
//! (`k > x_max - x_min`, which includes `x_min == x_max`) there is exactly one,
//! degenerate placement whose surplus boundaries sit on `x_max`. It does not
//! split the range, so it aggregates to empty yields.

use super::error::CutError;

/// Number of placements of `order` interior boundaries over `[x_min, x_max]`.
///
/// Returns `None` if the count does not fit in a `u64`.
pub fn placement_count(x_min: usize, x_max: usize, order: usize) -> Option<u64> {
    let width = x_max.saturating_sub(x_min);
    if order > width {
        return Some(1);
    }
    binomial(width, order)
}

/// `C(n, k)`, or `None` on overflow.
pub(crate) fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for j in 0..k {
        acc = acc * (n - j) as u128 / (j + 1) as u128;
        if acc > u64::MAX as u128 {
            return None;
        }
    }
    Some(acc as u64)
}

/// Explicit state of the placement odometer for one order.
#[derive(Debug, Clone)]
pub struct PlacementEnumerator {
    bins: Vec<usize>,
    initial: Vec<usize>,
    degenerate: bool,
    rank: u64,
}

impl PlacementEnumerator {
    /// Creates the enumerator positioned on the first placement of `order`.
    ///
    /// Fails with [`CutError::InvertedRange`] if `x_min > x_max` and with
    /// [`CutError::InvalidOrder`] if `order` is zero.
    pub fn new(x_min: usize, x_max: usize, order: usize) -> Result<Self, CutError> {
        if x_min > x_max {
            return Err(CutError::InvertedRange { x_min, x_max });
        }
        if order < 1 {
            return Err(CutError::InvalidOrder { order });
        }

        let mut initial = Vec::with_capacity(order + 2);
        initial.push(x_min);
        initial.extend((0..order).map(|i| (x_min + i).min(x_max)));
        initial.push(x_max);

        Ok(Self {
            bins: initial.clone(),
            initial,
            degenerate: order > x_max - x_min,
            rank: 0,
        })
    }

    /// Current placement, endpoints included.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Number of interior boundaries.
    pub fn order(&self) -> usize {
        self.bins.len() - 2
    }

    pub fn x_min(&self) -> usize {
        self.bins[0]
    }

    pub fn x_max(&self) -> usize {
        self.bins[self.bins.len() - 1]
    }

    /// Position of the current placement in enumeration order.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    /// Returns true if the range cannot hold `order` distinct boundaries.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Total number of placements this enumerator visits.
    pub fn len(&self) -> Option<u64> {
        placement_count(self.x_min(), self.x_max(), self.order())
    }

    /// Moves to the next placement. Returns `false`, leaving the placement
    /// untouched, once every placement has been visited.
    ///
    /// Interior positions are scanned left to right. A position is saturated
    /// when bumping it would collide with its right neighbour. The first
    /// unsaturated position is incremented and every saturated position to
    /// its left is reset to its initial value.
    pub fn advance(&mut self) -> bool {
        if self.degenerate {
            return false;
        }
        let last = self.bins.len() - 1;
        for i in 1..last {
            if self.bins[i] + 1 == self.bins[i + 1] {
                continue;
            }
            self.bins[i] += 1;
            self.bins[1..i].copy_from_slice(&self.initial[1..i]);
            self.rank += 1;
            return true;
        }
        false
    }

    /// Jumps to the placement at `rank`. Returns `false`, leaving the
    /// placement untouched, if `rank` is past the end.
    pub fn seek(&mut self, rank: u64) -> bool {
        match self.len() {
            Some(len) if rank < len => {}
            _ => return false,
        }
        if self.degenerate {
            return true;
        }

        // Colex unranking: rank = sum over i of C(b_i - x_min, i).
        let x_min = self.x_min();
        let mut remaining = rank;
        let mut upper = self.x_max() - x_min;
        for i in (1..=self.order()).rev() {
            let mut c = upper - 1;
            while binomial(c, i).map_or(true, |v| v > remaining) {
                c -= 1;
            }
            remaining -= binomial(c, i).unwrap_or(0);
            self.bins[i] = x_min + c;
            upper = c;
        }
        self.rank = rank;
        true
    }

    /// Inclusive bin spans of the regions of the current placement.
    ///
    /// Region 0 is `[x_min, b_1]`; region `i` is `[b_i + 1, b_{i+1}]`.
    /// A span with `lo > hi` is empty.
    pub fn regions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        regions_of(&self.bins)
    }
}

/// Returns true for the collapsed placement of a range too narrow for its
/// order: its last interior boundary already sits on `x_max`.
pub(crate) fn is_collapsed(bins: &[usize]) -> bool {
    match bins {
        [_, .., last_interior, x_max] => last_interior >= x_max,
        _ => false,
    }
}

/// Inclusive bin spans delimited by a placement `[x_min, b_1, …, x_max]`.
pub(crate) fn regions_of(bins: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    bins.windows(2).enumerate().map(|(i, pair)| {
        let lo = if i == 0 { pair[0] } else { pair[0] + 1 };
        (lo, pair[1])
    })
}
