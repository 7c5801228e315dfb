//! Greedy region growing: a cheap alternative to the exhaustive sweep.
//!
//! Bins are scored one by one and visited from the best to the worst. A bin
//! joins the selection when it strictly raises the statistic of the running
//! aggregate; the best bin always seeds it. Accepted bins that touch are then
//! merged into contiguous regions. The result is not guaranteed to be
//! optimal, but it costs O(n log n) instead of a combinatorial sweep.

use log::debug;
use qtty::{Quantity, Unit};

use crate::histogram::BinnedCounts;
use crate::statistic::{score_or_zero, TestStatistic};

use super::partition::Aggregate;
use super::range::PreparedRange;

/// A contiguous run of accepted bins.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyRegion<U: Unit> {
    pub first_bin: usize,
    pub last_bin: usize,
    /// Lower edge of `first_bin`.
    pub low: Quantity<U>,
    /// Upper edge of `last_bin`.
    pub high: Quantity<U>,
    pub aggregate: Aggregate,
}

/// Outcome of a greedy search.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyResult<U: Unit> {
    /// Accepted regions, sorted and pairwise non-adjacent.
    pub regions: Vec<GreedyRegion<U>>,
    /// Statistic of all accepted bins taken together.
    pub statistic: f64,
    pub aggregate: Aggregate,
}

pub(crate) fn grow_regions<H, S>(
    range: &PreparedRange<H>,
    statistic: &S,
) -> GreedyResult<H::AxisUnit>
where
    H: BinnedCounts,
    S: TestStatistic + ?Sized,
{
    let bins: Vec<Aggregate> = (range.x_min..=range.x_max)
        .map(|bin| {
            Aggregate::new(
                range.signal.integral(bin, bin),
                range.background.integral(bin, bin),
            )
        })
        .collect();
    let scores: Vec<f64> = bins
        .iter()
        .map(|agg| score_or_zero(statistic, agg.signal, agg.background).0)
        .collect();

    let mut visit: Vec<usize> = (0..bins.len()).collect();
    visit.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

    let mut accepted = vec![false; bins.len()];
    let mut running = Aggregate::default();
    let mut best = f64::NEG_INFINITY;
    for offset in visit {
        let trial = running.plus(bins[offset]);
        let (value, _) = score_or_zero(statistic, trial.signal, trial.background);
        if value > best {
            accepted[offset] = true;
            running = trial;
            best = value;
        }
    }

    let mut regions: Vec<GreedyRegion<H::AxisUnit>> = Vec::new();
    for (offset, agg) in bins.iter().enumerate().filter(|(i, _)| accepted[*i]) {
        let bin = range.x_min + offset;
        match regions.last_mut() {
            Some(region) if region.last_bin + 1 == bin => {
                region.last_bin = bin;
                region.high = range.signal.bin_high_edge(bin);
                region.aggregate = region.aggregate.plus(*agg);
            }
            _ => regions.push(GreedyRegion {
                first_bin: bin,
                last_bin: bin,
                low: range.signal.bin_low_edge(bin),
                high: range.signal.bin_high_edge(bin),
                aggregate: *agg,
            }),
        }
    }

    debug!(
        "greedy: {} of {} bins accepted in {} regions, statistic {:.6}",
        accepted.iter().filter(|a| **a).count(),
        bins.len(),
        regions.len(),
        best
    );

    GreedyResult {
        regions,
        statistic: best,
        aggregate: running,
    }
}
