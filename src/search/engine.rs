//! Core sweep over the placements of one order.
//!
//! A sweep walks placements with a [`PlacementEnumerator`], aggregates each
//! one into odd/even yields and offers the admitted group scores to a running
//! `>=` maximum. Parallel searches cut the rank space of an order into
//! contiguous shards, sweep each shard independently and reduce the local
//! winners with [`Candidate::supersedes`], which reproduces the sequential
//! tie-break exactly.

use log::{debug, trace};
use rayon::prelude::*;

use crate::control::CancelToken;
use crate::histogram::BinnedCounts;
use crate::statistic::TestStatistic;

use super::candidate::Candidate;
use super::config::Parallelism;
use super::error::CutError;
use super::partition::{aggregate, score_groups, GroupFilter};
use super::placement::{placement_count, PlacementEnumerator};

/// Counters collected while searching.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub orders_searched: usize,
    pub placements_visited: u64,
    /// Statistic evaluations (one or two per placement).
    pub evaluations: u64,
    /// Evaluations whose numeric failure was replaced by `0.0`.
    pub recovered_errors: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.orders_searched += other.orders_searched;
        self.placements_visited += other.placements_visited;
        self.evaluations += other.evaluations;
        self.recovered_errors += other.recovered_errors;
    }
}

/// Read-only inputs shared by every sweep of a search.
pub(crate) struct SearchContext<'a, H, S: ?Sized> {
    pub signal: &'a H,
    pub background: &'a H,
    pub statistic: &'a S,
    pub groups: GroupFilter,
    pub x_min: usize,
    pub x_max: usize,
    pub cancel: Option<&'a CancelToken>,
    pub cancel_check_every: u64,
}

impl<H, S> SearchContext<'_, H, S>
where
    H: BinnedCounts,
    S: TestStatistic + ?Sized,
{
    fn check_cancelled(&self) -> Result<(), CutError> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(CutError::Cancelled);
        }
        Ok(())
    }
}

/// Best candidate of one order and the work it took.
#[derive(Debug, Clone)]
pub(crate) struct OrderOutcome {
    pub best: Candidate,
    pub stats: SearchStats,
}

/// Sweeps up to `len` placements of `order`, starting at rank `start`.
pub(crate) fn sweep<H, S>(
    ctx: &SearchContext<'_, H, S>,
    order: usize,
    start: u64,
    len: u64,
) -> Result<OrderOutcome, CutError>
where
    H: BinnedCounts,
    S: TestStatistic + ?Sized,
{
    let mut enumerator = PlacementEnumerator::new(ctx.x_min, ctx.x_max, order)?;
    let mut best = Candidate::unscored(order, enumerator.bins());
    let mut stats = SearchStats::default();

    if start > 0 && !enumerator.seek(start) {
        return Ok(OrderOutcome { best, stats });
    }

    let mut visited = 0u64;
    loop {
        if visited % ctx.cancel_check_every == 0 {
            ctx.check_cancelled()?;
        }

        let aggregates = aggregate(enumerator.bins(), ctx.signal, ctx.background);
        for score in score_groups(&aggregates, ctx.groups, ctx.statistic) {
            stats.evaluations += 1;
            if score.recovered {
                stats.recovered_errors += 1;
            }
            // >= : later placements, and even after odd, win ties
            if score.statistic >= best.statistic {
                best.assign(score.statistic, score.group, enumerator.rank(), enumerator.bins());
                trace!(
                    "order {order}: new best {:.6} ({}) at {:?}",
                    score.statistic,
                    score.group,
                    enumerator.bins()
                );
            }
        }

        visited += 1;
        if visited >= len || !enumerator.advance() {
            break;
        }
    }

    stats.placements_visited = visited;
    Ok(OrderOutcome { best, stats })
}

/// Finds the best placement of a single order.
pub(crate) fn search_order<H, S>(
    ctx: &SearchContext<'_, H, S>,
    order: usize,
    parallelism: Parallelism,
) -> Result<OrderOutcome, CutError>
where
    H: BinnedCounts + Sync,
    S: TestStatistic + ?Sized,
{
    let Some(total) = placement_count(ctx.x_min, ctx.x_max, order) else {
        debug!("order {order}: placement count overflows u64, sweeping sequentially");
        return sweep(ctx, order, 0, u64::MAX);
    };

    let shards = parallelism.shards_for(total);
    if shards <= 1 {
        return sweep(ctx, order, 0, total);
    }

    let chunk = total.div_ceil(shards);
    let n_shards = total.div_ceil(chunk);
    debug!("order {order}: {total} placements in {n_shards} shards of {chunk}");

    let outcomes: Vec<Result<OrderOutcome, CutError>> = (0..n_shards)
        .into_par_iter()
        .map(|shard| {
            let start = shard * chunk;
            sweep(ctx, order, start, chunk.min(total - start))
        })
        .collect();

    let mut best = Candidate::unscored(order, &[]);
    let mut stats = SearchStats::default();
    for outcome in outcomes {
        let outcome = outcome?;
        stats.merge(&outcome.stats);
        if outcome.best.supersedes(&best) {
            best = outcome.best;
        }
    }
    Ok(OrderOutcome { best, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;
    use crate::search::partition::Group;
    use crate::statistic::ATLAS_SIGNIFICANCE;
    use qtty::{Quantity, Second};

    fn hist(contents: &[f64]) -> Histogram<Second> {
        Histogram::uniform(contents, Quantity::new(0.0), Quantity::new(contents.len() as f64))
            .unwrap()
    }

    fn wavy(n: usize, phase: f64) -> Vec<f64> {
        (0..n)
            .map(|i| 5.0 + 4.0 * ((i as f64) * 0.7 + phase).sin())
            .collect()
    }

    fn context<'a>(
        s: &'a Histogram<Second>,
        b: &'a Histogram<Second>,
        cancel: Option<&'a CancelToken>,
    ) -> SearchContext<'a, Histogram<Second>, crate::statistic::AtlasSignificance> {
        SearchContext {
            signal: s,
            background: b,
            statistic: &ATLAS_SIGNIFICANCE,
            groups: GroupFilter::Both,
            x_min: 0,
            x_max: s.n_bins() - 1,
            cancel,
            cancel_check_every: 1,
        }
    }

    #[test]
    fn test_sweep_counts_work() {
        let s = hist(&[2.0, 5.0, 8.0, 3.0, 1.0]);
        let b = hist(&[4.0, 3.0, 2.0, 2.0, 1.0]);
        let ctx = context(&s, &b, None);
        let outcome = sweep(&ctx, 2, 0, u64::MAX).unwrap();
        assert_eq!(outcome.stats.placements_visited, 6);
        assert_eq!(outcome.stats.evaluations, 12);
        assert_eq!(outcome.best.order(), 2);
        assert!(outcome.best.statistic().is_finite());
    }

    #[test]
    fn test_even_wins_exact_tie() {
        // Symmetric data: splitting at bin 1 gives identical odd/even yields.
        let s = hist(&[3.0, 3.0]);
        let b = hist(&[1.0, 1.0]);
        let ctx = context(&s, &b, None);
        let outcome = sweep(&ctx, 1, 0, u64::MAX).unwrap();
        assert_eq!(outcome.best.bins(), &[0, 0, 1]);
        assert_eq!(outcome.best.group(), Group::Even);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let s = hist(&wavy(24, 0.0));
        let b = hist(&wavy(24, 1.9));
        let ctx = context(&s, &b, None);
        for order in 1..=4 {
            let sequential = search_order(&ctx, order, Parallelism::Sequential).unwrap();
            let total = placement_count(0, 23, order).unwrap();
            // force several shards regardless of the workload correction
            let chunk = total.div_ceil(5);
            let mut best = Candidate::unscored(order, &[]);
            let mut visited = 0;
            for shard in 0..total.div_ceil(chunk) {
                let start = shard * chunk;
                let outcome = sweep(&ctx, order, start, chunk.min(total - start)).unwrap();
                visited += outcome.stats.placements_visited;
                if outcome.best.supersedes(&best) {
                    best = outcome.best;
                }
            }
            assert_eq!(visited, total);
            assert_eq!(best, sequential.best);
        }
    }

    #[test]
    fn test_search_order_parallel_hint() {
        let s = hist(&wavy(40, 0.3));
        let b = hist(&wavy(40, 2.2));
        let ctx = context(&s, &b, None);
        let sequential = search_order(&ctx, 3, Parallelism::Sequential).unwrap();
        let parallel = search_order(&ctx, 3, Parallelism::Parallel(4)).unwrap();
        assert_eq!(parallel.best, sequential.best);
        assert_eq!(
            parallel.stats.placements_visited,
            sequential.stats.placements_visited
        );
    }

    #[test]
    fn test_cancelled_sweep() {
        let s = hist(&[1.0, 2.0, 3.0]);
        let b = hist(&[1.0, 1.0, 1.0]);
        let token = CancelToken::new();
        token.cancel();
        let ctx = context(&s, &b, Some(&token));
        assert_eq!(
            search_order(&ctx, 1, Parallelism::Sequential).unwrap_err(),
            CutError::Cancelled
        );
    }

    #[test]
    fn test_seek_past_end_yields_unscored() {
        let s = hist(&[1.0, 2.0, 3.0]);
        let b = hist(&[1.0, 1.0, 1.0]);
        let ctx = context(&s, &b, None);
        let outcome = sweep(&ctx, 1, 10, 5).unwrap();
        assert_eq!(outcome.stats.placements_visited, 0);
        assert_eq!(outcome.best.statistic(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = SearchStats {
            orders_searched: 1,
            placements_visited: 4,
            evaluations: 8,
            recovered_errors: 1,
        };
        let copy = a;
        a.merge(&copy);
        assert_eq!(a.placements_visited, 8);
        assert_eq!(a.recovered_errors, 2);
    }
}
