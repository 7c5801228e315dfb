//! Optimal cut search over a signal/background histogram pair.
//!
//! A search places `k` interior boundaries between the ends of a bin range,
//! which splits it into `k + 1` contiguous regions. Regions alternate between
//! two groups (region 0 is odd, then even, odd, …) and each group's summed
//! yields are scored with a [`TestStatistic`]. The search returns the
//! placement and group with the highest score over every order `1..=n`.
//!
//! # Algorithm
//!
//! 1. **Preparation**: check both histograms share a binning, rebin them and
//!    resolve the coordinate range to bin indices.
//! 2. **Enumeration**: for each order, walk every placement with a
//!    [`PlacementEnumerator`], optionally sharded over the rayon pool.
//! 3. **Scoring**: aggregate each placement into odd/even yields with
//!    prefix-sum integrals and keep a running `>=` maximum.
//! 4. **Conversion**: map the winning bin indices back to axis coordinates.
//!
//! Ties go to the candidate visited last: even over odd inside a placement,
//! later placements over earlier ones, higher orders over lower ones.
//!
//! # Module Structure
//!
//! - `placement` - boundary odometer and ranking
//! - `partition` - odd/even aggregation and group scoring
//! - `candidate` - scored placements and their tie-break
//! - `engine` - per-order sweeps, sharding and cancellation
//! - `greedy` - greedy region growing

mod candidate;
mod config;
mod engine;
mod error;
mod greedy;
mod partition;
mod placement;
mod range;

use std::fmt;

use log::debug;
use qtty::{Quantity, Unit};

use crate::histogram::BinnedCounts;
use crate::statistic::{AtlasSignificance, TestStatistic};

pub use candidate::Candidate;
pub use config::{Parallelism, SearchConfig, MIN_PLACEMENTS_PER_SHARD};
pub use engine::SearchStats;
pub use error::CutError;
pub use greedy::{GreedyRegion, GreedyResult};
pub use partition::{
    aggregate, score_groups, Aggregate, Group, GroupFilter, GroupScore, PartitionAggregates,
};
pub use placement::{placement_count, PlacementEnumerator};

use engine::{search_order, OrderOutcome, SearchContext};
use range::PreparedRange;

/// Best cut placement found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct CutResult<U: Unit> {
    /// Boundary coordinates, range ends included (`order + 2` entries).
    pub cuts: Vec<Quantity<U>>,
    /// Group of regions the statistic was computed over.
    pub group: Group,
    pub statistic: f64,
    pub order: usize,
    /// Bin indices of the boundaries in the rebinned histogram.
    pub bins: Vec<usize>,
    pub stats: SearchStats,
}

impl<U: Unit> CutResult<U> {
    /// Regions of the selected group as `(low, high)` coordinate pairs.
    pub fn selected_regions(&self) -> Vec<(Quantity<U>, Quantity<U>)> {
        self.cuts
            .windows(2)
            .enumerate()
            .filter(|(index, _)| {
                let odd = *index == 0 || (index - 1) % 2 == 1;
                odd == (self.group == Group::Odd)
            })
            .map(|(_, pair)| (pair[0], pair[1]))
            .collect()
    }
}

impl<U: Unit> fmt::Display for CutResult<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order {} {} regions, statistic {:.4}, cuts [",
            self.order, self.group, self.statistic
        )?;
        for (i, cut) in self.cuts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:.3}", cut.value())?;
        }
        f.write_str("]")
    }
}

#[cfg(feature = "serde")]
impl<U: Unit> serde::Serialize for CutResult<U> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let cuts: Vec<f64> = self.cuts.iter().map(|cut| cut.value()).collect();
        let mut state = serializer.serialize_struct("CutResult", 6)?;
        state.serialize_field("cuts", &cuts)?;
        state.serialize_field("group", &self.group)?;
        state.serialize_field("statistic", &self.statistic)?;
        state.serialize_field("order", &self.order)?;
        state.serialize_field("bins", &self.bins)?;
        state.serialize_field("stats", &self.stats)?;
        state.end()
    }
}

/// Exhaustive cut optimizer.
///
/// # Example
///
/// ```ignore
/// use cutopt::{CutOptimizer, Histogram, SearchConfig};
/// use qtty::{Quantity, Second};
///
/// let lo = Quantity::<Second>::new(0.0);
/// let hi = Quantity::<Second>::new(5.0);
/// let signal = Histogram::uniform(&[2.0, 5.0, 8.0, 3.0, 1.0], lo, hi)?;
/// let background = Histogram::uniform(&[4.0, 3.0, 2.0, 2.0, 1.0], lo, hi)?;
///
/// let result = CutOptimizer::new().optimize(&signal, &background, &SearchConfig::new(2))?;
/// println!("{result}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CutOptimizer<S = AtlasSignificance> {
    statistic: S,
}

impl CutOptimizer {
    /// Creates an optimizer scoring with the ATLAS significance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: TestStatistic> CutOptimizer<S> {
    /// Creates an optimizer scoring with `statistic`.
    pub fn with_statistic(statistic: S) -> Self {
        Self { statistic }
    }

    pub fn statistic(&self) -> &S {
        &self.statistic
    }

    /// Searches every order `1..=config.max_order` and returns the best cut.
    ///
    /// Among equal scores the highest order wins.
    pub fn optimize<H>(
        &self,
        signal: &H,
        background: &H,
        config: &SearchConfig<H::AxisUnit>,
    ) -> Result<CutResult<H::AxisUnit>, CutError>
    where
        H: BinnedCounts + Sync,
    {
        config.validate()?;
        let range = PreparedRange::new(signal, background, config)?;
        let ctx = range.context(&self.statistic, config);
        debug!(
            "optimizing with {} over bins [{}, {}], orders 1..={}",
            self.statistic.name(),
            range.x_min,
            range.x_max,
            config.max_order
        );

        // validate() guarantees order 1 exists; it seeds the running best
        let first = search_logged(&ctx, 1, config.parallelism)?;
        let mut best = first.best;
        let mut stats = first.stats;
        stats.orders_searched = 1;
        for order in 2..=config.max_order {
            let outcome = search_logged(&ctx, order, config.parallelism)?;
            stats.merge(&outcome.stats);
            stats.orders_searched += 1;
            // >= : higher orders win ties
            if outcome.best.statistic() >= best.statistic() {
                best = outcome.best;
            }
        }

        let result = finish(&range, best, stats);
        debug!("best cut: {result}");
        Ok(result)
    }

    /// Searches a single order and returns its best cut.
    pub fn optimize_order<H>(
        &self,
        signal: &H,
        background: &H,
        config: &SearchConfig<H::AxisUnit>,
        order: usize,
    ) -> Result<CutResult<H::AxisUnit>, CutError>
    where
        H: BinnedCounts + Sync,
    {
        if order < 1 {
            return Err(CutError::InvalidOrder { order });
        }
        config.validate()?;
        let range = PreparedRange::new(signal, background, config)?;
        let ctx = range.context(&self.statistic, config);

        let outcome = search_logged(&ctx, order, config.parallelism)?;
        let mut stats = outcome.stats;
        stats.orders_searched = 1;
        Ok(finish(&range, outcome.best, stats))
    }

    /// Runs the greedy region-growing heuristic over the configured range.
    ///
    /// `max_order`, `groups` and `parallelism` do not apply.
    pub fn grow_regions<H>(
        &self,
        signal: &H,
        background: &H,
        config: &SearchConfig<H::AxisUnit>,
    ) -> Result<GreedyResult<H::AxisUnit>, CutError>
    where
        H: BinnedCounts,
    {
        config.validate()?;
        let range = PreparedRange::new(signal, background, config)?;
        Ok(greedy::grow_regions(&range, &self.statistic))
    }
}

fn search_logged<H, S>(
    ctx: &SearchContext<'_, H, S>,
    order: usize,
    parallelism: Parallelism,
) -> Result<OrderOutcome, CutError>
where
    H: BinnedCounts + Sync,
    S: TestStatistic + ?Sized,
{
    let outcome = search_order(ctx, order, parallelism)?;
    debug!(
        "order {order}: {} placements, best {:.6} ({})",
        outcome.stats.placements_visited,
        outcome.best.statistic(),
        outcome.best.group()
    );
    Ok(outcome)
}

fn finish<H: BinnedCounts>(
    range: &PreparedRange<H>,
    best: Candidate,
    stats: SearchStats,
) -> CutResult<H::AxisUnit> {
    CutResult {
        cuts: range.coordinates(best.bins()),
        group: best.group(),
        statistic: best.statistic(),
        order: best.order(),
        bins: best.bins,
        stats,
    }
}
