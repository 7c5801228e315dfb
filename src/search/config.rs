//! Configuration for cut searches.

use qtty::{Quantity, Unit};

use crate::control::CancelToken;

use super::error::CutError;
use super::partition::GroupFilter;

const DEFAULT_CANCEL_CHECK_EVERY: usize = 1024;

/// Fewest placements worth handing to a shard of their own.
pub const MIN_PLACEMENTS_PER_SHARD: u64 = 4096;

/// How the placements of one order are swept.
///
/// The rank space `0..C(m, k)` of an order is cut into contiguous shards,
/// each swept by one rayon task. The shard count is an upper bound: small
/// orders are swept in a single shard on the calling thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// One shard, swept on the calling thread.
    #[default]
    Sequential,
    /// Up to `n` shards swept on the rayon pool. `Parallel(0)` and
    /// `Parallel(1)` sweep a single shard.
    Parallel(usize),
}

impl Parallelism {
    /// Requests `shards` shards per order; `0` asks for one per rayon worker.
    pub fn with_shards(shards: usize) -> Self {
        match shards {
            0 => Self::Parallel(rayon::current_num_threads()),
            1 => Self::Sequential,
            n => Self::Parallel(n),
        }
    }

    /// Number of shards an order with `placements` placements is cut into.
    ///
    /// Never more than requested, and every shard but the last gets at
    /// least [`MIN_PLACEMENTS_PER_SHARD`] placements.
    pub fn shards_for(self, placements: u64) -> u64 {
        match self {
            Self::Sequential => 1,
            Self::Parallel(requested) => {
                let affordable = placements / MIN_PLACEMENTS_PER_SHARD;
                (requested as u64).min(affordable).max(1)
            }
        }
    }
}

/// Parameters of a cut search.
///
/// Bounds left as `None` default to the full extent of the (rebinned) axis.
///
/// # Example
///
/// ```ignore
/// use cutopt::search::{GroupFilter, SearchConfig};
/// use qtty::{Quantity, Second};
///
/// let config = SearchConfig::<Second>::default()
///     .with_max_order(3)
///     .with_groups(GroupFilter::Even)
///     .with_range(Some(Quantity::new(0.5)), None);
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig<U: Unit> {
    /// Highest number of interior boundaries tried; orders `1..=max_order`
    /// are all searched.
    pub max_order: usize,
    /// Region groups the search may select.
    pub groups: GroupFilter,
    /// Number of adjacent bins merged before the search.
    pub rebin: usize,
    /// Lower end of the searched range (axis coordinate).
    pub x_min: Option<Quantity<U>>,
    /// Upper end of the searched range (axis coordinate).
    pub x_max: Option<Quantity<U>>,
    pub parallelism: Parallelism,
    /// Placements swept between two cancellation checks.
    pub cancel_check_every: usize,
    pub cancel: Option<CancelToken>,
}

impl<U: Unit> Default for SearchConfig<U> {
    fn default() -> Self {
        Self {
            max_order: 1,
            groups: GroupFilter::Both,
            rebin: 1,
            x_min: None,
            x_max: None,
            parallelism: Parallelism::Sequential,
            cancel_check_every: DEFAULT_CANCEL_CHECK_EVERY,
            cancel: None,
        }
    }
}

impl<U: Unit> SearchConfig<U> {
    /// Creates a configuration searching orders `1..=max_order`.
    pub fn new(max_order: usize) -> Self {
        Self::default().with_max_order(max_order)
    }

    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn with_groups(mut self, groups: GroupFilter) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_rebin(mut self, rebin: usize) -> Self {
        self.rebin = rebin;
        self
    }

    pub fn with_range(mut self, x_min: Option<Quantity<U>>, x_max: Option<Quantity<U>>) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_cancel_check_every(mut self, every: usize) -> Self {
        self.cancel_check_every = every;
        self
    }

    /// Rejects settings no search can run with.
    pub fn validate(&self) -> Result<(), CutError> {
        if self.max_order < 1 {
            return Err(CutError::InvalidOrder {
                order: self.max_order,
            });
        }
        if self.rebin < 1 {
            return Err(CutError::InvalidRebin { factor: self.rebin });
        }
        Ok(())
    }

    pub(crate) fn normalized_cancel_check_every(&self) -> u64 {
        self.cancel_check_every.max(1) as u64
    }
}
