//! cutopt - optimal cuts on binned signal/background distributions
//!
//! Finds the boundary placement over a histogram axis whose alternating
//! regions maximize a signal-over-background test statistic, searching
//! every boundary count up to a configured order.

pub mod control;
pub mod histogram;
pub mod search;
pub mod statistic;

pub use control::CancelToken;
pub use histogram::{BinnedCounts, Histogram};
pub use search::{CutOptimizer, CutResult, Group, GroupFilter, SearchConfig};
pub use statistic::{TestStatistic, ATLAS_SIGNIFICANCE};
