//! Odd/even grouping of the regions of a placement.

use std::fmt;
use std::str::FromStr;

use crate::histogram::BinnedCounts;
use crate::statistic::{score_or_zero, TestStatistic};

use super::error::CutError;
use super::placement::{is_collapsed, regions_of};

/// One of the two alternating region groups of a placement.
///
/// Region 0 always belongs to [`Group::Odd`]; the following regions alternate
/// even, odd, even, …
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Odd,
    Even,
}

impl Group {
    /// Evaluation sequence inside a placement; later wins ties.
    pub(crate) fn sequence(self) -> u8 {
        match self {
            Group::Odd => 0,
            Group::Even => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Odd => "odd",
            Group::Even => "even",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which groups a search is allowed to select.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupFilter {
    Odd,
    Even,
    #[default]
    Both,
}

impl GroupFilter {
    /// Returns true if `group` may be selected under this filter.
    pub fn admits(self, group: Group) -> bool {
        !matches!(
            (self, group),
            (GroupFilter::Odd, Group::Even) | (GroupFilter::Even, Group::Odd)
        )
    }
}

impl FromStr for GroupFilter {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "odd" => Ok(GroupFilter::Odd),
            "even" => Ok(GroupFilter::Even),
            "both" => Ok(GroupFilter::Both),
            _ => Err(CutError::UnknownGroupFilter(s.to_string())),
        }
    }
}

/// Summed signal and background yields.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub signal: f64,
    pub background: f64,
}

impl Aggregate {
    pub fn new(signal: f64, background: f64) -> Self {
        Self { signal, background }
    }

    /// Integrates both histograms over `[lo, hi]` into this aggregate.
    pub(crate) fn accumulate<H>(&mut self, signal: &H, background: &H, lo: usize, hi: usize)
    where
        H: BinnedCounts,
    {
        self.signal += signal.integral(lo, hi);
        self.background += background.integral(lo, hi);
    }

    pub(crate) fn plus(self, other: Aggregate) -> Aggregate {
        Aggregate::new(self.signal + other.signal, self.background + other.background)
    }
}

/// Aggregates of both groups of one placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartitionAggregates {
    pub odd: Aggregate,
    pub even: Aggregate,
}

impl PartitionAggregates {
    pub fn get(&self, group: Group) -> Aggregate {
        match group {
            Group::Odd => self.odd,
            Group::Even => self.even,
        }
    }
}

/// Sums signal and background over the odd and even regions of `bins`.
///
/// The collapsed placement of a range too narrow for its order has only
/// zero-width regions: both groups come out empty.
pub fn aggregate<H>(bins: &[usize], signal: &H, background: &H) -> PartitionAggregates
where
    H: BinnedCounts,
{
    let mut out = PartitionAggregates::default();
    if is_collapsed(bins) {
        return out;
    }
    for (index, (lo, hi)) in regions_of(bins).enumerate() {
        // region 0 is odd; interior gap counter (index - 1) even -> even group
        let target = if index == 0 || (index - 1) % 2 == 1 {
            &mut out.odd
        } else {
            &mut out.even
        };
        target.accumulate(signal, background, lo, hi);
    }
    out
}

/// Score of one group of a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupScore {
    pub group: Group,
    pub statistic: f64,
    /// True if the statistic failed and was replaced by `0.0`.
    pub recovered: bool,
}

/// Scores the admitted groups in evaluation order: odd first, then even.
pub fn score_groups<'a, S>(
    aggregates: &'a PartitionAggregates,
    filter: GroupFilter,
    statistic: &'a S,
) -> impl Iterator<Item = GroupScore> + 'a
where
    S: TestStatistic + ?Sized,
{
    [Group::Odd, Group::Even]
        .into_iter()
        .filter(move |group| filter.admits(*group))
        .map(move |group| {
            let agg = aggregates.get(group);
            let (value, recovered) = score_or_zero(statistic, agg.signal, agg.background);
            GroupScore {
                group,
                statistic: value,
                recovered,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;
    use crate::statistic::ATLAS_SIGNIFICANCE;
    use qtty::{Quantity, Second};

    fn hist(contents: &[f64]) -> Histogram<Second> {
        Histogram::uniform(contents, Quantity::new(0.0), Quantity::new(contents.len() as f64))
            .unwrap()
    }

    #[test]
    fn test_single_boundary_split() {
        let s = hist(&[2.0, 5.0, 8.0, 3.0, 1.0]);
        let b = hist(&[4.0, 3.0, 2.0, 2.0, 1.0]);
        let aggs = aggregate(&[0, 1, 4], &s, &b);
        assert_eq!(aggs.odd, Aggregate::new(7.0, 7.0));
        assert_eq!(aggs.even, Aggregate::new(12.0, 5.0));
    }

    #[test]
    fn test_groups_alternate() {
        // regions: [0,0] odd, [1,1] even, [2,3] odd, [4,5] even
        let s = hist(&[1.0, 10.0, 100.0, 1000.0, 10_000.0, 100_000.0]);
        let b = hist(&[1.0; 6]);
        let aggs = aggregate(&[0, 0, 1, 3, 5], &s, &b);
        assert_eq!(aggs.odd.signal, 1.0 + 100.0 + 1000.0);
        assert_eq!(aggs.even.signal, 10.0 + 10_000.0 + 100_000.0);
        assert_eq!(aggs.odd.background + aggs.even.background, 6.0);
    }

    #[test]
    fn test_collapsed_placement_is_empty() {
        let s = hist(&[3.0, 4.0]);
        let b = hist(&[1.0, 2.0]);
        for bins in [vec![1, 1, 1], vec![0, 0, 1, 1]] {
            let aggs = aggregate(&bins, &s, &b);
            assert_eq!(aggs, PartitionAggregates::default());

            let scores: Vec<_> =
                score_groups(&aggs, GroupFilter::Both, &ATLAS_SIGNIFICANCE).collect();
            assert_eq!(scores.len(), 2);
            assert!(scores.iter().all(|s| s.statistic == 0.0 && s.recovered));
        }
    }

    #[test]
    fn test_filter_restricts_groups() {
        let aggs = PartitionAggregates {
            odd: Aggregate::new(1.0, 1.0),
            even: Aggregate::new(2.0, 1.0),
        };
        let odd: Vec<_> = score_groups(&aggs, GroupFilter::Odd, &ATLAS_SIGNIFICANCE)
            .map(|s| s.group)
            .collect();
        let even: Vec<_> = score_groups(&aggs, GroupFilter::Even, &ATLAS_SIGNIFICANCE)
            .map(|s| s.group)
            .collect();
        let both: Vec<_> = score_groups(&aggs, GroupFilter::Both, &ATLAS_SIGNIFICANCE)
            .map(|s| s.group)
            .collect();
        assert_eq!(odd, vec![Group::Odd]);
        assert_eq!(even, vec![Group::Even]);
        assert_eq!(both, vec![Group::Odd, Group::Even]);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("ODD".parse::<GroupFilter>().unwrap(), GroupFilter::Odd);
        assert_eq!("even".parse::<GroupFilter>().unwrap(), GroupFilter::Even);
        assert_eq!("Both".parse::<GroupFilter>().unwrap(), GroupFilter::Both);
        assert_eq!(
            "left".parse::<GroupFilter>(),
            Err(CutError::UnknownGroupFilter("left".to_string()))
        );
    }

    #[test]
    fn test_group_display() {
        assert_eq!(Group::Odd.to_string(), "odd");
        assert_eq!(Group::Even.to_string(), "even");
    }
}
