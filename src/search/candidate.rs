//! Scored placement candidates and the tie-break between them.

use super::partition::Group;

/// A scored boundary placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub(crate) statistic: f64,
    pub(crate) group: Group,
    pub(crate) order: usize,
    pub(crate) rank: u64,
    pub(crate) bins: Vec<usize>,
}

impl Candidate {
    /// Placeholder that any scored placement supersedes.
    pub(crate) fn unscored(order: usize, bins: &[usize]) -> Self {
        Self {
            statistic: f64::NEG_INFINITY,
            group: Group::Odd,
            order,
            rank: 0,
            bins: bins.to_vec(),
        }
    }

    /// Replaces this candidate's contents in place.
    pub(crate) fn assign(&mut self, statistic: f64, group: Group, rank: u64, bins: &[usize]) {
        self.statistic = statistic;
        self.group = group;
        self.rank = rank;
        self.bins.clear();
        self.bins.extend_from_slice(bins);
    }

    /// Position of this candidate in the sequential sweep: orders ascending,
    /// placements in enumeration order, odd before even.
    fn sequence_key(&self) -> (usize, u64, u8) {
        (self.order, self.rank, self.group.sequence())
    }

    /// Returns true if this candidate wins against `other`.
    ///
    /// A higher statistic wins; on a tie the candidate visited later in the
    /// sequential sweep wins, which is what a running `>=` maximum keeps.
    pub fn supersedes(&self, other: &Candidate) -> bool {
        self.statistic > other.statistic
            || (self.statistic == other.statistic && self.sequence_key() >= other.sequence_key())
    }

    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Rank of the placement within its order.
    pub fn rank(&self) -> u64 {
        self.rank
    }

    /// Placement as bin indices, endpoints included.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(statistic: f64, group: Group, order: usize, rank: u64) -> Candidate {
        Candidate {
            statistic,
            group,
            order,
            rank,
            bins: vec![0, 1, 4],
        }
    }

    #[test]
    fn test_higher_statistic_wins() {
        let a = candidate(2.0, Group::Odd, 1, 0);
        let b = candidate(1.0, Group::Even, 3, 9);
        assert!(a.supersedes(&b));
        assert!(!b.supersedes(&a));
    }

    #[test]
    fn test_even_wins_tie_in_same_placement() {
        let odd = candidate(1.5, Group::Odd, 1, 2);
        let even = candidate(1.5, Group::Even, 1, 2);
        assert!(even.supersedes(&odd));
        assert!(!odd.supersedes(&even));
    }

    #[test]
    fn test_later_placement_and_higher_order_win_ties() {
        let early = candidate(1.0, Group::Even, 1, 3);
        let late = candidate(1.0, Group::Odd, 1, 4);
        let higher = candidate(1.0, Group::Odd, 2, 0);
        assert!(late.supersedes(&early));
        assert!(higher.supersedes(&late));
        assert!(!early.supersedes(&higher));
    }

    #[test]
    fn test_unscored_loses_to_anything() {
        let placeholder = Candidate::unscored(1, &[0, 0, 3]);
        let zero = candidate(0.0, Group::Odd, 1, 0);
        assert!(zero.supersedes(&placeholder));
        assert!(!placeholder.supersedes(&zero));
    }

    #[test]
    fn test_assign_reuses_buffer() {
        let mut c = Candidate::unscored(2, &[0, 0, 1, 5]);
        c.assign(3.0, Group::Even, 7, &[0, 2, 3, 5]);
        assert_eq!(c.bins(), &[0, 2, 3, 5]);
        assert_eq!(c.group(), Group::Even);
        assert_eq!(c.rank(), 7);
        assert_eq!(c.statistic(), 3.0);
    }
}
