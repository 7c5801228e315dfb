//! Validation and range resolution shared by every search entry point.

use qtty::{Quantity, Unit};

use crate::histogram::BinnedCounts;
use crate::statistic::TestStatistic;

use super::config::SearchConfig;
use super::engine::SearchContext;
use super::error::CutError;

/// Rebinned histograms and the resolved bin range of a search.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRange<H> {
    pub signal: H,
    pub background: H,
    pub x_min: usize,
    pub x_max: usize,
}

impl<H: BinnedCounts> PreparedRange<H> {
    /// Checks binning, rebins both histograms and resolves the range bounds.
    ///
    /// Fails before any work is done on mismatched binning, a bad rebin
    /// factor or an inverted range. Bounds off the axis snap to its nearest
    /// bin.
    pub fn new(
        signal: &H,
        background: &H,
        config: &SearchConfig<H::AxisUnit>,
    ) -> Result<Self, CutError> {
        if config.rebin < 1 {
            return Err(CutError::InvalidRebin {
                factor: config.rebin,
            });
        }
        if !signal.same_binning(background) {
            return Err(CutError::IncompatibleBinning);
        }

        let signal = signal.rebin(config.rebin)?;
        let background = background.rebin(config.rebin)?;

        let x_min = resolve_bound(&signal, config.x_min).unwrap_or(signal.first_bin_index());
        let x_max = resolve_bound(&signal, config.x_max).unwrap_or(signal.last_bin_index());
        if x_min > x_max {
            return Err(CutError::InvertedRange { x_min, x_max });
        }

        Ok(Self {
            signal,
            background,
            x_min,
            x_max,
        })
    }

    pub fn context<'a, S>(
        &'a self,
        statistic: &'a S,
        config: &'a SearchConfig<H::AxisUnit>,
    ) -> SearchContext<'a, H, S>
    where
        S: TestStatistic + ?Sized,
    {
        SearchContext {
            signal: &self.signal,
            background: &self.background,
            statistic,
            groups: config.groups,
            x_min: self.x_min,
            x_max: self.x_max,
            cancel: config.cancel.as_ref(),
            cancel_check_every: config.normalized_cancel_check_every(),
        }
    }

    /// Axis coordinates of a placement: the first entry maps to its bin's
    /// lower edge, every later entry to its bin's upper edge.
    pub fn coordinates(&self, bins: &[usize]) -> Vec<Quantity<H::AxisUnit>> {
        bins.iter()
            .enumerate()
            .map(|(i, &bin)| {
                if i == 0 {
                    self.signal.bin_low_edge(bin)
                } else {
                    self.signal.bin_high_edge(bin)
                }
            })
            .collect()
    }
}

/// Bin of a range bound, clamped onto the axis. `None` (or NaN) leaves the
/// bound to the axis extent.
fn resolve_bound<H, U>(histogram: &H, bound: Option<Quantity<U>>) -> Option<usize>
where
    H: BinnedCounts<AxisUnit = U>,
    U: Unit,
{
    let x = bound.filter(|x| !x.value().is_nan())?;
    histogram.bin_index_for_coordinate(x).or_else(|| {
        let low = histogram.bin_low_edge(histogram.first_bin_index());
        if x.value() < low.value() {
            Some(histogram.first_bin_index())
        } else {
            Some(histogram.last_bin_index())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;
    use qtty::Second;

    fn q(value: f64) -> Quantity<Second> {
        Quantity::new(value)
    }

    fn hist(contents: &[f64]) -> Histogram<Second> {
        Histogram::uniform(contents, q(0.0), q(contents.len() as f64)).unwrap()
    }

    #[test]
    fn test_full_extent_by_default() {
        let s = hist(&[1.0; 6]);
        let range = PreparedRange::new(&s, &s, &SearchConfig::default()).unwrap();
        assert_eq!((range.x_min, range.x_max), (0, 5));
    }

    #[test]
    fn test_bounds_resolve_to_bins() {
        let s = hist(&[1.0; 6]);
        let config = SearchConfig::default().with_range(Some(q(1.5)), Some(q(4.0)));
        let range = PreparedRange::new(&s, &s, &config).unwrap();
        assert_eq!((range.x_min, range.x_max), (1, 4));
    }

    #[test]
    fn test_bounds_after_rebin() {
        let s = hist(&[1.0; 6]);
        let config = SearchConfig::default()
            .with_rebin(2)
            .with_range(Some(q(2.5)), None);
        let range = PreparedRange::new(&s, &s, &config).unwrap();
        assert_eq!((range.x_min, range.x_max), (1, 2));
        assert_eq!(range.signal.integral(0, 2), 6.0);
    }

    #[test]
    fn test_inverted_range() {
        let s = hist(&[1.0; 6]);
        let config = SearchConfig::default().with_range(Some(q(4.5)), Some(q(0.5)));
        assert_eq!(
            PreparedRange::new(&s, &s, &config).unwrap_err(),
            CutError::InvertedRange { x_min: 4, x_max: 0 }
        );
    }

    #[test]
    fn test_bounds_off_axis_are_clamped() {
        let s = hist(&[1.0; 6]);
        let config = SearchConfig::default().with_range(Some(q(1.0)), Some(q(100.0)));
        let range = PreparedRange::new(&s, &s, &config).unwrap();
        assert_eq!((range.x_min, range.x_max), (1, 5));

        let config = SearchConfig::default().with_range(Some(q(-3.0)), Some(q(2.5)));
        let range = PreparedRange::new(&s, &s, &config).unwrap();
        assert_eq!((range.x_min, range.x_max), (0, 2));

        let config = SearchConfig::default().with_range(Some(q(7.0)), Some(q(8.0)));
        let range = PreparedRange::new(&s, &s, &config).unwrap();
        assert_eq!((range.x_min, range.x_max), (5, 5));
    }

    #[test]
    fn test_nan_bound_means_full_extent() {
        let s = hist(&[1.0; 6]);
        let config = SearchConfig::default().with_range(Some(q(f64::NAN)), Some(q(f64::NAN)));
        let range = PreparedRange::new(&s, &s, &config).unwrap();
        assert_eq!((range.x_min, range.x_max), (0, 5));
    }

    #[test]
    fn test_mismatched_binning() {
        let s = hist(&[1.0; 6]);
        let b = hist(&[1.0; 5]);
        assert_eq!(
            PreparedRange::new(&s, &b, &SearchConfig::default()).unwrap_err(),
            CutError::IncompatibleBinning
        );
    }

    #[test]
    fn test_rebin_too_coarse() {
        let s = hist(&[1.0; 3]);
        let config = SearchConfig::default().with_rebin(4);
        assert!(matches!(
            PreparedRange::new(&s, &s, &config),
            Err(CutError::Histogram(_))
        ));
    }

    #[test]
    fn test_coordinates() {
        let s = hist(&[1.0; 6]);
        let range = PreparedRange::new(&s, &s, &SearchConfig::default()).unwrap();
        let coords: Vec<f64> = range
            .coordinates(&[0, 2, 3, 5])
            .iter()
            .map(|c| c.value())
            .collect();
        assert_eq!(coords, vec![0.0, 3.0, 4.0, 6.0]);
    }
}
