//! Test statistics turning an aggregated (signal, background) pair into a
//! single figure of merit.
//!
//! Statistics are fallible: a zero background or a logarithm/square-root
//! argument out of domain are ordinary, expected outcomes while sweeping cut
//! placements. The search recovers from them with [`score_or_zero`].

use thiserror::Error;

/// Numeric failure while evaluating a test statistic.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StatisticError {
    #[error("Division by zero (signal={signal}, background={background})")]
    DivisionByZero { signal: f64, background: f64 },

    #[error("Argument out of domain (signal={signal}, background={background})")]
    Domain { signal: f64, background: f64 },
}

/// A figure of merit for separating signal from background.
///
/// Any `Fn(f64, f64) -> f64` closure is also a statistic; non-finite values
/// it returns are reported as [`StatisticError::Domain`].
pub trait TestStatistic: Send + Sync {
    /// Evaluates the statistic for the given yields.
    fn evaluate(&self, signal: f64, background: f64) -> Result<f64, StatisticError>;

    /// Returns a human-readable name for this statistic.
    fn name(&self) -> &str {
        "custom"
    }
}

/// The ATLAS discovery significance `sqrt(2((s+b)ln(1+s/b) - s))`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtlasSignificance;

/// Shared instance of the default statistic.
pub const ATLAS_SIGNIFICANCE: AtlasSignificance = AtlasSignificance;

impl TestStatistic for AtlasSignificance {
    fn evaluate(&self, signal: f64, background: f64) -> Result<f64, StatisticError> {
        if background == 0.0 {
            return Err(StatisticError::DivisionByZero { signal, background });
        }
        let log_arg = 1.0 + signal / background;
        if log_arg <= 0.0 {
            return Err(StatisticError::Domain { signal, background });
        }
        let radicand = 2.0 * ((signal + background) * log_arg.ln() - signal);
        finite(radicand.sqrt(), signal, background)
    }

    fn name(&self) -> &str {
        "atlas"
    }
}

/// The simple significance `s / sqrt(s + b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimpleSignificance;

impl TestStatistic for SimpleSignificance {
    fn evaluate(&self, signal: f64, background: f64) -> Result<f64, StatisticError> {
        let total = signal + background;
        if total == 0.0 {
            return Err(StatisticError::DivisionByZero { signal, background });
        }
        finite(signal / total.sqrt(), signal, background)
    }

    fn name(&self) -> &str {
        "simple"
    }
}

impl<F> TestStatistic for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, signal: f64, background: f64) -> Result<f64, StatisticError> {
        finite(self(signal, background), signal, background)
    }
}

// NaN (sqrt of a negative) and infinities both count as out of domain.
fn finite(value: f64, signal: f64, background: f64) -> Result<f64, StatisticError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatisticError::Domain { signal, background })
    }
}

/// Evaluates `statistic`, substituting `0.0` for any numeric failure,
/// including a NaN returned as a success.
///
/// The flag reports whether a substitution happened.
pub fn score_or_zero<S>(statistic: &S, signal: f64, background: f64) -> (f64, bool)
where
    S: TestStatistic + ?Sized,
{
    match statistic.evaluate(signal, background) {
        Ok(value) if !value.is_nan() => (value, false),
        _ => (0.0, true),
    }
}
