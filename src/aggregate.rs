//! Aggregate
//!
//! Reduce the per-round probabilities of an ensemble into an estimate: the
//! mean, a consensus vote against a baseline, and a percentile interval.
//!
//! # Interval caveat
//!
//! [`interval`] is the naive percentile bootstrap interval. Its coverage is
//! biased low: the column subsampling in every round adds variance the
//! percentile method does not account for, so the interval is narrower than a
//! calibrated one. Callers that need calibrated coverage must use a
//! variance-corrected method, such as a jackknife-after-bootstrap correction,
//! which this crate does not provide.
use crate::constants::MAJORITY;
use crate::errors::BaggingError;
use crate::utils::{fmt_vec_output, mean, quantiles, validate_probability_parameter};
use serde::{Deserialize, Serialize};
use std::fmt;

fn non_empty(results: &[f64]) -> Result<(), BaggingError> {
    if results.is_empty() {
        Err(BaggingError::EmptyEnsemble)
    } else {
        Ok(())
    }
}

/// Mean of the round probabilities.
pub fn point_estimate(results: &[f64]) -> Result<f64, BaggingError> {
    non_empty(results)?;
    Ok(mean(results))
}

/// Fraction of the round probabilities strictly above `baseline`.
pub fn vote_fraction(results: &[f64], baseline: f64) -> Result<f64, BaggingError> {
    non_empty(results)?;
    validate_probability_parameter(baseline, "baseline")?;
    let above = results.iter().filter(|p| **p > baseline).count();
    Ok(above as f64 / results.len() as f64)
}

/// Majority vote: true iff more than half of the rounds exceed `baseline`.
///
/// A fraction of exactly one half is not a majority.
///
/// * `results` - Round probabilities.
/// * `baseline` - Marginal positive-class frequency of the full training table.
pub fn consensus(results: &[f64], baseline: f64) -> Result<bool, BaggingError> {
    Ok(vote_fraction(results, baseline)? > MAJORITY)
}

/// Percentile bootstrap interval from empirical quantiles of the round probabilities.
///
/// See the [module documentation](self) for why this interval under-covers.
///
/// * `results` - Round probabilities.
/// * `quantile_low` - Lower quantile, e.g. `0.025`.
/// * `quantile_high` - Upper quantile, e.g. `0.975`.
pub fn interval(results: &[f64], quantile_low: f64, quantile_high: f64) -> Result<(f64, f64), BaggingError> {
    non_empty(results)?;
    validate_probability_parameter(quantile_low, "quantile_low")?;
    validate_probability_parameter(quantile_high, "quantile_high")?;
    if quantile_low > quantile_high {
        return Err(BaggingError::InvalidConfiguration(
            "quantile_low".to_string(),
            format!("a value no larger than quantile_high ({})", quantile_high),
            quantile_low.to_string(),
        ));
    }
    let q = quantiles(results, &[quantile_low, quantile_high]);
    Ok((q[0], q[1]))
}

/// Sample standard deviation of the round probabilities, 0 for a single round.
pub fn std_dev(results: &[f64]) -> Result<f64, BaggingError> {
    non_empty(results)?;
    if results.len() == 1 {
        return Ok(0.0);
    }
    let m = mean(results);
    let ss: f64 = results.iter().map(|p| (p - m) * (p - m)).sum();
    Ok((ss / (results.len() - 1) as f64).sqrt())
}

/// Everything derived from a completed ensemble for one query record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Mean round probability.
    pub mean: f64,
    /// Sample standard deviation of the round probabilities.
    pub std_dev: f64,
    /// Baseline the vote was taken against.
    pub baseline: f64,
    /// Fraction of rounds above the baseline.
    pub vote_fraction: f64,
    /// Majority vote outcome.
    pub consensus: bool,
    /// Percentile interval (lower, upper), biased low in coverage.
    pub interval: (f64, f64),
    /// Quantiles the interval was taken at.
    pub interval_quantiles: (f64, f64),
}

/// Compute the full [`Estimate`] of a set of round probabilities.
pub fn summarize(
    results: &[f64],
    baseline: f64,
    quantile_low: f64,
    quantile_high: f64,
) -> Result<Estimate, BaggingError> {
    let vote_fraction = vote_fraction(results, baseline)?;
    Ok(Estimate {
        mean: point_estimate(results)?,
        std_dev: std_dev(results)?,
        baseline,
        vote_fraction,
        consensus: vote_fraction > MAJORITY,
        interval: interval(results, quantile_low, quantile_high)?,
        interval_quantiles: (quantile_low, quantile_high),
    })
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "mean: {:.4}, sd: {:.4}, votes above {:.4}: {:.4} ({}), interval [{}] at [{}]",
            self.mean,
            self.std_dev,
            self.baseline,
            self.vote_fraction,
            if self.consensus { "positive" } else { "negative" },
            fmt_vec_output(&[self.interval.0, self.interval.1]),
            fmt_vec_output(&[self.interval_quantiles.0, self.interval_quantiles.1]),
        )
    }
}
