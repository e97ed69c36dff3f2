//! Errors
//!
//! Custom error types used throughout the `bagprob` crate.
use thiserror::Error;

/// Errors that can occur while resampling, fitting or aggregating an ensemble.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BaggingError {
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid configuration value passed for {0}, expected {1} but {2} provided.")]
    InvalidConfiguration(String, String, String),
    /// The training data could not be shaped into a table.
    #[error("Invalid training data: {0}")]
    InvalidData(String),
    /// A record did not have one value per feature column.
    #[error("Record has {found} values, but the table has {expected} feature columns.")]
    DimensionMismatch { expected: usize, found: usize },
    /// The sampled rows hold fewer than two label classes, so no classifier can be fit.
    #[error("Sampled training rows contain {0} distinct label class(es), at least 2 are required.")]
    DegenerateSample(usize),
    /// A round kept drawing degenerate samples past the retry budget.
    #[error("Round {round} drew a degenerate sample {retries} times in a row, retry budget exhausted.")]
    ExhaustedRetries { round: usize, retries: usize },
    /// A fitted model returned a value that is not a probability.
    #[error("Model returned {0}, which is not a probability in [0, 1].")]
    InvalidProbability(f64),
    /// Aggregation was asked to summarize zero round results.
    #[error("Cannot aggregate an empty set of round results.")]
    EmptyEnsemble,
    /// The tree learner failed for a reason other than a degenerate sample.
    #[error("Unable to fit model: {0}")]
    FitFailed(String),
    /// The worker pool could not be created.
    #[error("Unable to build thread pool: {0}")]
    ThreadPool(String),
    /// Unable to write to file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read from file.
    #[error("Unable to read from file {0}")]
    UnableToRead(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
}
