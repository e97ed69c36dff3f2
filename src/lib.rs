//! Bootstrap-aggregated probability estimation with feature subsampling.
//!
//! Each round resamples the training rows with replacement, draws a random
//! subset of feature columns, fits a tree through a [`TreeOracle`] and keeps
//! the positive-class probability of one query record. The per-round
//! probabilities are then reduced to a point estimate, a consensus vote and a
//! percentile interval.

// Modules
pub mod aggregate;
pub mod constants;
pub mod data;
pub mod ensemble;
pub mod errors;
pub mod oracle;
pub mod random;
pub mod sampler;
pub mod utils;

// Individual classes, and functions
pub use aggregate::Estimate;
pub use data::{RestrictedTable, TrainingTable};
pub use ensemble::{run_ensemble, run_ensemble_with_policy, BaggedEstimator, EnsembleConfig, EnsembleResult};
pub use errors::BaggingError;
pub use oracle::{ClassFrequencyOracle, FnOracle, ProbabilityModel, TreeOracle};
pub use random::RandomSource;
