// public modules
pub mod config;
pub mod driver;
pub mod result;

// private modules
mod setters;

pub use config::{EnsembleConfig, EnsembleIO, FailurePolicy, Schedule, SubsetSize};
pub use driver::{run_ensemble, run_ensemble_with_policy, BaggedEstimator};
pub use result::{EnsembleResult, RoundResult};
