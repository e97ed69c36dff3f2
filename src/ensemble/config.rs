//! Ensemble Configuration
//!
//! Defines the configuration structures and enums used by the bagged
//! estimator, including the feature subset strategy, the scheduling model
//! and the policy for degenerate samples.
use crate::constants::{DEFAULT_INTERVAL_HIGH, DEFAULT_INTERVAL_LOW, DEFAULT_MAX_RETRIES, DEFAULT_ROUNDS, DEFAULT_SUBSET_SIZE};
use crate::errors::BaggingError;
use crate::sampler::validate_subset_size;
use crate::utils::{items_to_strings, validate_positive_int_parameter, validate_probability_parameter};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Number of feature columns drawn for each round.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub enum SubsetSize {
    /// A fixed number of columns.
    Fixed(usize),
    /// Square root of the column count, rounded down.
    Sqrt,
    /// Base 2 logarithm of the column count, rounded down.
    Log2,
    /// Every column, which turns the ensemble into plain bagging.
    All,
}

impl SubsetSize {
    /// Resolve to a concrete column count for a table with `p` columns.
    pub fn resolve(&self, p: usize) -> Result<usize, BaggingError> {
        let m = match self {
            SubsetSize::Fixed(m) => *m,
            SubsetSize::Sqrt => usize::max(1, (p as f64).sqrt().floor() as usize),
            SubsetSize::Log2 => usize::max(1, (p as f64).log2().floor() as usize),
            SubsetSize::All => p,
        };
        validate_subset_size(m, p)?;
        Ok(m)
    }
}

impl FromStr for SubsetSize {
    type Err = BaggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sqrt" => Ok(SubsetSize::Sqrt),
            "Log2" => Ok(SubsetSize::Log2),
            "All" => Ok(SubsetSize::All),
            _ => s.parse::<usize>().map(SubsetSize::Fixed).map_err(|_| {
                BaggingError::ParseString(
                    s.to_string(),
                    "SubsetSize".to_string(),
                    items_to_strings(vec!["Sqrt", "Log2", "All", "<integer>"]),
                )
            }),
        }
    }
}

/// How rounds are executed.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum Schedule {
    /// One round after another on the calling thread.
    #[default]
    Sequential,
    /// One task per round on a fixed-size worker pool.
    Parallel,
}

impl FromStr for Schedule {
    type Err = BaggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sequential" => Ok(Schedule::Sequential),
            "Parallel" => Ok(Schedule::Parallel),
            _ => Err(BaggingError::ParseString(
                s.to_string(),
                "Schedule".to_string(),
                items_to_strings(vec!["Sequential", "Parallel"]),
            )),
        }
    }
}

/// What to do when a round draws rows holding a single label class.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum FailurePolicy {
    /// Abort the whole ensemble with the round's error.
    #[default]
    Propagate,
    /// Discard the round and draw again, at most `max_retries` times.
    Redraw { max_retries: usize },
}

impl FromStr for FailurePolicy {
    type Err = BaggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Propagate" => Ok(FailurePolicy::Propagate),
            "Redraw" => Ok(FailurePolicy::Redraw {
                max_retries: DEFAULT_MAX_RETRIES,
            }),
            _ => Err(BaggingError::ParseString(
                s.to_string(),
                "FailurePolicy".to_string(),
                items_to_strings(vec!["Propagate", "Redraw"]),
            )),
        }
    }
}

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}
fn default_subset_size() -> SubsetSize {
    SubsetSize::Fixed(DEFAULT_SUBSET_SIZE)
}
fn default_interval_quantiles() -> (f64, f64) {
    (DEFAULT_INTERVAL_LOW, DEFAULT_INTERVAL_HIGH)
}
fn default_log_iterations() -> usize {
    0
}

/// Configuration for the `BaggedEstimator`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Number of bootstrap rounds.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Feature columns kept per round.
    #[serde(default = "default_subset_size")]
    pub subset_size: SubsetSize,
    /// Seed for random number generation.
    #[serde(default)]
    pub seed: u64,
    /// Sequential or pooled execution of rounds.
    #[serde(default)]
    pub schedule: Schedule,
    /// Number of threads for the parallel schedule, all available if `None`.
    #[serde(default)]
    pub num_threads: Option<usize>,
    /// Handling of degenerate samples.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Quantiles of the percentile interval.
    #[serde(default = "default_interval_quantiles")]
    pub interval_quantiles: (f64, f64),
    /// Logging frequency (every N rounds), 0 disables logging.
    #[serde(default = "default_log_iterations")]
    pub log_iterations: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        EnsembleConfig {
            rounds: DEFAULT_ROUNDS,
            subset_size: SubsetSize::Fixed(DEFAULT_SUBSET_SIZE),
            seed: 0,
            schedule: Schedule::Sequential,
            num_threads: None,
            failure_policy: FailurePolicy::Propagate,
            interval_quantiles: (DEFAULT_INTERVAL_LOW, DEFAULT_INTERVAL_HIGH),
            log_iterations: 0,
        }
    }
}

impl EnsembleConfig {
    /// Check every setting that does not depend on the training table.
    pub fn validate(&self) -> Result<(), BaggingError> {
        validate_positive_int_parameter(self.rounds, "rounds")?;
        if let SubsetSize::Fixed(m) = self.subset_size {
            validate_positive_int_parameter(m, "subset_size")?;
        }
        if let Some(n) = self.num_threads {
            validate_positive_int_parameter(n, "num_threads")?;
        }
        let (lo, hi) = self.interval_quantiles;
        validate_probability_parameter(lo, "interval_quantiles.0")?;
        validate_probability_parameter(hi, "interval_quantiles.1")?;
        if lo > hi {
            return Err(BaggingError::InvalidConfiguration(
                "interval_quantiles".to_string(),
                "lower quantile no larger than upper quantile".to_string(),
                format!("({}, {})", lo, hi),
            ));
        }
        Ok(())
    }
}

/// IO
pub trait EnsembleIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BaggingError> {
        fs::write(path, self.json_dump()?).map_err(|e| BaggingError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, BaggingError> {
        serde_json::to_string(self).map_err(|e| BaggingError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, BaggingError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| BaggingError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, BaggingError> {
        let json_str = fs::read_to_string(path).map_err(|e| BaggingError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl EnsembleIO for EnsembleConfig {}
