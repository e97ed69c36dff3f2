use crate::ensemble::config::{FailurePolicy, Schedule, SubsetSize};
use crate::ensemble::BaggedEstimator;

impl BaggedEstimator {
    // Set methods for parameters

    /// Set the number of rounds on the estimator.
    /// * `rounds` - Number of bootstrap rounds, each fitting one tree.
    pub fn set_rounds(mut self, rounds: usize) -> Self {
        self.cfg.rounds = rounds;
        self
    }

    /// Set the feature subset size on the estimator.
    /// * `subset_size` - Columns drawn per round, a fixed count or a rule on the column count.
    pub fn set_subset_size(mut self, subset_size: SubsetSize) -> Self {
        self.cfg.subset_size = subset_size;
        self
    }

    /// Set the seed on the estimator.
    /// * `seed` - Integer value used to seed every round's random source.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.cfg.seed = seed;
        self
    }

    /// Set the schedule on the estimator.
    /// * `schedule` - Run rounds sequentially or on a worker pool. Both give identical results.
    pub fn set_schedule(mut self, schedule: Schedule) -> Self {
        self.cfg.schedule = schedule;
        self
    }

    /// Set the number of threads on the estimator.
    /// * `num_threads` - Pool size for the parallel schedule, all available if `None`.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.cfg.num_threads = num_threads;
        self
    }

    /// Set the failure policy on the estimator.
    /// * `failure_policy` - Propagate degenerate samples, or redraw them a bounded number of times.
    pub fn set_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.cfg.failure_policy = failure_policy;
        self
    }

    /// Set the interval quantiles on the estimator.
    /// * `quantile_low` - Lower quantile of the percentile interval.
    /// * `quantile_high` - Upper quantile of the percentile interval.
    pub fn set_interval_quantiles(mut self, quantile_low: f64, quantile_high: f64) -> Self {
        self.cfg.interval_quantiles = (quantile_low, quantile_high);
        self
    }

    /// Set the log iterations on the estimator.
    /// * `log_iterations` - Log every N rounds, 0 to disable.
    pub fn set_log_iterations(mut self, log_iterations: usize) -> Self {
        self.cfg.log_iterations = log_iterations;
        self
    }
}
