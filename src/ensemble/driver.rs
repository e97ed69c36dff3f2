//! Ensemble Driver
//!
//! Runs the bootstrap rounds: resample rows and columns, fit the tree oracle
//! on the restricted table, and keep the positive-class probability of the
//! query record.
use crate::aggregate::Estimate;
use crate::data::TrainingTable;
use crate::ensemble::config::{EnsembleConfig, FailurePolicy, Schedule};
use crate::ensemble::result::{EnsembleResult, RoundResult};
use crate::errors::BaggingError;
use crate::oracle::{ProbabilityModel, TreeOracle};
use crate::random::{round_seeds, RandomSource};
use crate::sampler::{BootstrapSample, FeatureSubset, Resampler};
use crate::utils::validate_positive_int_parameter;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything a round reads; shared by reference across rounds and workers.
struct RoundContext<'t, 'a, 'q, O> {
    table: &'t TrainingTable<'a>,
    query: &'q [f64],
    resampler: Resampler,
    oracle: &'t O,
    policy: FailurePolicy,
    log_iterations: usize,
}

impl<'t, 'a, 'q, O: TreeOracle> RoundContext<'t, 'a, 'q, O> {
    fn new(
        table: &'t TrainingTable<'a>,
        query: &'q [f64],
        rounds: usize,
        subset_size: usize,
        oracle: &'t O,
        policy: FailurePolicy,
    ) -> Result<Self, BaggingError> {
        validate_positive_int_parameter(rounds, "rounds")?;
        table.check_record(query)?;
        let resampler = Resampler::new(table.rows(), table.feature_columns(), subset_size)?;
        Ok(RoundContext {
            table,
            query,
            resampler,
            oracle,
            policy,
            log_iterations: 0,
        })
    }

    /// Draw once, fit once, score the query once.
    fn attempt<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(f64, BootstrapSample, FeatureSubset), BaggingError> {
        let (rows, features) = self.resampler.draw(rng)?;
        let view = self.table.restrict(rows.rows(), features.columns());
        let model = self.oracle.fit(&view)?;
        let record = view.project(self.query)?;
        let probability = model.predict_proba(&record);
        // NaN fails the range check too.
        if !(0.0..=1.0).contains(&probability) {
            return Err(BaggingError::InvalidProbability(probability));
        }
        Ok((probability, rows, features))
    }

    fn run_round<R: RandomSource + ?Sized>(&self, round: usize, rng: &mut R) -> Result<RoundResult, BaggingError> {
        let mut redraws = 0;
        loop {
            match self.attempt(rng) {
                Ok((probability, rows, features)) => {
                    debug!(
                        "round {}, features: {:?}, unique rows: {}, probability: {}",
                        round,
                        features.columns(),
                        rows.n_unique(),
                        probability
                    );
                    if self.log_iterations > 0 && round % self.log_iterations == 0 {
                        info!("round {}, probability: {:.4}, redraws: {}", round, probability, redraws);
                    }
                    return Ok(RoundResult {
                        round,
                        probability,
                        features: features.columns().to_vec(),
                        n_unique_rows: rows.n_unique(),
                        redraws,
                    });
                }
                Err(BaggingError::DegenerateSample(n_classes)) => match self.policy {
                    FailurePolicy::Propagate => return Err(BaggingError::DegenerateSample(n_classes)),
                    FailurePolicy::Redraw { max_retries } => {
                        if redraws >= max_retries {
                            warn!(
                                "Round {} drew {} degenerate samples, giving up after {} redraws.",
                                round,
                                redraws + 1,
                                max_retries
                            );
                            return Err(BaggingError::ExhaustedRetries {
                                round,
                                retries: max_retries,
                            });
                        }
                        redraws += 1;
                        warn!(
                            "Round {} drew a sample with {} label class(es), redrawing ({}/{}).",
                            round, n_classes, redraws, max_retries
                        );
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }
}

/// Run an ensemble sequentially on a caller-supplied random source.
///
/// Degenerate samples abort the run, see [`run_ensemble_with_policy`] to redraw them.
///
/// * `table` - Training table, shared read-only by every round.
/// * `query` - Record to score, one value per table column.
/// * `rounds` - Number of bootstrap rounds.
/// * `subset_size` - Feature columns drawn per round.
/// * `oracle` - Tree learner fit once per round.
/// * `rng` - Random source; a fixed seed reproduces a fixed result.
pub fn run_ensemble<O, R>(
    table: &TrainingTable,
    query: &[f64],
    rounds: usize,
    subset_size: usize,
    oracle: &O,
    rng: &mut R,
) -> Result<EnsembleResult, BaggingError>
where
    O: TreeOracle,
    R: RandomSource + ?Sized,
{
    run_ensemble_with_policy(table, query, rounds, subset_size, oracle, rng, FailurePolicy::Propagate)
}

/// [`run_ensemble`] with an explicit policy for degenerate samples.
#[allow(clippy::too_many_arguments)]
pub fn run_ensemble_with_policy<O, R>(
    table: &TrainingTable,
    query: &[f64],
    rounds: usize,
    subset_size: usize,
    oracle: &O,
    rng: &mut R,
    policy: FailurePolicy,
) -> Result<EnsembleResult, BaggingError>
where
    O: TreeOracle,
    R: RandomSource + ?Sized,
{
    let ctx = RoundContext::new(table, query, rounds, subset_size, oracle, policy)?;
    let results = (0..rounds)
        .map(|i| ctx.run_round(i, rng))
        .collect::<Result<Vec<_>, _>>()?;
    EnsembleResult::new(results)
}

/// Bagged probability estimator with feature subsampling.
///
/// Every round is seeded from its own entry of [`round_seeds`], so the
/// sequential and parallel schedules produce bit-identical results.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BaggedEstimator {
    pub cfg: EnsembleConfig,
}

impl BaggedEstimator {
    /// Create an estimator from a configuration, validating it.
    pub fn new(cfg: EnsembleConfig) -> Result<Self, BaggingError> {
        cfg.validate()?;
        Ok(BaggedEstimator { cfg })
    }

    /// Run the ensemble for one query record.
    ///
    /// The configuration is checked before any round executes. With the
    /// parallel schedule, an error from any round aborts the run; which
    /// failing round is reported is not specified.
    ///
    /// * `table` - Training table, shared read-only by every round.
    /// * `query` - Record to score, one value per table column.
    /// * `oracle` - Tree learner fit once per round.
    pub fn predict<O>(&self, table: &TrainingTable, query: &[f64], oracle: &O) -> Result<EnsembleResult, BaggingError>
    where
        O: TreeOracle + Sync,
    {
        self.cfg.validate()?;
        let subset_size = self.cfg.subset_size.resolve(table.cols())?;
        let mut ctx = RoundContext::new(
            table,
            query,
            self.cfg.rounds,
            subset_size,
            oracle,
            self.cfg.failure_policy,
        )?;
        ctx.log_iterations = self.cfg.log_iterations;

        let start = Instant::now();
        if self.cfg.log_iterations > 0 {
            info!(
                "Starting {} rounds on {} rows, {} of {} columns per round, {:?} schedule.",
                self.cfg.rounds,
                table.rows(),
                ctx.resampler.subset_size(),
                table.cols(),
                self.cfg.schedule
            );
        }

        let seeds = round_seeds(self.cfg.seed, self.cfg.rounds);
        let run = |i: usize| {
            let mut rng = StdRng::seed_from_u64(seeds[i]);
            ctx.run_round(i, &mut rng)
        };

        let results = match self.cfg.schedule {
            Schedule::Sequential => (0..self.cfg.rounds).map(run).collect::<Result<Vec<_>, _>>()?,
            Schedule::Parallel => {
                let num_threads = match self.cfg.num_threads {
                    Some(num_threads) => num_threads,
                    None => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
                };
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| BaggingError::ThreadPool(e.to_string()))?;
                // Indexed collect keeps submission order.
                pool.install(|| {
                    (0..self.cfg.rounds)
                        .into_par_iter()
                        .map(run)
                        .collect::<Result<Vec<_>, _>>()
                })?
            }
        };

        let result = EnsembleResult::new(results)?;
        if self.cfg.log_iterations > 0 {
            info!(
                "Finished {} rounds in {} seconds, mean probability {:.4}.",
                result.len(),
                start.elapsed().as_secs_f32(),
                result.point_estimate()
            );
        }
        Ok(result)
    }

    /// Aggregate a result against `baseline` with the configured interval quantiles.
    pub fn estimate(&self, result: &EnsembleResult, baseline: f64) -> Result<Estimate, BaggingError> {
        let (lo, hi) = self.cfg.interval_quantiles;
        result.estimate(baseline, lo, hi)
    }

    /// Run the ensemble and aggregate it against the table's positive rate.
    pub fn predict_estimate<O>(
        &self,
        table: &TrainingTable,
        query: &[f64],
        oracle: &O,
    ) -> Result<(EnsembleResult, Estimate), BaggingError>
    where
        O: TreeOracle + Sync,
    {
        let baseline = table.positive_rate();
        let result = self.predict(table, query, oracle)?;
        let estimate = self.estimate(&result, baseline)?;
        Ok((result, estimate))
    }
}
