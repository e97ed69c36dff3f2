use crate::aggregate::{self, Estimate};
use crate::ensemble::config::EnsembleIO;
use crate::errors::BaggingError;
use crate::utils::fmt_vec_output;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of one ensemble round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Position of the round in submission order.
    pub round: usize,
    /// Predicted positive-class probability for the query record.
    pub probability: f64,
    /// Feature columns the round's model was fit on.
    pub features: Vec<usize>,
    /// Distinct training rows in the round's bootstrap sample.
    pub n_unique_rows: usize,
    /// Degenerate samples discarded before this round succeeded.
    pub redraws: usize,
}

/// The ordered results of every round of one ensemble run.
///
/// Rounds are stored in submission order, whatever order they completed in,
/// and the sequence always holds at least one round. Serialized as the bare
/// list of rounds; deserializing re-checks both invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RoundResult>", into = "Vec<RoundResult>")]
pub struct EnsembleResult {
    rounds: Vec<RoundResult>,
    probabilities: Vec<f64>,
}

impl EnsembleResult {
    pub(crate) fn new(rounds: Vec<RoundResult>) -> Result<Self, BaggingError> {
        if rounds.is_empty() {
            return Err(BaggingError::EmptyEnsemble);
        }
        for (i, r) in rounds.iter().enumerate() {
            if r.round != i {
                return Err(BaggingError::InvalidData(format!(
                    "round {} found at position {}, rounds must be in submission order",
                    r.round, i
                )));
            }
            if !(0.0..=1.0).contains(&r.probability) {
                return Err(BaggingError::InvalidProbability(r.probability));
            }
        }
        let probabilities = rounds.iter().map(|r| r.probability).collect();
        Ok(EnsembleResult { rounds, probabilities })
    }

    /// Round probabilities in round order.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Mean round probability.
    pub fn point_estimate(&self) -> f64 {
        crate::utils::mean(&self.probabilities)
    }

    /// Majority vote of the rounds against `baseline`.
    pub fn consensus(&self, baseline: f64) -> Result<bool, BaggingError> {
        aggregate::consensus(&self.probabilities, baseline)
    }

    /// Percentile interval of the round probabilities, biased low in coverage.
    pub fn interval(&self, quantile_low: f64, quantile_high: f64) -> Result<(f64, f64), BaggingError> {
        aggregate::interval(&self.probabilities, quantile_low, quantile_high)
    }

    /// Full estimate against `baseline`.
    pub fn estimate(&self, baseline: f64, quantile_low: f64, quantile_high: f64) -> Result<Estimate, BaggingError> {
        aggregate::summarize(&self.probabilities, baseline, quantile_low, quantile_high)
    }

    /// Number of rounds each feature column was drawn in.
    pub fn feature_usage(&self) -> HashMap<usize, usize> {
        let mut usage = HashMap::new();
        for r in &self.rounds {
            for f in &r.features {
                *usage.entry(*f).or_insert(0) += 1;
            }
        }
        usage
    }

    /// Total number of degenerate samples discarded across rounds.
    pub fn total_redraws(&self) -> usize {
        self.rounds.iter().map(|r| r.redraws).sum()
    }
}

impl TryFrom<Vec<RoundResult>> for EnsembleResult {
    type Error = BaggingError;

    fn try_from(rounds: Vec<RoundResult>) -> Result<Self, Self::Error> {
        EnsembleResult::new(rounds)
    }
}

impl From<EnsembleResult> for Vec<RoundResult> {
    fn from(result: EnsembleResult) -> Self {
        result.rounds
    }
}

impl EnsembleIO for EnsembleResult {}

impl fmt::Display for EnsembleResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} rounds, mean {:.4}: [{}]",
            self.len(),
            self.point_estimate(),
            fmt_vec_output(&self.probabilities)
        )
    }
}
