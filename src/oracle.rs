//! Tree Oracle
//!
//! The tree learner is an external collaborator: the ensemble only needs
//! something that can be fit on a [`RestrictedTable`] and then score a record.
//! Wrap a concrete decision-tree implementation in [`TreeOracle`] (or hand a
//! closure to [`FnOracle`]) to plug it into the ensemble.
use crate::data::RestrictedTable;
use crate::errors::BaggingError;

/// A fitted binary classifier.
pub trait ProbabilityModel {
    /// Probability of the positive class for a record.
    ///
    /// `record` holds only the columns of the table the model was fit on,
    /// in the same order as [`RestrictedTable::col_index`].
    fn predict_proba(&self, record: &[f64]) -> f64;
}

/// Fits a classifier on a restricted training table.
pub trait TreeOracle {
    type Model: ProbabilityModel;

    /// Fit a model on the sampled rows and columns.
    ///
    /// Must fail with [`BaggingError::DegenerateSample`] when the rows hold a
    /// single label class, see [`RestrictedTable::ensure_two_classes`].
    fn fit(&self, table: &RestrictedTable) -> Result<Self::Model, BaggingError>;
}

/// Root-only learner predicting the positive frequency of its training rows.
///
/// This is the depth-0 tree: no split is ever made, so features are ignored.
/// Useful as a reference point for a real tree learner and as a cheap oracle.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassFrequencyOracle;

/// Model produced by [`ClassFrequencyOracle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassFrequency {
    pub positive_rate: f64,
}

impl ProbabilityModel for ClassFrequency {
    fn predict_proba(&self, _record: &[f64]) -> f64 {
        self.positive_rate
    }
}

impl TreeOracle for ClassFrequencyOracle {
    type Model = ClassFrequency;

    fn fit(&self, table: &RestrictedTable) -> Result<Self::Model, BaggingError> {
        table.ensure_two_classes()?;
        Ok(ClassFrequency {
            positive_rate: table.positive_count() as f64 / table.nrows() as f64,
        })
    }
}

/// Adapts a fitting closure into a [`TreeOracle`].
pub struct FnOracle<F> {
    fit_fn: F,
}

impl<F> FnOracle<F> {
    pub fn new<M>(fit_fn: F) -> Self
    where
        F: Fn(&RestrictedTable) -> Result<M, BaggingError>,
    {
        FnOracle { fit_fn }
    }
}

impl<F, M> TreeOracle for FnOracle<F>
where
    F: Fn(&RestrictedTable) -> Result<M, BaggingError>,
    M: ProbabilityModel,
{
    type Model = M;

    fn fit(&self, table: &RestrictedTable) -> Result<M, BaggingError> {
        (self.fit_fn)(table)
    }
}

/// Any `Fn(&[f64]) -> f64` is a model, for closures returned by [`FnOracle`].
impl<F> ProbabilityModel for F
where
    F: Fn(&[f64]) -> f64,
{
    fn predict_proba(&self, record: &[f64]) -> f64 {
        self(record)
    }
}
