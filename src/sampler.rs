//! Sampler
//!
//! Bootstrap row resampling and random feature subsets, the two sources of
//! randomness that decorrelate the members of a bagged ensemble.
use crate::errors::BaggingError;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// A sampler can be used to subset the data prior to fitting a new tree.
pub trait Sampler {
    /// Sample the data, returning a tuple, where the first item is the samples
    /// chosen for training, and the second are the samples excluded.
    fn sample<R: RandomSource + ?Sized>(&mut self, rng: &mut R, index: &[usize]) -> (Vec<usize>, Vec<usize>);
}

/// Draws a same-size resample with replacement; the excluded samples are the out-of-bag rows.
#[derive(Default)]
pub struct BootstrapSampler;

impl Sampler for BootstrapSampler {
    fn sample<R: RandomSource + ?Sized>(&mut self, rng: &mut R, index: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let n = index.len();
        let mut drawn = vec![false; n];
        let mut chosen = Vec::with_capacity(n);
        for _ in 0..n {
            let pos = rng.uniform_int(0, n);
            drawn[pos] = true;
            chosen.push(index[pos]);
        }
        let excluded = index
            .iter()
            .zip(drawn)
            .filter(|(_, d)| !*d)
            .map(|(i, _)| *i)
            .collect();
        (chosen, excluded)
    }
}

/// A multiset of `n` row indices drawn uniformly with replacement from `0..n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSample {
    rows: Vec<usize>,
    out_of_bag: Vec<usize>,
}

impl BootstrapSample {
    /// Drawn row indices, in draw order, duplicates included.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Rows of the table never drawn, in ascending order.
    pub fn out_of_bag(&self) -> &[usize] {
        &self.out_of_bag
    }

    /// Number of distinct rows drawn.
    pub fn n_unique(&self) -> usize {
        self.rows.len() - self.out_of_bag.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `m` distinct feature column identifiers, kept in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSubset {
    columns: Vec<usize>,
}

impl FeatureSubset {
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Draw a bootstrap sample of `n` row indices, each uniform over `0..n`.
///
/// * `rng` - Random source used for the draws.
/// * `n` - Number of rows in the table, which is also the number of draws.
pub fn draw_bootstrap_rows<R: RandomSource + ?Sized>(rng: &mut R, n: usize) -> Result<BootstrapSample, BaggingError> {
    if n == 0 {
        return Err(BaggingError::InvalidConfiguration(
            "n_rows".to_string(),
            "at least 1".to_string(),
            n.to_string(),
        ));
    }
    let index: Vec<usize> = (0..n).collect();
    let (rows, out_of_bag) = BootstrapSampler.sample(rng, &index);
    Ok(BootstrapSample { rows, out_of_bag })
}

/// Draw `m` distinct columns uniformly without replacement.
///
/// `m` may equal the number of candidate columns, in which case every column
/// is kept and the ensemble reduces to plain bagging. Only `m == 0` or `m`
/// above the column count is rejected with
/// [`BaggingError::InvalidConfiguration`].
///
/// * `rng` - Random source used for the draw.
/// * `columns` - Candidate feature columns.
/// * `m` - Number of columns to keep.
pub fn draw_feature_subset<R: RandomSource + ?Sized>(
    rng: &mut R,
    columns: &[usize],
    m: usize,
) -> Result<FeatureSubset, BaggingError> {
    validate_subset_size(m, columns.len())?;
    let mut v: Vec<usize> = rng
        .sample_without_replacement(columns.len(), m)
        .into_iter()
        .map(|i| columns[i])
        .collect();
    v.sort();
    Ok(FeatureSubset { columns: v })
}

pub(crate) fn validate_subset_size(m: usize, p: usize) -> Result<(), BaggingError> {
    if m == 0 || m > p {
        return Err(BaggingError::InvalidConfiguration(
            "subset_size".to_string(),
            format!("a value between 1 and {}", p),
            m.to_string(),
        ));
    }
    Ok(())
}

/// Draws the (rows, columns) pair for one ensemble round.
///
/// The configuration is checked once, at construction, so every draw succeeds.
#[derive(Debug, Clone)]
pub struct Resampler {
    n_rows: usize,
    columns: Vec<usize>,
    subset_size: usize,
}

impl Resampler {
    /// * `n_rows` - Rows in the training table.
    /// * `columns` - Feature columns available to draw from.
    /// * `subset_size` - Columns kept per round.
    pub fn new(n_rows: usize, columns: Vec<usize>, subset_size: usize) -> Result<Self, BaggingError> {
        if n_rows == 0 {
            return Err(BaggingError::InvalidConfiguration(
                "n_rows".to_string(),
                "at least 1".to_string(),
                n_rows.to_string(),
            ));
        }
        validate_subset_size(subset_size, columns.len())?;
        Ok(Resampler {
            n_rows,
            columns,
            subset_size,
        })
    }

    pub fn subset_size(&self) -> usize {
        self.subset_size
    }

    /// Draw the bootstrap rows, then an independent feature subset.
    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<(BootstrapSample, FeatureSubset), BaggingError> {
        let rows = draw_bootstrap_rows(rng, self.n_rows)?;
        let features = draw_feature_subset(rng, &self.columns, self.subset_size)?;
        Ok((rows, features))
    }
}
