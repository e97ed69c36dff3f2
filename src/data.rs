//! Data
//!
//! The labeled training table consumed by the ensemble, and the restricted
//! view of it (bootstrap rows and a column subset) handed to a tree learner.
use crate::errors::BaggingError;
use std::fmt;

/// Contiguous column major table of numeric features with one binary label per row.
///
/// Features are stored in a single borrowed slice in column-major order
/// (Fortran-style), so a column is a contiguous slice. A label of `true`
/// marks the positive class (e.g. spam).
///
/// The table is never mutated once built, so it can be shared across
/// ensemble rounds and worker threads by reference.
#[derive(Debug, Clone)]
pub struct TrainingTable<'a> {
    data: &'a [f64],
    labels: &'a [bool],
    rows: usize,
    cols: usize,
    names: Option<Vec<String>>,
}

impl<'a> TrainingTable<'a> {
    /// Create a new training table.
    ///
    /// * `data` - Feature values in column-major order, `rows * cols` long.
    /// * `labels` - One label per row.
    /// * `rows` - Number of rows.
    /// * `cols` - Number of feature columns.
    pub fn new(data: &'a [f64], labels: &'a [bool], rows: usize, cols: usize) -> Result<Self, BaggingError> {
        if rows == 0 || cols == 0 {
            return Err(BaggingError::InvalidData(format!(
                "table must have at least one row and one column, got {} x {}",
                rows, cols
            )));
        }
        let n_values = rows.checked_mul(cols).ok_or_else(|| {
            BaggingError::InvalidData(format!("{} rows by {} columns overflows the table size", rows, cols))
        })?;
        if data.len() != n_values {
            return Err(BaggingError::InvalidData(format!(
                "expected {} feature values for {} rows and {} columns, found {}",
                n_values,
                rows,
                cols,
                data.len()
            )));
        }
        if labels.len() != rows {
            return Err(BaggingError::InvalidData(format!(
                "expected {} labels, found {}",
                rows,
                labels.len()
            )));
        }
        Ok(TrainingTable {
            data,
            labels,
            rows,
            cols,
            names: None,
        })
    }

    /// Attach column names to the table.
    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, BaggingError> {
        if names.len() != self.cols {
            return Err(BaggingError::InvalidData(format!(
                "expected {} column names, found {}",
                self.cols,
                names.len()
            )));
        }
        self.names = Some(names);
        Ok(self)
    }

    /// The raw feature values, column-major.
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    /// One label per row, `true` being the positive class.
    pub fn labels(&self) -> &'a [bool] {
        self.labels
    }

    /// Number of rows in the table.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of feature columns in the table.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Column names, if any were attached.
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Get a single item in the table.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[j * self.rows + i]
    }

    /// Get an entire feature column.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[f64] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    /// Get a row of the features as a vector.
    pub fn get_row(&self, row: usize) -> Vec<f64> {
        self.data.iter().skip(row).step_by(self.rows).copied().collect()
    }

    /// Identifiers of every feature column, `0..cols`.
    pub fn feature_columns(&self) -> Vec<usize> {
        (0..self.cols).collect()
    }

    /// Number of rows carrying the positive label.
    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|l| **l).count()
    }

    /// Observed marginal frequency of the positive class over the whole table.
    ///
    /// This is the baseline the consensus vote is measured against. It is
    /// computed once per table and passed to the aggregator.
    pub fn positive_rate(&self) -> f64 {
        self.positive_count() as f64 / self.rows as f64
    }

    /// Fail if a record does not have one value per feature column.
    pub fn check_record(&self, record: &[f64]) -> Result<(), BaggingError> {
        if record.len() != self.cols {
            return Err(BaggingError::DimensionMismatch {
                expected: self.cols,
                found: record.len(),
            });
        }
        Ok(())
    }

    /// Restrict the table to a multiset of rows and a subset of columns.
    ///
    /// No data is copied, the view indexes into this table.
    pub fn restrict<'t>(&'t self, rows: &'t [usize], cols: &'t [usize]) -> RestrictedTable<'t, 'a> {
        RestrictedTable { base: self, rows, cols }
    }
}

impl fmt::Display for TrainingTable<'_> {
    /// Format a table, one row per line with the label last.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut val = String::new();
        for i in 0..self.rows {
            for j in 0..self.cols {
                val.push_str(self.get(i, j).to_string().as_str());
                val.push(' ');
            }
            val.push_str(if self.labels[i] { "1" } else { "0" });
            val.push('\n');
        }
        write!(f, "{}", val)
    }
}

/// A view of a training table restricted to a row multiset and a column subset.
///
/// Row `i` of the view is row `rows[i]` of the base table, so duplicated
/// indices appear as duplicated rows. Column `j` of the view is column
/// `cols[j]` of the base table. Labels always travel with their rows.
#[derive(Debug, Clone, Copy)]
pub struct RestrictedTable<'t, 'a> {
    base: &'t TrainingTable<'a>,
    rows: &'t [usize],
    cols: &'t [usize],
}

impl<'t, 'a> RestrictedTable<'t, 'a> {
    /// Number of rows in the view, duplicates included.
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns in the view.
    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    /// Base-table row indices backing the view.
    pub fn row_index(&self) -> &[usize] {
        self.rows
    }

    /// Base-table column identifiers backing the view.
    pub fn col_index(&self) -> &[usize] {
        self.cols
    }

    /// The table the view was taken from.
    pub fn base(&self) -> &TrainingTable<'a> {
        self.base
    }

    /// Get a single item of the view.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.base.get(self.rows[i], self.cols[j])
    }

    /// Label of the ith row of the view.
    pub fn label(&self, i: usize) -> bool {
        self.base.labels[self.rows[i]]
    }

    /// Iterate over the labels of the view, in row order.
    pub fn labels(&self) -> impl Iterator<Item = bool> + '_ {
        self.rows.iter().map(move |r| self.base.labels[*r])
    }

    /// Iterate over one column of the view, in row order.
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        let col = self.base.get_col(self.cols[j]);
        self.rows.iter().map(move |r| col[*r])
    }

    /// Get a row of the view as a vector of its subset features.
    pub fn get_row(&self, i: usize) -> Vec<f64> {
        self.cols.iter().map(|c| self.base.get(self.rows[i], *c)).collect()
    }

    /// Number of rows of the view carrying the positive label.
    pub fn positive_count(&self) -> usize {
        self.labels().filter(|l| *l).count()
    }

    /// Number of distinct label classes present in the view (0, 1 or 2).
    pub fn distinct_labels(&self) -> usize {
        let positives = self.positive_count();
        usize::from(positives > 0) + usize::from(positives < self.nrows())
    }

    /// Fail with [`BaggingError::DegenerateSample`] unless both classes are present.
    ///
    /// Tree learners call this before fitting.
    pub fn ensure_two_classes(&self) -> Result<(), BaggingError> {
        match self.distinct_labels() {
            2 => Ok(()),
            n => Err(BaggingError::DegenerateSample(n)),
        }
    }

    /// Project a full-width record onto the columns of the view.
    pub fn project(&self, record: &[f64]) -> Result<Vec<f64>, BaggingError> {
        self.base.check_record(record)?;
        Ok(self.cols.iter().map(|c| record[*c]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_parts() -> (Vec<f64>, Vec<bool>) {
        // 3 rows, 2 columns, column-major.
        (vec![1.0, 2.0, 3.0, 5.0, 6.0, 7.0], vec![true, false, true])
    }

    #[test]
    fn test_table_get() {
        let (v, y) = table_parts();
        let t = TrainingTable::new(&v, &y, 3, 2).unwrap();
        println!("{}", t);
        assert_eq!(t.get(0, 0), 1.0);
        assert_eq!(t.get(1, 0), 2.0);
        assert_eq!(t.get(2, 1), 7.0);
        assert_eq!(t.get_col(1), &[5.0, 6.0, 7.0]);
        assert_eq!(t.get_row(1), vec![2.0, 6.0]);
        assert_eq!(t.feature_columns(), vec![0, 1]);
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.data().len(), 6);
        assert_eq!(t.labels(), &[true, false, true]);
    }

    #[test]
    fn test_table_shape_errors() {
        let (v, y) = table_parts();
        assert!(matches!(
            TrainingTable::new(&v, &y, 2, 2),
            Err(BaggingError::InvalidData(_))
        ));
        assert!(matches!(
            TrainingTable::new(&v, &y[..2], 3, 2),
            Err(BaggingError::InvalidData(_))
        ));
        assert!(matches!(TrainingTable::new(&[], &[], 0, 2), Err(BaggingError::InvalidData(_))));
        assert!(matches!(
            TrainingTable::new(&[], &[], usize::MAX, 2),
            Err(BaggingError::InvalidData(_))
        ));
        let t = TrainingTable::new(&v, &y, 3, 2).unwrap();
        assert!(t.clone().with_names(vec!["a".to_string()]).is_err());
        let named = t.with_names(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(named.names().unwrap()[1], "b");
    }

    #[test]
    fn test_positive_rate() {
        let (v, y) = table_parts();
        let t = TrainingTable::new(&v, &y, 3, 2).unwrap();
        assert_eq!(t.positive_count(), 2);
        assert!((t.positive_rate() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_restricted_view() {
        let (v, y) = table_parts();
        let t = TrainingTable::new(&v, &y, 3, 2).unwrap();
        let rows = vec![2, 2, 0];
        let cols = vec![1];
        let r = t.restrict(&rows, &cols);
        assert_eq!(r.nrows(), 3);
        assert_eq!(r.ncols(), 1);
        assert_eq!(r.get(0, 0), 7.0);
        assert_eq!(r.get(2, 0), 5.0);
        assert_eq!(r.column(0).collect::<Vec<_>>(), vec![7.0, 7.0, 5.0]);
        assert_eq!(r.get_row(1), vec![7.0]);
        assert!(r.label(0));
        assert_eq!(r.positive_count(), 3);
        assert_eq!(r.distinct_labels(), 1);
        assert_eq!(r.ensure_two_classes(), Err(BaggingError::DegenerateSample(1)));
        assert_eq!(r.project(&[9.0, 8.0]).unwrap(), vec![8.0]);
        assert_eq!(
            r.project(&[9.0]),
            Err(BaggingError::DimensionMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_restricted_two_classes() {
        let (v, y) = table_parts();
        let t = TrainingTable::new(&v, &y, 3, 2).unwrap();
        let rows = vec![0, 1, 1];
        let cols = vec![0, 1];
        let r = t.restrict(&rows, &cols);
        assert_eq!(r.distinct_labels(), 2);
        assert!(r.ensure_two_classes().is_ok());
        assert_eq!(r.labels().collect::<Vec<_>>(), vec![true, false, false]);
    }
}
