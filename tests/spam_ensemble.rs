use bagprob::ensemble::{EnsembleIO, FailurePolicy, Schedule, SubsetSize};
use bagprob::{
    BaggedEstimator, BaggingError, EnsembleConfig, EnsembleResult, ProbabilityModel, RestrictedTable, TrainingTable,
    TreeOracle,
};
use std::error::Error;
use tempfile::tempdir;

struct SpamData {
    names: Vec<String>,
    data: Vec<f64>,
    labels: Vec<bool>,
    rows: usize,
}

fn read_spam_sample() -> Result<SpamData, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_path("resources/spam_sample.csv")?;
    let headers = rdr.headers()?.clone();
    let cols = headers.len() - 1;
    let names = headers.iter().take(cols).map(|h| h.to_string()).collect();

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); cols];
    let mut labels = Vec::new();
    for record in rdr.records() {
        let record = record?;
        for (j, col) in columns.iter_mut().enumerate() {
            col.push(record[j].parse::<f64>()?);
        }
        labels.push(&record[cols] == "1");
    }
    let rows = labels.len();
    Ok(SpamData {
        names,
        data: columns.concat(),
        labels,
        rows,
    })
}

/// One split on the first sampled column at its mean.
struct StumpOracle;

struct Stump {
    split: f64,
    p_left: f64,
    p_right: f64,
}

impl ProbabilityModel for Stump {
    fn predict_proba(&self, record: &[f64]) -> f64 {
        if record[0] <= self.split {
            self.p_left
        } else {
            self.p_right
        }
    }
}

impl TreeOracle for StumpOracle {
    type Model = Stump;

    fn fit(&self, table: &RestrictedTable) -> Result<Stump, BaggingError> {
        table.ensure_two_classes()?;
        let n = table.nrows() as f64;
        let split = table.column(0).sum::<f64>() / n;
        let (mut left, mut left_pos, mut right, mut right_pos) = (0.0, 0.0, 0.0, 0.0);
        for (v, l) in table.column(0).zip(table.labels()) {
            let pos = if l { 1.0 } else { 0.0 };
            if v <= split {
                left += 1.0;
                left_pos += pos;
            } else {
                right += 1.0;
                right_pos += pos;
            }
        }
        let overall = (left_pos + right_pos) / n;
        Ok(Stump {
            split,
            p_left: if left > 0.0 { left_pos / left } else { overall },
            p_right: if right > 0.0 { right_pos / right } else { overall },
        })
    }
}

#[test]
fn test_spam_sample_estimate() -> Result<(), Box<dyn Error>> {
    let spam = read_spam_sample()?;
    let table = TrainingTable::new(&spam.data, &spam.labels, spam.rows, 5)?.with_names(spam.names.clone())?;
    assert_eq!(table.names().map(|n| n.len()), Some(5));
    assert_eq!(table.rows(), 40);
    let baseline = table.positive_rate();
    assert!((baseline - 0.4).abs() < 1e-12);

    // A record that looks like spam: many "free", many "$", long capital runs, no "hp".
    let query = [1.2, 0.7, 10.0, 0.5, 0.0];
    let estimator = BaggedEstimator::default()
        .set_rounds(300)
        .set_subset_size(SubsetSize::Sqrt)
        .set_seed(1)
        .set_failure_policy(FailurePolicy::Redraw { max_retries: 5 });
    let oracle = StumpOracle;
    let (result, estimate) = estimator.predict_estimate(&table, &query, &oracle)?;

    assert_eq!(result.len(), 300);
    assert!(result.probabilities().iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(result.rounds().iter().all(|r| r.features.len() == 2));
    assert!(estimate.interval.0 <= estimate.interval.1);
    assert_eq!(estimate.baseline, baseline);
    // Every column separates the classes in this sample, so the spam-like record scores high.
    assert!(estimate.mean > baseline);
    assert!(estimate.consensus);
    println!("{}", estimate);
    Ok(())
}

#[test]
fn test_spam_sample_parallel_reproducible() -> Result<(), Box<dyn Error>> {
    let spam = read_spam_sample()?;
    let table = TrainingTable::new(&spam.data, &spam.labels, spam.rows, 5)?;
    let query = table.get_row(1);
    let oracle = StumpOracle;

    let estimator = BaggedEstimator::default()
        .set_rounds(500)
        .set_subset_size(SubsetSize::Fixed(2))
        .set_seed(99)
        .set_failure_policy(FailurePolicy::Redraw { max_retries: 5 });
    let sequential = estimator.predict(&table, &query, &oracle)?;
    let parallel = estimator
        .clone()
        .set_schedule(Schedule::Parallel)
        .set_num_threads(Some(3))
        .predict(&table, &query, &oracle)?;
    assert_eq!(sequential, parallel);

    let dir = tempdir()?;
    let path = dir.path().join("config.json");
    estimator.cfg.save(&path)?;
    let restored = BaggedEstimator::new(EnsembleConfig::load(&path)?)?;
    assert_eq!(restored.predict(&table, &query, &oracle)?, sequential);

    let result_path = dir.path().join("result.json");
    sequential.save(&result_path)?;
    assert_eq!(EnsembleResult::load(&result_path)?, sequential);
    Ok(())
}

#[test]
fn test_single_class_table_fails() -> Result<(), Box<dyn Error>> {
    let spam = read_spam_sample()?;
    let labels = vec![false; spam.rows];
    let table = TrainingTable::new(&spam.data, &labels, spam.rows, 5)?;
    let estimator = BaggedEstimator::default().set_rounds(10).set_subset_size(SubsetSize::Fixed(2));
    let err = estimator.predict(&table, &[0.0; 5], &StumpOracle).unwrap_err();
    assert_eq!(err, BaggingError::DegenerateSample(1));
    Ok(())
}
