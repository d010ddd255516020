//! The evaluation routine: load, clean, encode, split, fit, score

use super::config::EvaluationConfig;
use super::report::EvaluationReport;
use crate::error::{EvalError, Result};
use crate::preprocessing::{ColumnType, Encoder};
use crate::training::TrainTestSplit;
use crate::utils::{DataLoader, Dataset};
use ndarray::{Array1, Array2, Axis};
use std::time::Instant;
use tracing::{debug, info};

/// Numeric features and target, ready for fitting
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub target_column: String,
    /// Feature columns in dataset order
    pub feature_columns: Vec<String>,
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    /// Encoders fitted on the selected columns
    pub encoder: Encoder,
}

/// Read the configured file with the declared column types
pub fn load(config: &EvaluationConfig) -> Result<Dataset> {
    DataLoader::new()
        .with_column_types(config.column_types.clone())
        .load_csv(&config.dataset_path)
}

/// Clean, pick the target, encode, and extract arrays
pub fn prepare(config: &EvaluationConfig, dataset: &Dataset) -> Result<PreparedData> {
    let cleaned = config.cleaning.apply(dataset)?;
    info!(
        name = %config.name,
        steps = config.cleaning.steps().len(),
        cols = cleaned.width(),
        "Cleaned dataset"
    );

    let target_column = config.target.resolve(&cleaned)?;
    let feature_columns: Vec<String> = cleaned
        .column_names()
        .into_iter()
        .filter(|c| *c != target_column)
        .collect();
    if feature_columns.is_empty() {
        return Err(EvalError::SchemaError(format!(
            "no feature columns left besides target '{}'",
            target_column
        )));
    }

    let encode_columns = config.encode.resolve(&cleaned, &target_column)?;
    let mut encoder = Encoder::new();
    let encode_refs: Vec<&str> = encode_columns.iter().map(String::as_str).collect();
    let encoded = encoder.fit_transform(&cleaned, &encode_refs)?;
    for column in encoder.columns() {
        if let Some(labels) = encoder.encoder(column) {
            debug!(column = %column, classes = ?labels.classes(), "Encoded column");
        }
    }
    info!(
        target = %target_column,
        features = feature_columns.len(),
        encoded = encode_columns.len(),
        "Encoded categorical columns"
    );

    for column in feature_columns.iter().chain(std::iter::once(&target_column)) {
        if encoded.column_type(column) != Some(&ColumnType::Numeric) {
            return Err(EvalError::SchemaError(format!(
                "column '{}' is not numeric after encoding",
                column
            )));
        }
        let nulls = encoded.null_count(column)?;
        if nulls > 0 {
            return Err(EvalError::MissingValues {
                column: column.clone(),
                count: nulls,
            });
        }
    }

    let x = encoded.to_array2(&feature_columns)?;
    let y = encoded.to_array1(&target_column)?;

    Ok(PreparedData {
        target_column,
        feature_columns,
        x,
        y,
        encoder,
    })
}

/// Run the routine on a dataset that is already loaded
pub fn evaluate_dataset(config: &EvaluationConfig, dataset: &Dataset) -> Result<EvaluationReport> {
    config.validate()?;

    let prepared = prepare(config, dataset)?;
    let n_samples = prepared.y.len();

    let split = TrainTestSplit::new(config.test_fraction)
        .with_random_state(config.split_seed)
        .split(n_samples)?;
    info!(
        seed = config.split_seed,
        train = split.train_indices.len(),
        test = split.test_indices.len(),
        "Split rows"
    );

    let x_train = prepared.x.select(Axis(0), &split.train_indices);
    let y_train = prepared.y.select(Axis(0), &split.train_indices);
    let x_test = prepared.x.select(Axis(0), &split.test_indices);
    let y_test = prepared.y.select(Axis(0), &split.test_indices);

    let mut estimator = config.estimator.build()?;
    let start = Instant::now();
    estimator.fit(&x_train, &y_train)?;
    let fit_time = start.elapsed().as_secs_f64();
    info!(
        estimator = estimator.name(),
        fit_time_secs = fit_time,
        "Fitted estimator"
    );

    let predictions = estimator.predict(&x_test)?;
    let metrics = config.metric_set().compute(&y_test, &predictions)?;
    for metric in &metrics {
        info!(metric = %metric.kind, value = metric.value, "Scored predictions");
    }

    let sample_predictions = predictions
        .iter()
        .take(config.n_sample_predictions)
        .copied()
        .collect();

    Ok(EvaluationReport {
        name: config.name.clone(),
        estimator: config.estimator.to_string(),
        task_type: estimator.task_type(),
        target_column: prepared.target_column,
        feature_columns: prepared.feature_columns,
        n_train: split.train_indices.len(),
        n_test: split.test_indices.len(),
        metrics,
        sample_predictions,
        fit_time_secs: fit_time,
    })
}

/// Run the whole routine for one configuration
pub fn evaluate(config: &EvaluationConfig) -> Result<EvaluationReport> {
    config.validate()?;
    let dataset = load(config)?;
    evaluate_dataset(config, &dataset)
}
