//! Evaluation metrics

use crate::error::{EvalError, Result};
use crate::training::TaskType;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.is_empty() {
        return Err(EvalError::ShapeError {
            expected: "at least one value".to_string(),
            actual: "0 values".to_string(),
        });
    }
    if y_true.len() != y_pred.len() {
        return Err(EvalError::ShapeError {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    Ok(())
}

/// Fraction of exact label matches, in [0, 1]
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean of squared residuals
pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let sum_sq: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    Ok(sum_sq / y_true.len() as f64)
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// Not clamped: a model worse than the mean scores below zero. A constant
/// target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

/// A metric the routine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    Accuracy,
    MeanSquaredError,
    R2,
}

impl MetricKind {
    /// Task the metric applies to
    pub fn task_type(&self) -> TaskType {
        match self {
            MetricKind::Accuracy => TaskType::Classification,
            MetricKind::MeanSquaredError | MetricKind::R2 => TaskType::Regression,
        }
    }

    pub fn compute(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
        match self {
            MetricKind::Accuracy => accuracy(y_true, y_pred),
            MetricKind::MeanSquaredError => mean_squared_error(y_true, y_pred),
            MetricKind::R2 => r2_score(y_true, y_pred),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Accuracy => write!(f, "Accuracy"),
            MetricKind::MeanSquaredError => write!(f, "Mean Squared Error"),
            MetricKind::R2 => write!(f, "R2 Score"),
        }
    }
}

/// One computed metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub kind: MetricKind,
    pub value: f64,
}

/// Ordered list of metrics to compute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(Vec<MetricKind>);

impl MetricSet {
    pub fn new(kinds: Vec<MetricKind>) -> Self {
        Self(kinds)
    }

    /// Accuracy
    pub fn classification() -> Self {
        Self(vec![MetricKind::Accuracy])
    }

    /// MSE and R²
    pub fn regression() -> Self {
        Self(vec![MetricKind::MeanSquaredError, MetricKind::R2])
    }

    /// Default metrics of a task
    pub fn for_task(task: TaskType) -> Self {
        match task {
            TaskType::Classification => Self::classification(),
            TaskType::Regression => Self::regression(),
        }
    }

    pub fn kinds(&self) -> &[MetricKind] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every metric must suit `task`
    pub fn validate_for(&self, task: TaskType) -> Result<()> {
        if self.0.is_empty() {
            return Err(EvalError::ConfigError("metric set is empty".to_string()));
        }
        match self.0.iter().find(|k| k.task_type() != task) {
            Some(kind) => Err(EvalError::ConfigError(format!(
                "{} is a {} metric but the estimator does {}",
                kind,
                kind.task_type(),
                task
            ))),
            None => Ok(()),
        }
    }

    pub fn compute(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Vec<MetricValue>> {
        self.0
            .iter()
            .map(|&kind| {
                Ok(MetricValue {
                    kind,
                    value: kind.compute(y_true, y_pred)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy() {
        let y_true = array![0.0, 1.0, 2.0, 1.0];
        let y_pred = array![0.0, 2.0, 2.0, 1.0];
        assert_eq!(accuracy(&y_true, &y_pred).unwrap(), 0.75);
    }

    #[test]
    fn test_mse() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![1.0, 2.0, 5.0];
        assert!((mean_squared_error(&y_true, &y_pred).unwrap() - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        assert_eq!(r2_score(&y_true, &y_true).unwrap(), 1.0);

        // predicting the mean scores zero
        let mean = array![2.5, 2.5, 2.5, 2.5];
        assert!(r2_score(&y_true, &mean).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_r2_can_be_negative() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![3.0, 2.0, 1.0];
        assert!((r2_score(&y_true, &y_pred).unwrap() - -3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        let y_true = array![2.0, 2.0];
        assert_eq!(r2_score(&y_true, &array![2.0, 2.0]).unwrap(), 1.0);
        assert_eq!(r2_score(&y_true, &array![2.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_shape_errors() {
        let empty = Array1::<f64>::zeros(0);
        assert!(matches!(accuracy(&empty, &empty), Err(EvalError::ShapeError { .. })));
        assert!(matches!(
            mean_squared_error(&array![1.0, 2.0], &array![1.0]),
            Err(EvalError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_metric_set_validation() {
        assert!(MetricSet::regression().validate_for(TaskType::Regression).is_ok());
        assert!(MetricSet::classification().validate_for(TaskType::Regression).is_err());
        assert!(MetricSet::new(vec![]).validate_for(TaskType::Classification).is_err());

        let values = MetricSet::regression()
            .compute(&array![1.0, 2.0], &array![1.0, 2.0])
            .unwrap();
        assert_eq!(values[0].kind, MetricKind::MeanSquaredError);
        assert_eq!(values[1].value, 1.0);
    }
}
