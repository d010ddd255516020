//! Plain-text evaluation report

use super::metrics::MetricValue;
use crate::training::TaskType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round to 3 decimal places for display
pub fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid printing "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Outcome of one evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub name: String,
    pub estimator: String,
    pub task_type: TaskType,
    pub target_column: String,
    pub feature_columns: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    pub metrics: Vec<MetricValue>,
    /// Leading test-set predictions, in test-partition order
    pub sample_predictions: Vec<f64>,
    pub fit_time_secs: f64,
}

impl EvaluationReport {
    /// Value of a metric, unrounded
    pub fn metric(&self, kind: super::MetricKind) -> Option<f64> {
        self.metrics.iter().find(|m| m.kind == kind).map(|m| m.value)
    }

    fn format_predictions(&self) -> String {
        let items: Vec<String> = self
            .sample_predictions
            .iter()
            .map(|&p| match self.task_type {
                TaskType::Classification => format!("{}", p.round() as i64),
                TaskType::Regression => format!("{}", round3(p)),
            })
            .collect();
        format!("[{}]", items.join(", "))
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset: {} ({})", self.name, self.estimator)?;
        writeln!(f, "Target column used: {}", self.target_column)?;
        writeln!(f, "Train rows: {}, test rows: {}", self.n_train, self.n_test)?;
        for metric in &self.metrics {
            writeln!(f, "{}: {}", metric.kind, round3(metric.value))?;
        }
        write!(f, "Sample predictions: {}", self.format_predictions())
    }
}
