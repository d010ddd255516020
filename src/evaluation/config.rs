//! Evaluation configuration

use super::metrics::MetricSet;
use crate::error::{EvalError, Result};
use crate::preprocessing::{CleaningPlan, ColumnType};
use crate::training::EstimatorConfig;
use crate::utils::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// How the target column is chosen, after cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetRule {
    /// A named column
    Column(String),
    /// The last column of the cleaned dataset
    LastColumn,
    /// The named column if present, otherwise the last column
    ColumnOrLast(String),
}

impl TargetRule {
    pub fn resolve(&self, dataset: &Dataset) -> Result<String> {
        let last = || {
            dataset
                .column_names()
                .pop()
                .ok_or_else(|| EvalError::SchemaError("dataset has no columns".to_string()))
        };

        match self {
            TargetRule::Column(name) if dataset.has_column(name) => Ok(name.clone()),
            TargetRule::Column(name) => Err(EvalError::SchemaError(format!(
                "target column '{}' not found",
                name
            ))),
            TargetRule::LastColumn => last(),
            TargetRule::ColumnOrLast(name) if dataset.has_column(name) => Ok(name.clone()),
            TargetRule::ColumnOrLast(_) => last(),
        }
    }
}

/// Which columns are label-encoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncodeColumns {
    /// These columns, numeric ones included, plus the target when it is
    /// categorical
    Named(Vec<String>),
    /// Every categorical column, features and target
    Categorical,
    /// Every categorical feature; the target is left as loaded
    CategoricalFeatures,
}

impl Default for EncodeColumns {
    fn default() -> Self {
        EncodeColumns::Categorical
    }
}

impl EncodeColumns {
    /// Columns to encode, in dataset order for the categorical rules
    pub fn resolve(&self, dataset: &Dataset, target: &str) -> Result<Vec<String>> {
        let categorical = |name: &str| dataset.column_type(name) == Some(&ColumnType::Categorical);

        match self {
            EncodeColumns::Named(names) => {
                if let Some(missing) = names.iter().find(|n| !dataset.has_column(n)) {
                    return Err(EvalError::missing_column(missing));
                }
                let mut columns = names.clone();
                if categorical(target) && !columns.iter().any(|n| n == target) {
                    columns.push(target.to_string());
                }
                Ok(columns)
            }
            EncodeColumns::Categorical => Ok(dataset
                .column_names()
                .into_iter()
                .filter(|n| categorical(n))
                .collect()),
            EncodeColumns::CategoricalFeatures => Ok(dataset
                .column_names()
                .into_iter()
                .filter(|n| n != target && categorical(n))
                .collect()),
        }
    }
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_sample_predictions() -> usize {
    5
}

/// Everything one evaluation run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Label used in logs and the report
    pub name: String,
    pub dataset_path: PathBuf,
    /// Declared types, applied when the file is loaded
    #[serde(default)]
    pub column_types: BTreeMap<String, ColumnType>,
    pub target: TargetRule,
    #[serde(default)]
    pub cleaning: CleaningPlan,
    #[serde(default)]
    pub encode: EncodeColumns,
    pub estimator: EstimatorConfig,
    /// Metrics to report (`None` = defaults of the estimator's task)
    #[serde(default)]
    pub metrics: Option<MetricSet>,
    pub split_seed: u64,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_sample_predictions")]
    pub n_sample_predictions: usize,
}

impl EvaluationConfig {
    pub fn new(
        name: impl Into<String>,
        dataset_path: impl Into<PathBuf>,
        target: TargetRule,
        estimator: EstimatorConfig,
    ) -> Self {
        Self {
            name: name.into(),
            dataset_path: dataset_path.into(),
            column_types: BTreeMap::new(),
            target,
            cleaning: CleaningPlan::new(),
            encode: EncodeColumns::Categorical,
            estimator,
            metrics: None,
            split_seed: 0,
            test_fraction: default_test_fraction(),
            n_sample_predictions: default_sample_predictions(),
        }
    }

    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Declare the type of one column
    pub fn with_column_type(mut self, column: impl Into<String>, column_type: ColumnType) -> Self {
        self.column_types.insert(column.into(), column_type);
        self
    }

    pub fn with_cleaning(mut self, cleaning: CleaningPlan) -> Self {
        self.cleaning = cleaning;
        self
    }

    pub fn with_encode(mut self, encode: EncodeColumns) -> Self {
        self.encode = encode;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricSet) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_split_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self
    }

    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn with_sample_predictions(mut self, n: usize) -> Self {
        self.n_sample_predictions = n;
        self
    }

    /// Metrics that will be reported
    pub fn metric_set(&self) -> MetricSet {
        self.metrics
            .clone()
            .unwrap_or_else(|| MetricSet::for_task(self.estimator.task_type()))
    }

    /// Checks that need no data
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(EvalError::InvalidParameter {
                name: "test_fraction".to_string(),
                value: self.test_fraction.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        self.estimator.validate()?;
        self.metric_set().validate_for(self.estimator.task_type())
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EvalError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| EvalError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
