//! Column drops and missing value fills applied before encoding

use super::imputer::{ImputeStrategy, Imputer};
use crate::error::{EvalError, Result};
use crate::utils::Dataset;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One cleaning operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CleaningStep {
    /// Drop columns that must exist
    DropColumns(Vec<String>),
    /// Drop columns when present, skip the rest
    DropIfPresent(Vec<String>),
    /// Fill the missing cells of a column
    FillMissing {
        column: String,
        strategy: ImputeStrategy,
    },
}

/// Ordered list of cleaning steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningPlan {
    steps: Vec<CleaningStep>,
}

impl CleaningPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn with_step(mut self, step: CleaningStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Append a strict drop of `columns`
    pub fn drop_columns<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Self {
        self.with_step(CleaningStep::DropColumns(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    /// Append a lenient drop of `columns`
    pub fn drop_if_present<S: Into<String>>(self, columns: impl IntoIterator<Item = S>) -> Self {
        self.with_step(CleaningStep::DropIfPresent(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    /// Append a fill of `column` using `strategy`
    pub fn fill_missing(self, column: impl Into<String>, strategy: ImputeStrategy) -> Self {
        self.with_step(CleaningStep::FillMissing {
            column: column.into(),
            strategy,
        })
    }

    pub fn steps(&self) -> &[CleaningStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Columns that have a fill step
    pub fn filled_columns(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                CleaningStep::FillMissing { column, .. } => Some(column.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Apply every step, in order
    pub fn apply(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut result = dataset.clone();

        for step in &self.steps {
            match step {
                CleaningStep::DropColumns(columns) => {
                    if let Some(missing) = columns.iter().find(|c| !result.has_column(c)) {
                        return Err(EvalError::missing_column(missing));
                    }
                    for column in columns {
                        result.drop_column(column)?;
                    }
                    debug!(columns = ?columns, "Dropped columns");
                }
                CleaningStep::DropIfPresent(columns) => {
                    for column in columns {
                        if result.has_column(column) {
                            result.drop_column(column)?;
                            debug!(column = %column, "Dropped column");
                        }
                    }
                }
                CleaningStep::FillMissing { column, strategy } => {
                    let before = result.null_count(column)?;
                    let mut imputer = Imputer::new(strategy.clone());
                    result = imputer.fit_transform(&result, &[column.as_str()])?;
                    if let Some(value) = imputer.fill_value(column) {
                        debug!(column = %column, filled = before, value = %value, "Filled missing values");
                    }
                }
            }
        }

        Ok(result)
    }
}
