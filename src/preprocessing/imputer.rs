//! Missing value imputation strategies

use super::ColumnType;
use crate::error::{EvalError, Result};
use crate::utils::Dataset;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with mean (numeric only)
    Mean,
    /// Replace with median (numeric only)
    Median,
    /// Replace with the most frequent value; ties go to the smallest value
    MostFrequent,
    /// Replace with a constant number (numeric only)
    Constant(f64),
    /// Replace with a constant string (categorical only)
    ConstantString(String),
}

/// Value written into missing cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeValue {
    Numeric(f64),
    Text(String),
}

impl fmt::Display for ImputeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImputeValue::Numeric(v) => write!(f, "{}", v),
            ImputeValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Imputer for handling missing values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, ImputeValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Compute the fill value of each column
    pub fn fit(&mut self, dataset: &Dataset, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column_type = *dataset
                .column_type(col_name)
                .ok_or_else(|| EvalError::missing_column(col_name))?;
            let series = dataset.series(col_name)?;

            let fill_value = self.compute_fill_value(col_name, series, column_type)?;
            self.fill_values.insert(col_name.to_string(), fill_value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Write the fitted values into the missing cells
    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        if !self.is_fitted {
            return Err(EvalError::ModelNotFitted);
        }

        let mut result = dataset.clone();

        for (col_name, fill_value) in &self.fill_values {
            let column_type = *dataset
                .column_type(col_name)
                .ok_or_else(|| EvalError::missing_column(col_name))?;
            let filled = Self::fill_series(dataset.series(col_name)?, fill_value)?;
            result.replace_column(filled, column_type)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, dataset: &Dataset, columns: &[&str]) -> Result<Dataset> {
        self.fit(dataset, columns)?;
        self.transform(dataset)
    }

    /// Fitted value for a column
    pub fn fill_value(&self, column: &str) -> Option<&ImputeValue> {
        self.fill_values.get(column)
    }

    fn compute_fill_value(
        &self,
        name: &str,
        series: &Series,
        column_type: ColumnType,
    ) -> Result<ImputeValue> {
        let no_values = || {
            EvalError::SchemaError(format!(
                "column '{}' has no observed values to impute from",
                name
            ))
        };

        match (&self.strategy, column_type) {
            (ImputeStrategy::Mean, ColumnType::Numeric) => series
                .f64()?
                .mean()
                .map(ImputeValue::Numeric)
                .ok_or_else(no_values),
            (ImputeStrategy::Median, ColumnType::Numeric) => series
                .f64()?
                .median()
                .map(ImputeValue::Numeric)
                .ok_or_else(no_values),
            (ImputeStrategy::MostFrequent, ColumnType::Numeric) => {
                Self::compute_mode_numeric(series)?.ok_or_else(no_values)
            }
            (ImputeStrategy::MostFrequent, ColumnType::Categorical) => {
                Self::compute_mode_string(series)?.ok_or_else(no_values)
            }
            (ImputeStrategy::Constant(v), ColumnType::Numeric) => Ok(ImputeValue::Numeric(*v)),
            (ImputeStrategy::ConstantString(s), ColumnType::Categorical) => {
                Ok(ImputeValue::Text(s.clone()))
            }
            (strategy, column_type) => Err(EvalError::SchemaError(format!(
                "cannot impute {} column '{}' with {:?}",
                column_type, name, strategy
            ))),
        }
    }

    /// Most frequent number; on equal counts the smallest value wins
    fn compute_mode_numeric(series: &Series) -> Result<Option<ImputeValue>> {
        let mut values: Vec<f64> = series.f64()?.into_iter().flatten().collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let mut best: Option<(f64, usize)> = None;
        let mut i = 0;
        while i < values.len() {
            let run = values[i..].iter().take_while(|&&v| v == values[i]).count();
            if best.map_or(true, |(_, count)| run > count) {
                best = Some((values[i], run));
            }
            i += run;
        }

        Ok(best.map(|(v, _)| ImputeValue::Numeric(v)))
    }

    /// Most frequent string; on equal counts the lexicographically smallest wins
    fn compute_mode_string(series: &Series) -> Result<Option<ImputeValue>> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for val in series.str()?.into_iter().flatten() {
            *counts.entry(val).or_insert(0) += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        for (val, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((val, count));
            }
        }

        Ok(best.map(|(v, _)| ImputeValue::Text(v.to_string())))
    }

    fn fill_series(series: &Series, fill_value: &ImputeValue) -> Result<Series> {
        match fill_value {
            ImputeValue::Numeric(val) => {
                let filled: Float64Chunked = series
                    .f64()?
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
            ImputeValue::Text(val) => {
                let filled: StringChunked = series
                    .str()?
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(val.as_str())))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}
