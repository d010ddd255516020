//! Label encoding of categorical columns
//!
//! Each column gets its own [`LabelEncoder`]; there is no vocabulary shared
//! across columns.

use super::ColumnType;
use crate::error::{EvalError, Result};
use crate::utils::Dataset;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Bijection from the distinct values of one column to `0..n`.
///
/// Codes follow the sorted order of the values (numeric order for numeric
/// columns), so the same set of values always yields the same codes
/// regardless of row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Build the mapping from observed values
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        Self::from_classes(classes)
    }

    /// Build the mapping from stringified numbers, ordered by value
    pub fn fit_numeric<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let mut classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        classes.sort_by(|a, b| {
            let a = a.parse::<f64>().unwrap_or(f64::NAN);
            let b = b.parse::<f64>().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        });
        Self::from_classes(classes)
    }

    fn from_classes(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self { classes, index }
    }

    /// Distinct values in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Code of a value seen during fit
    pub fn encode(&self, value: &str) -> Result<usize> {
        match self.index.get(value) {
            Some(&code) => Ok(code),
            // index is skipped by serde; fall back to a scan after deserialization
            None => self
                .classes
                .iter()
                .position(|c| c == value)
                .ok_or_else(|| EvalError::SchemaError(format!("unseen label '{}'", value))),
        }
    }

    /// Value behind a code
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| EvalError::InvalidParameter {
                name: "code".to_string(),
                value: code.to_string(),
                reason: format!("only {} labels are known", self.classes.len()),
            })
    }
}

/// Per-column label encoders over a dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Encoder {
    encoders: BTreeMap<String, LabelEncoder>,
    is_fitted: bool,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit one encoder per column.
    ///
    /// Numeric columns are stringified first but keep numeric code order. A
    /// column that still has missing values cannot be encoded.
    pub fn fit(&mut self, dataset: &Dataset, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let strings = Self::column_as_strings(dataset, col_name)?;
            let values = strings.str()?.into_no_null_iter();
            let encoder = if dataset.column_type(col_name) == Some(&ColumnType::Numeric) {
                LabelEncoder::fit_numeric(values)
            } else {
                LabelEncoder::fit(values)
            };
            self.encoders.insert(col_name.to_string(), encoder);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace each fitted column with its integer codes
    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        if !self.is_fitted {
            return Err(EvalError::ModelNotFitted);
        }

        let mut result = dataset.clone();

        for (col_name, encoder) in &self.encoders {
            let strings = Self::column_as_strings(dataset, col_name)?;
            let codes: Vec<i64> = strings
                .str()?
                .into_no_null_iter()
                .map(|v| encoder.encode(v).map(|c| c as i64))
                .collect::<Result<Vec<i64>>>()?;

            let series = Series::new(col_name.as_str().into(), codes);
            result.replace_column(series, ColumnType::Numeric)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, dataset: &Dataset, columns: &[&str]) -> Result<Dataset> {
        self.fit(dataset, columns)?;
        self.transform(dataset)
    }

    /// Encoder fitted for a column
    pub fn encoder(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    /// Names of encoded columns, sorted
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    fn column_as_strings(dataset: &Dataset, name: &str) -> Result<Series> {
        let series = dataset.series(name)?;
        let nulls = series.null_count();
        if nulls > 0 {
            return Err(EvalError::MissingValues {
                column: name.to_string(),
                count: nulls,
            });
        }
        Ok(series.cast(&DataType::String)?)
    }
}
