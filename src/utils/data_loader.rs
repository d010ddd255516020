//! Data loading utilities
//!
//! CSV files are read with polars and wrapped in a [`Dataset`], which pins
//! every column to a [`ColumnType`] once, at load time.

use crate::error::{EvalError, Result};
use crate::preprocessing::ColumnType;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// A loaded table whose columns all have a resolved [`ColumnType`].
///
/// Numeric columns are stored as `Float64` (or `Int64` once label-encoded),
/// categorical columns as `String`. Missing cells are polars nulls.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    column_types: HashMap<String, ColumnType>,
}

impl Dataset {
    /// Wrap a frame, resolving each column's type.
    ///
    /// Columns named in `declared` are cast to the declared type; a value that
    /// cannot be read as a number in a column declared numeric fails the load.
    /// Other columns keep the type polars inferred.
    pub fn from_frame(frame: DataFrame, declared: &BTreeMap<String, ColumnType>) -> Result<Self> {
        let mut frame = frame;
        let mut column_types = HashMap::with_capacity(frame.width());

        let names: Vec<String> = frame
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        for name in &names {
            let series = frame.column(name)?.as_materialized_series().clone();
            let column_type = match declared.get(name) {
                Some(ty) => ty.clone(),
                None if is_numeric_dtype(series.dtype()) => ColumnType::Numeric,
                None => ColumnType::Categorical,
            };

            let resolved = match column_type {
                ColumnType::Numeric => series.strict_cast(&DataType::Float64).map_err(|e| {
                    EvalError::DataLoadError(format!(
                        "column '{}' is declared numeric but holds non-numeric values: {}",
                        name, e
                    ))
                })?,
                ColumnType::Categorical => series.cast(&DataType::String)?,
            };

            frame.with_column(resolved)?;
            column_types.insert(name.clone(), column_type);
        }

        for name in declared.keys() {
            if !column_types.contains_key(name) {
                debug!(column = %name, "Declared column type has no matching column");
            }
        }

        Ok(Self { frame, column_types })
    }

    /// Underlying polars frame
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of records
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Column names in file order
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_types.contains_key(name)
    }

    pub fn column_type(&self, name: &str) -> Option<&ColumnType> {
        self.column_types.get(name)
    }

    /// Borrow a column as a series
    pub fn series(&self, name: &str) -> Result<&Series> {
        self.frame
            .column(name)
            .map(|c| c.as_materialized_series())
            .map_err(|_| EvalError::missing_column(name))
    }

    /// Number of missing cells in a column
    pub fn null_count(&self, name: &str) -> Result<usize> {
        Ok(self.series(name)?.null_count())
    }

    /// Remove a column
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        if !self.has_column(name) {
            return Err(EvalError::missing_column(name));
        }
        self.frame = self.frame.drop(name)?;
        self.column_types.remove(name);
        Ok(())
    }

    /// Replace an existing column in place, keeping its position
    pub fn replace_column(&mut self, series: Series, column_type: ColumnType) -> Result<()> {
        let name = series.name().to_string();
        if !self.has_column(&name) {
            return Err(EvalError::missing_column(&name));
        }
        self.frame.with_column(series)?;
        self.column_types.insert(name, column_type);
        Ok(())
    }

    /// Extract numeric columns into a row-major matrix.
    pub fn to_array2(&self, col_names: &[String]) -> Result<Array2<f64>> {
        let col_data: Vec<Vec<f64>> = col_names
            .iter()
            .map(|name| self.numeric_values(name))
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
        Ok(Array2::from_shape_fn((self.height(), col_names.len()), |(r, c)| col_refs[c][r]))
    }

    /// Extract one numeric column as a vector
    pub fn to_array1(&self, name: &str) -> Result<Array1<f64>> {
        Ok(Array1::from_vec(self.numeric_values(name)?))
    }

    fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        match self.column_type(name) {
            None => return Err(EvalError::missing_column(name)),
            Some(ColumnType::Categorical) => {
                return Err(EvalError::SchemaError(format!(
                    "column '{}' is categorical and was not encoded",
                    name
                )))
            }
            Some(ColumnType::Numeric) => {}
        }

        let series = self.series(name)?;
        let nulls = series.null_count();
        if nulls > 0 {
            return Err(EvalError::MissingValues {
                column: name.to_string(),
                count: nulls,
            });
        }

        let as_f64 = series.cast(&DataType::Float64)?;
        let values: Vec<f64> = as_f64.f64()?.into_no_null_iter().collect();
        Ok(values)
    }
}

/// Check if a polars dtype is an integer or float type
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Rows scanned by polars to infer undeclared column dtypes
const INFER_SCHEMA_ROWS: usize = 1000;

/// CSV loader producing typed datasets
#[derive(Debug, Clone)]
pub struct DataLoader {
    declared_types: BTreeMap<String, ColumnType>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            declared_types: BTreeMap::new(),
        }
    }

    /// Declare column types to apply at load time
    pub fn with_column_types(mut self, types: BTreeMap<String, ColumnType>) -> Self {
        self.declared_types = types;
        self
    }

    /// Load a comma-separated file with a header row
    pub fn load_csv(&self, path: &Path) -> Result<Dataset> {
        let start = Instant::now();

        if !path.is_file() {
            return Err(EvalError::DataLoadError(format!(
                "{}: file not found",
                path.display()
            )));
        }

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .try_into_reader_with_file_path(Some(PathBuf::from(path)))
            .and_then(|reader| reader.finish())
            .map_err(|e| EvalError::DataLoadError(format!("{}: {}", path.display(), e)))?;

        if frame.width() == 0 {
            return Err(EvalError::DataLoadError(format!(
                "{}: no columns",
                path.display()
            )));
        }
        if frame.height() == 0 {
            return Err(EvalError::DataLoadError(format!(
                "{}: no records",
                path.display()
            )));
        }

        let dataset = Dataset::from_frame(frame, &self.declared_types)?;

        info!(
            path = %path.display(),
            rows = dataset.height(),
            cols = dataset.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded dataset"
        );

        Ok(dataset)
    }

    /// Summarize a file: shape, resolved column types and missing counts
    pub fn get_file_info(&self, path: &Path) -> Result<FileInfo> {
        let file_size = std::fs::metadata(path)
            .map_err(|e| EvalError::DataLoadError(format!("{}: {}", path.display(), e)))?
            .len();

        let dataset = self.load_csv(path)?;
        let columns = dataset
            .column_names()
            .into_iter()
            .map(|name| {
                let column_type = dataset
                    .column_type(&name)
                    .cloned()
                    .unwrap_or(ColumnType::Categorical);
                let null_count = dataset.null_count(&name)?;
                Ok(ColumnSummary {
                    name,
                    column_type,
                    null_count,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FileInfo {
            path: path.display().to_string(),
            file_size,
            n_rows: dataset.height(),
            n_cols: dataset.width(),
            columns,
        })
    }
}

/// File information
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: String,
    pub file_size: u64,
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnSummary>,
}

/// Per-column entry of a [`FileInfo`]
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub column_type: ColumnType,
    pub null_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "a,b,label").unwrap();
        writeln!(file, "1,2.5,x").unwrap();
        writeln!(file, "4,,y").unwrap();
        writeln!(file, "7,8.5,").unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv();
        let dataset = DataLoader::new().load_csv(file.path()).unwrap();

        assert_eq!(dataset.height(), 3);
        assert_eq!(dataset.width(), 3);
        assert_eq!(dataset.column_names(), vec!["a", "b", "label"]);
        assert_eq!(dataset.column_type("a"), Some(&ColumnType::Numeric));
        assert_eq!(dataset.column_type("label"), Some(&ColumnType::Categorical));
        assert_eq!(dataset.null_count("b").unwrap(), 1);
        assert_eq!(dataset.null_count("label").unwrap(), 1);
    }

    #[test]
    fn test_declared_type_overrides_inference() {
        let file = create_test_csv();
        let mut types = BTreeMap::new();
        types.insert("a".to_string(), ColumnType::Categorical);

        let dataset = DataLoader::new()
            .with_column_types(types)
            .load_csv(file.path())
            .unwrap();

        assert_eq!(dataset.column_type("a"), Some(&ColumnType::Categorical));
        assert_eq!(dataset.series("a").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_declared_numeric_rejects_text() {
        let file = create_test_csv();
        let mut types = BTreeMap::new();
        types.insert("label".to_string(), ColumnType::Numeric);

        let err = DataLoader::new()
            .with_column_types(types)
            .load_csv(file.path())
            .unwrap_err();
        assert!(matches!(err, EvalError::DataLoadError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::new()
            .load_csv(Path::new("/nonexistent/IRIS.csv"))
            .unwrap_err();
        assert!(matches!(err, EvalError::DataLoadError(_)));
    }

    #[test]
    fn test_to_array2_rejects_nulls() {
        let file = create_test_csv();
        let dataset = DataLoader::new().load_csv(file.path()).unwrap();

        let x = dataset.to_array2(&["a".to_string()]).unwrap();
        assert_eq!(x.shape(), &[3, 1]);
        assert_eq!(x[[2, 0]], 7.0);

        let err = dataset.to_array2(&["b".to_string()]).unwrap_err();
        assert!(matches!(err, EvalError::MissingValues { count: 1, .. }));

        let err = dataset.to_array1("label").unwrap_err();
        assert!(matches!(err, EvalError::SchemaError(_)));
    }

    #[test]
    fn test_get_file_info() {
        let file = create_test_csv();
        let info = DataLoader::new().get_file_info(file.path()).unwrap();

        assert_eq!(info.n_rows, 3);
        assert_eq!(info.n_cols, 3);
        assert_eq!(info.columns[1].name, "b");
        assert_eq!(info.columns[1].null_count, 1);
    }
}
