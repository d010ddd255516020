//! Tabular Eval - fit and score a model on a CSV dataset
//!
//! This crate runs one evaluation routine under different configurations:
//! load a table, clean it, label-encode categorical columns, hold out a
//! seeded test partition, fit an estimator and report metrics together with
//! a few sample predictions.
//!
//! # Modules
//!
//! - [`utils`] - CSV loading into typed datasets
//! - [`preprocessing`] - Column drops, imputation, label encoding
//! - [`training`] - Train/test split, KNN, decision trees, random forests
//! - [`evaluation`] - Metrics, reports, configurations and presets
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use tabular_eval::prelude::*;
//!
//! let config = presets::iris().with_dataset_path("data/IRIS.csv");
//! let report = evaluate(&config)?;
//! println!("{}", report);
//! # Ok::<(), tabular_eval::EvalError>(())
//! ```

// Core error handling
pub mod error;

// Data & models
pub mod utils;
pub mod preprocessing;
pub mod training;
pub mod evaluation;

// Services
pub mod cli;

pub use error::{EvalError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{EvalError, Result};

    // Data loading
    pub use crate::utils::{DataLoader, Dataset};

    // Preprocessing
    pub use crate::preprocessing::{CleaningPlan, CleaningStep, ColumnType, Encoder, ImputeStrategy};

    // Training
    pub use crate::training::{Estimator, EstimatorConfig, TaskType, TrainTestSplit};

    // Evaluation
    pub use crate::evaluation::{
        evaluate, presets, EncodeColumns, EvaluationConfig, EvaluationReport, MetricKind,
        MetricSet, Preset, TargetRule,
    };
}
