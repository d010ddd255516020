//! Evaluation module
//!
//! One routine, driven by an [`EvaluationConfig`]:
//! 1. load the CSV with declared column types
//! 2. apply the cleaning plan
//! 3. resolve the target and label-encode the selected columns
//! 4. split rows with a fixed seed
//! 5. fit the estimator, predict the test rows
//! 6. compute metrics and build an [`EvaluationReport`]
//!
//! The [`presets`] module holds the built-in iris, sales and titanic
//! configurations.

mod config;
pub mod metrics;
pub mod presets;
mod report;
mod routine;

pub use config::{EncodeColumns, EvaluationConfig, TargetRule};
pub use metrics::{accuracy, mean_squared_error, r2_score, MetricKind, MetricSet, MetricValue};
pub use presets::Preset;
pub use report::{round3, EvaluationReport};
pub use routine::{evaluate, evaluate_dataset, load, prepare, PreparedData};
