//! Model training module
//!
//! Provides the estimators used by the evaluation routine:
//! - K-Nearest Neighbors classifier
//! - CART decision trees
//! - Random forests (classifier and regressor)
//!
//! plus the seeded train/test split.

mod config;
pub mod decision_tree;
pub mod knn;
pub mod random_forest;
pub mod split;

pub use config::{EstimatorConfig, TaskType};
pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use knn::{KNNClassifier, KNNConfig};
pub use random_forest::{MaxFeatures, RandomForest};
pub use split::{SplitIndices, TrainTestSplit};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// A supervised model over numeric features.
///
/// Classification labels travel as `f64` holding integer codes.
pub trait Estimator: Send + Sync {
    /// Human-readable model name
    fn name(&self) -> &'static str;

    fn task_type(&self) -> TaskType;

    /// Fit on a feature matrix and target vector of equal length
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict one value per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}
