//! Estimator configuration

use super::knn::KNNClassifier;
use super::random_forest::RandomForest;
use super::Estimator;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of ML task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    /// Discrete labels, scored by accuracy
    Classification,
    /// Continuous target, scored by MSE and R²
    Regression,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Classification => write!(f, "classification"),
            TaskType::Regression => write!(f, "regression"),
        }
    }
}

/// Which estimator to fit, with its hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EstimatorConfig {
    KNearestNeighbors { n_neighbors: usize },
    RandomForestRegressor { n_estimators: usize, seed: u64 },
    RandomForestClassifier { n_estimators: usize, seed: u64 },
}

impl EstimatorConfig {
    pub fn task_type(&self) -> TaskType {
        match self {
            EstimatorConfig::KNearestNeighbors { .. }
            | EstimatorConfig::RandomForestClassifier { .. } => TaskType::Classification,
            EstimatorConfig::RandomForestRegressor { .. } => TaskType::Regression,
        }
    }

    /// Check hyperparameters that do not depend on the data
    pub fn validate(&self) -> Result<()> {
        match self {
            EstimatorConfig::KNearestNeighbors { n_neighbors: 0 } => {
                Err(EvalError::InvalidParameter {
                    name: "n_neighbors".to_string(),
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                })
            }
            EstimatorConfig::RandomForestRegressor { n_estimators: 0, .. }
            | EstimatorConfig::RandomForestClassifier { n_estimators: 0, .. } => {
                Err(EvalError::InvalidParameter {
                    name: "n_estimators".to_string(),
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Create an unfitted estimator
    pub fn build(&self) -> Result<Box<dyn Estimator>> {
        self.validate()?;

        Ok(match *self {
            EstimatorConfig::KNearestNeighbors { n_neighbors } => {
                Box::new(KNNClassifier::with_k(n_neighbors))
            }
            EstimatorConfig::RandomForestRegressor { n_estimators, seed } => {
                Box::new(RandomForest::new_regressor(n_estimators).with_random_state(seed))
            }
            EstimatorConfig::RandomForestClassifier { n_estimators, seed } => {
                Box::new(RandomForest::new_classifier(n_estimators).with_random_state(seed))
            }
        })
    }
}

impl fmt::Display for EstimatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorConfig::KNearestNeighbors { n_neighbors } => {
                write!(f, "KNN classifier (k={})", n_neighbors)
            }
            EstimatorConfig::RandomForestRegressor { n_estimators, seed } => {
                write!(f, "random forest regressor ({} trees, seed {})", n_estimators, seed)
            }
            EstimatorConfig::RandomForestClassifier { n_estimators, seed } => {
                write!(f, "random forest classifier ({} trees, seed {})", n_estimators, seed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_matches_task() {
        let configs = [
            EstimatorConfig::KNearestNeighbors { n_neighbors: 5 },
            EstimatorConfig::RandomForestRegressor { n_estimators: 120, seed: 11 },
            EstimatorConfig::RandomForestClassifier { n_estimators: 100, seed: 42 },
        ];

        for config in configs {
            let estimator = config.build().unwrap();
            assert_eq!(estimator.task_type(), config.task_type());
        }
    }

    #[test]
    fn test_zero_parameters_rejected() {
        assert!(EstimatorConfig::KNearestNeighbors { n_neighbors: 0 }.build().is_err());
        assert!(EstimatorConfig::RandomForestClassifier { n_estimators: 0, seed: 1 }
            .validate()
            .is_err());
    }

    #[test]
    fn test_serde_format() {
        let config = EstimatorConfig::RandomForestRegressor { n_estimators: 120, seed: 11 };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"RandomForestRegressor":{"n_estimators":120,"seed":11}}"#);

        let back: EstimatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
