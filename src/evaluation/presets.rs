//! Built-in evaluation configurations

use super::config::{EncodeColumns, EvaluationConfig, TargetRule};
use crate::preprocessing::{CleaningPlan, ColumnType, ImputeStrategy};
use crate::training::EstimatorConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ready-made configurations for three well-known datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// Iris species, KNN classifier
    Iris,
    /// Advertising sales, random forest regressor
    Sales,
    /// Titanic survival, random forest classifier
    Titanic,
}

impl Preset {
    pub fn all() -> [Preset; 3] {
        [Preset::Iris, Preset::Sales, Preset::Titanic]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Iris => "iris",
            Preset::Sales => "sales",
            Preset::Titanic => "titanic",
        }
    }

    /// File read when no path is given
    pub fn default_file(&self) -> &'static str {
        match self {
            Preset::Iris => "IRIS.csv",
            Preset::Sales => "advertising.csv",
            Preset::Titanic => "Titanic-Dataset.csv",
        }
    }

    pub fn config(&self) -> EvaluationConfig {
        match self {
            Preset::Iris => iris(),
            Preset::Sales => sales(),
            Preset::Titanic => titanic(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Drop a leading `Id` if there is one, predict `Species` (or the last
/// column) with 5 nearest neighbours.
pub fn iris() -> EvaluationConfig {
    EvaluationConfig::new(
        "iris",
        Preset::Iris.default_file(),
        TargetRule::ColumnOrLast("Species".to_string()),
        EstimatorConfig::KNearestNeighbors { n_neighbors: 5 },
    )
    .with_cleaning(CleaningPlan::new().drop_if_present(["Id"]))
    .with_encode(EncodeColumns::Categorical)
    .with_split_seed(5)
    .with_sample_predictions(10)
}

/// Predict the last column with a 120-tree forest.
pub fn sales() -> EvaluationConfig {
    EvaluationConfig::new(
        "sales",
        Preset::Sales.default_file(),
        TargetRule::LastColumn,
        EstimatorConfig::RandomForestRegressor {
            n_estimators: 120,
            seed: 11,
        },
    )
    .with_encode(EncodeColumns::CategoricalFeatures)
    .with_split_seed(11)
    .with_sample_predictions(5)
}

/// Drop identifier columns, fill `Age` and `Embarked`, encode `Sex` and
/// `Embarked`, predict `Survived` with a 100-tree forest.
pub fn titanic() -> EvaluationConfig {
    let numeric = ["Survived", "Pclass", "Age", "SibSp", "Parch", "Fare"];
    let categorical = ["Sex", "Embarked"];

    let config = EvaluationConfig::new(
        "titanic",
        Preset::Titanic.default_file(),
        TargetRule::Column("Survived".to_string()),
        EstimatorConfig::RandomForestClassifier {
            n_estimators: 100,
            seed: 42,
        },
    )
    .with_cleaning(
        CleaningPlan::new()
            .drop_columns(["PassengerId", "Name", "Ticket", "Cabin"])
            .fill_missing("Age", ImputeStrategy::Median)
            .fill_missing("Embarked", ImputeStrategy::MostFrequent),
    )
    .with_encode(EncodeColumns::Named(
        categorical.iter().map(|c| c.to_string()).collect(),
    ))
    .with_split_seed(42)
    .with_sample_predictions(5);

    let config = numeric
        .iter()
        .fold(config, |c, col| c.with_column_type(*col, ColumnType::Numeric));
    categorical
        .iter()
        .fold(config, |c, col| c.with_column_type(*col, ColumnType::Categorical))
}
