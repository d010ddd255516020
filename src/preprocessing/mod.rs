//! Data preprocessing module
//!
//! Cleaning applied before model fitting:
//! - Column drops and missing value imputation ([`CleaningPlan`])
//! - Per-column label encoding of categorical values ([`Encoder`])

mod cleaning;
mod encoder;
mod imputer;

pub use cleaning::{CleaningPlan, CleaningStep};
pub use encoder::{Encoder, LabelEncoder};
pub use imputer::{ImputeStrategy, ImputeValue, Imputer};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column data type, resolved once when a dataset is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_serialize() {
        let json = serde_json::to_string(&ColumnType::Numeric).unwrap();
        assert_eq!(json, "\"Numeric\"");
        let back: ColumnType = serde_json::from_str("\"Categorical\"").unwrap();
        assert_eq!(back, ColumnType::Categorical);
    }
}
