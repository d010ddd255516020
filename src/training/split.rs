//! Seeded train/test partitioning

use crate::error::{EvalError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Holdout splitter.
///
/// `ceil(test_fraction * n)` rows go to the test partition; the rest train.
/// Rows are assigned from a permutation of `0..n` drawn from a ChaCha8
/// generator, so a given seed, fraction and row count always produce the
/// same partitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainTestSplit {
    test_fraction: f64,
    random_state: Option<u64>,
}

impl Default for TrainTestSplit {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            random_state: None,
        }
    }
}

impl TrainTestSplit {
    pub fn new(test_fraction: f64) -> Self {
        Self {
            test_fraction,
            random_state: None,
        }
    }

    /// Set random state for reproducibility
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Number of test rows for `n_samples`
    pub fn test_size(&self, n_samples: usize) -> Result<usize> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(EvalError::InvalidParameter {
                name: "test_fraction".to_string(),
                value: self.test_fraction.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }

        let n_test = (self.test_fraction * n_samples as f64).ceil() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(EvalError::InvalidParameter {
                name: "test_fraction".to_string(),
                value: self.test_fraction.to_string(),
                reason: format!(
                    "leaves an empty partition for {} row(s) ({} test)",
                    n_samples, n_test
                ),
            });
        }

        Ok(n_test)
    }

    /// Partition `0..n_samples`
    pub fn split(&self, n_samples: usize) -> Result<SplitIndices> {
        let n_test = self.test_size(n_samples)?;

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        indices.shuffle(&mut rng);

        let train_indices = indices.split_off(n_test);
        Ok(SplitIndices {
            train_indices,
            test_indices: indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sizes_round_test_up() {
        let split = TrainTestSplit::new(0.2).with_random_state(5);
        assert_eq!(split.test_size(150).unwrap(), 30);
        assert_eq!(split.test_size(891).unwrap(), 179);
        assert_eq!(split.test_size(7).unwrap(), 2);
    }

    #[test]
    fn test_partitions_cover_all_rows() {
        let result = TrainTestSplit::new(0.2).with_random_state(42).split(100).unwrap();

        assert_eq!(result.test_indices.len(), 20);
        assert_eq!(result.train_indices.len(), 80);

        let train: HashSet<_> = result.train_indices.iter().collect();
        let test: HashSet<_> = result.test_indices.iter().collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 100);
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = TrainTestSplit::new(0.2).with_random_state(11).split(200).unwrap();
        let b = TrainTestSplit::new(0.2).with_random_state(11).split(200).unwrap();
        let c = TrainTestSplit::new(0.2).with_random_state(12).split(200).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_fractions() {
        for fraction in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = TrainTestSplit::new(fraction).split(10).unwrap_err();
            assert!(matches!(err, EvalError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn test_tiny_dataset_rejected() {
        let split = TrainTestSplit::new(0.2).with_random_state(1);
        assert!(split.split(1).is_err());
        assert!(split.split(0).is_err());
        assert!(split.split(2).is_ok());
    }
}
