//! Integration tests for the split and the estimators

use ndarray::{Array1, Array2};
use std::collections::HashSet;
use tabular_eval::prelude::*;
use tabular_eval::training::{DecisionTree, KNNClassifier, MaxFeatures, RandomForest};

/// Three well-separated blobs in four dimensions
fn blobs(n_per_class: usize) -> (Array2<f64>, Array1<f64>) {
    let n = n_per_class * 3;
    let x = Array2::from_shape_fn((n, 4), |(i, j)| {
        let class = (i / n_per_class) as f64;
        class * 4.0 + ((i * 7 + j * 3) % 10) as f64 * 0.1
    });
    let y = Array1::from_shape_fn(n, |i| (i / n_per_class) as f64);
    (x, y)
}

fn linear(n: usize) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((n, 3), |(i, j)| ((i * (j + 3) * 17) % 101) as f64);
    let y = Array1::from_shape_fn(n, |i| 2.0 * x[[i, 0]] - 0.5 * x[[i, 1]] + 10.0);
    (x, y)
}

#[test]
fn test_split_is_partition() {
    let split = TrainTestSplit::new(0.2).with_random_state(42);
    let result = split.split(891).unwrap();

    assert_eq!(result.test_indices.len(), 179);
    assert_eq!(result.train_indices.len(), 712);

    let all: HashSet<usize> = result
        .train_indices
        .iter()
        .chain(result.test_indices.iter())
        .copied()
        .collect();
    assert_eq!(all.len(), 891);
    assert!(all.iter().all(|&i| i < 891));
}

#[test]
fn test_split_rejects_degenerate_inputs() {
    assert!(matches!(
        TrainTestSplit::new(1.2).split(100),
        Err(EvalError::InvalidParameter { .. })
    ));
    assert!(matches!(
        TrainTestSplit::new(0.2).split(1),
        Err(EvalError::InvalidParameter { .. })
    ));
}

#[test]
fn test_knn_on_blobs() {
    let (x, y) = blobs(20);
    let mut knn = KNNClassifier::with_k(5);
    knn.fit(&x, &y).unwrap();

    let predictions = knn.predict(&x).unwrap();
    assert_eq!(predictions, y);
}

#[test]
fn test_knn_k_larger_than_training_set() {
    let (x, y) = blobs(2);
    let result = EstimatorConfig::KNearestNeighbors { n_neighbors: 7 }
        .build()
        .unwrap()
        .fit(&x, &y);
    assert!(matches!(result, Err(EvalError::InvalidParameter { .. })));
}

#[test]
fn test_tree_fits_training_data() {
    let (x, y) = blobs(10);
    let mut tree = DecisionTree::new_classifier();
    tree.fit(&x, &y).unwrap();

    assert_eq!(tree.predict(&x).unwrap(), y);
    assert!(tree.get_n_leaves() >= 3);
}

#[test]
fn test_forest_classifier_through_trait() {
    let (x, y) = blobs(15);
    let mut forest = EstimatorConfig::RandomForestClassifier {
        n_estimators: 30,
        seed: 42,
    }
    .build()
    .unwrap();

    assert_eq!(forest.task_type(), TaskType::Classification);
    forest.fit(&x, &y).unwrap();
    let predictions = forest.predict(&x).unwrap();

    let correct = predictions.iter().zip(y.iter()).filter(|(p, t)| p == t).count();
    assert!(correct as f64 / y.len() as f64 > 0.9);
    assert!(predictions.iter().all(|p| [0.0, 1.0, 2.0].contains(p)));
}

#[test]
fn test_forest_regressor_beats_mean() {
    let (x, y) = linear(150);
    let mut forest = RandomForest::new_regressor(40).with_random_state(11);
    assert_eq!(forest.max_features, MaxFeatures::All);
    forest.fit(&x, &y).unwrap();

    let predictions = forest.predict(&x).unwrap();
    let mean = y.mean().unwrap();
    let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_res: f64 = y
        .iter()
        .zip(predictions.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    assert!(ss_res < ss_tot * 0.2, "residual {} vs total {}", ss_res, ss_tot);
}

#[test]
fn test_forest_seed_controls_result() {
    let (x, y) = linear(80);
    let fit = |seed| {
        let mut forest = RandomForest::new_regressor(10).with_random_state(seed);
        forest.fit(&x, &y).unwrap();
        forest.predict(&x).unwrap()
    };

    assert_eq!(fit(11), fit(11));
    assert_ne!(fit(11), fit(12));
}

#[test]
fn test_predict_with_wrong_width() {
    let (x, y) = blobs(5);
    let mut forest = RandomForest::new_classifier(3).with_random_state(1);
    forest.fit(&x, &y).unwrap();

    let narrow = Array2::<f64>::zeros((2, 3));
    assert!(matches!(
        forest.predict(&narrow),
        Err(EvalError::ShapeError { .. })
    ));
}
