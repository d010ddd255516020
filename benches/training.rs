use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tabular_eval::evaluation::{evaluate_dataset, presets};
use tabular_eval::training::{KNNClassifier, RandomForest};
use tabular_eval::utils::Dataset;

fn create_regression_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);
    let y: Array1<f64> = x
        .rows()
        .into_iter()
        .map(|row| row.sum() + rng.gen::<f64>() * 0.1)
        .collect();

    (x, y)
}

fn create_advertising_frame(n_rows: usize) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let tv: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>() * 300.0).collect();
    let radio: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>() * 50.0).collect();
    let newspaper: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>() * 100.0).collect();
    let sales: Vec<f64> = (0..n_rows)
        .map(|i| 3.0 + 0.05 * tv[i] + 0.2 * radio[i] + rng.gen::<f64>())
        .collect();

    df!(
        "TV" => tv,
        "Radio" => radio,
        "Newspaper" => newspaper,
        "Sales" => sales
    )
    .unwrap()
}

fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);

    for n_rows in [200, 1000, 5000].iter() {
        let (x, y) = create_regression_data(*n_rows, 4);

        group.bench_with_input(BenchmarkId::new("regressor_120", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut forest = RandomForest::new_regressor(120).with_random_state(11);
                forest.fit(black_box(x), black_box(y)).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_knn_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_predict");

    let (x_train, y_train) = create_regression_data(5000, 4);
    let labels = y_train.mapv(|v| (v / 10.0).floor());
    let mut knn = KNNClassifier::with_k(5);
    knn.fit(&x_train, &labels).unwrap();

    for n_rows in [100, 1000].iter() {
        let (x_test, _) = create_regression_data(*n_rows, 4);

        group.bench_with_input(BenchmarkId::new("predict", n_rows), &x_test, |b, x| {
            b.iter(|| knn.predict(black_box(x)).unwrap())
        });
    }

    group.finish();
}

fn bench_routine(c: &mut Criterion) {
    let mut group = c.benchmark_group("routine");
    group.sample_size(10);

    let dataset = Dataset::from_frame(create_advertising_frame(200), &BTreeMap::new()).unwrap();
    let config = presets::sales();

    group.bench_function("sales_preset", |b| {
        b.iter(|| evaluate_dataset(black_box(&config), black_box(&dataset)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_forest_fit, bench_knn_predict, bench_routine);
criterion_main!(benches);
