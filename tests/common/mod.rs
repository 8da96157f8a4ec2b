//! Data generators shared by the integration tests.

#![allow(dead_code)]

use histboost::{BinMapper, BinnedMatrix, BinningConfig, FeaturesView};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_distr::Normal;

// =============================================================================
// Features
// =============================================================================

/// Feature-major normal data, one `(loc, scale)` pair per feature.
pub fn normal_features(n_samples: usize, params: &[(f32, f32)], seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::zeros((params.len(), n_samples));
    for (mut row, &(loc, scale)) in data.rows_mut().into_iter().zip(params) {
        let normal = Normal::new(loc, scale).expect("valid normal parameters");
        row.iter_mut().for_each(|v| *v = rng.sample(normal));
    }
    data
}

/// Standard normal values for a single feature.
pub fn normal_column(n_samples: usize, seed: u64) -> Vec<f32> {
    normal_features(n_samples, &[(0.0, 1.0)], seed).row(0).to_vec()
}

/// Wrap a single column as a `[1, n_samples]` feature matrix.
pub fn single_feature(values: Vec<f32>) -> Array2<f32> {
    let n = values.len();
    Array2::from_shape_vec((1, n), values).expect("shape matches length")
}

/// Fit a mapper with `max_bins` and bin the same data.
pub fn fit_transform(max_bins: usize, data: &Array2<f32>) -> (BinMapper, BinnedMatrix) {
    BinningConfig::builder()
        .max_bins(max_bins)
        .build()
        .expect("valid max_bins")
        .fit_transform(FeaturesView::from_array(data.view()))
        .expect("fit_transform succeeds")
}

/// Indices that sort `values` ascending.
pub fn argsort(values: &[f32]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    indices
}

// =============================================================================
// Targets and raw predictions
// =============================================================================

/// Uniform values in `[low, high)`.
pub fn uniform(n: usize, low: f64, high: f64, seed: u64) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array1::from_shape_fn(n, |_| rng.gen_range(low..high))
}

/// Class labels in `0..n_classes`, stored as floats.
pub fn labels(n: usize, n_classes: usize, seed: u64) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array1::from_shape_fn(n, |_| rng.gen_range(0..n_classes) as f64)
}

/// Standard normal raw predictions, shape `[n_outputs, n_samples]`.
pub fn raw_predictions(n_outputs: usize, n_samples: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).expect("valid normal parameters");
    Array2::from_shape_fn((n_outputs, n_samples), |_| rng.sample(normal))
}
