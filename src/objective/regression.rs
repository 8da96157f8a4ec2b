//! Regression objectives.

use ndarray::{s, ArrayView1, ArrayView2, ArrayViewMut2};

use super::{for_each_block, mean, validate_gradient_inputs, validate_inputs, ObjectiveFn};

// =============================================================================
// Least Squares
// =============================================================================

/// Squared error loss for regression.
///
/// - Loss: `0.5 * (target - raw)²`
/// - Gradient: `raw - target`
/// - Hessian: `1.0`
/// - Inverse link: identity
/// - Baseline: mean of the targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeastSquares;

impl ObjectiveFn for LeastSquares {
    fn n_outputs(&self) -> usize {
        1
    }

    fn pointwise_loss(&self, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>, out: &mut [f64]) {
        validate_inputs(1, y, raw);
        assert_eq!(out.len(), y.len(), "loss buffer length mismatch");
        for ((o, &y), &s) in out.iter_mut().zip(y.iter()).zip(raw.row(0).iter()) {
            let diff = y - s;
            *o = 0.5 * diff * diff;
        }
    }

    fn inverse_link_inplace(&self, _raw: ArrayViewMut2<'_, f64>) {}

    fn update_gradients_and_hessians(
        &self,
        gradients: &mut [f32],
        hessians: &mut [f32],
        y: ArrayView1<'_, f64>,
        raw: ArrayView2<'_, f64>,
    ) {
        validate_gradient_inputs(1, y, raw, gradients.len(), hessians.len());
        let raw = raw.row(0);

        for_each_block(gradients, hessians, |start, grads, hess| {
            let end = start + grads.len();
            let targets = y.slice(s![start..end]);
            let preds = raw.slice(s![start..end]);
            for (g, (&target, &pred)) in grads.iter_mut().zip(targets.iter().zip(preds.iter())) {
                *g = (pred - target) as f32;
            }
            hess.fill(1.0);
        });
    }

    fn baseline_prediction(&self, y_train: ArrayView1<'_, f64>) -> Vec<f64> {
        vec![mean(y_train).unwrap_or(0.0)]
    }

    fn hessians_are_constant(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "least_squares"
    }
}
