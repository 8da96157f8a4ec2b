//! Classification objectives.
//!
//! Both objectives work on logits. Targets are `0.0`/`1.0` for the binary
//! case and class indices `0.0..n_classes` for the multiclass case.

use ndarray::{aview1, s, ArrayView1, ArrayView2, ArrayViewMut2};
use rayon::prelude::*;

use super::math::{logsumexp, sigmoid, softmax_into, softplus};
use super::{
    for_each_block, mean, validate_gradient_inputs, validate_inputs, ObjectiveFn, BLOCK_SIZE,
    PROBA_EPSILON,
};

#[inline]
fn clip_probability(p: f64) -> f64 {
    p.clamp(PROBA_EPSILON, 1.0 - PROBA_EPSILON)
}

// =============================================================================
// Binary Cross-Entropy
// =============================================================================

/// Log loss for binary classification.
///
/// - Loss: `softplus(raw) - target * raw`
/// - Gradient: `σ(raw) - target`
/// - Hessian: `σ(raw) * (1 - σ(raw))`
/// - Inverse link: sigmoid
/// - Baseline: log-odds of the positive rate, clipped away from 0 and 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryCrossEntropy;

impl ObjectiveFn for BinaryCrossEntropy {
    fn n_outputs(&self) -> usize {
        1
    }

    fn pointwise_loss(&self, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>, out: &mut [f64]) {
        validate_inputs(1, y, raw);
        assert_eq!(out.len(), y.len(), "loss buffer length mismatch");
        for ((o, &y), &s) in out.iter_mut().zip(y.iter()).zip(raw.row(0).iter()) {
            *o = softplus(s) - y * s;
        }
    }

    fn inverse_link_inplace(&self, mut raw: ArrayViewMut2<'_, f64>) {
        raw.mapv_inplace(sigmoid);
    }

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
            for ((g, h), (&target, &pred)) in grads
                .iter_mut()
                .zip(hess.iter_mut())
                .zip(targets.iter().zip(preds.iter()))
            {
                let p = sigmoid(pred);
                *g = (p - target) as f32;
                *h = (p * (1.0 - p)) as f32;
            }
        });
    }

    fn baseline_prediction(&self, y_train: ArrayView1<'_, f64>) -> Vec<f64> {
        let p = clip_probability(mean(y_train).unwrap_or(0.5));
        vec![(p / (1.0 - p)).ln()]
    }

    fn name(&self) -> &'static str {
        "binary_crossentropy"
    }
}

// =============================================================================
// Categorical Cross-Entropy
// =============================================================================

/// Output-major gradient and hessian buffers shared by tasks that each own a
/// disjoint range of samples.
#[derive(Clone, Copy)]
struct DisjointSampleWriter {
    grads: *mut f32,
    hess: *mut f32,
    len: usize,
}

// SAFETY: tasks only write the indices of their own samples, which never
// overlap between tasks.
unsafe impl Send for DisjointSampleWriter {}
unsafe impl Sync for DisjointSampleWriter {}

impl DisjointSampleWriter {
    fn new(grads: &mut [f32], hess: &mut [f32]) -> Self {
        debug_assert_eq!(grads.len(), hess.len());
        Self {
            grads: grads.as_mut_ptr(),
            hess: hess.as_mut_ptr(),
            len: grads.len(),
        }
    }

    /// Store the gradient and hessian at `idx`.
    ///
    /// # Safety
    ///
    /// `idx < len`, and no other thread accesses `idx` concurrently.
    #[inline]
    unsafe fn write(&self, idx: usize, grad: f32, hess: f32) {
        debug_assert!(idx < self.len);
        // SAFETY: guaranteed by the caller.
        unsafe {
            *self.grads.add(idx) = grad;
            *self.hess.add(idx) = hess;
        }
    }
}

/// Softmax cross-entropy for multiclass classification.
///
/// Raw predictions hold one logit per class: shape `[n_classes, n_samples]`.
///
/// - Loss: `logsumexp(raw[:, i]) - raw[target, i]`
/// - Gradient (class k): `softmax_k - 1[target == k]`
/// - Hessian (class k): `softmax_k * (1 - softmax_k)`
/// - Inverse link: softmax over each sample's logits
/// - Baseline (class k): `ln(p_k)`, `p_k` the clipped class frequency
///
/// # Example
///
/// ```
/// use histboost::objective::{CategoricalCrossEntropy, ObjectiveFn};
/// use ndarray::array;
///
/// let objective = CategoricalCrossEntropy::new(3);
/// let probas = objective.inverse_link(array![[0.0], [0.0], [0.0]].view());
/// assert!((probas[[1, 0]] - 1.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalCrossEntropy {
    n_classes: usize,
}

impl CategoricalCrossEntropy {
    /// Create for `n_classes` classes.
    ///
    /// # Panics
    ///
    /// Panics if `n_classes < 2`.
    pub fn new(n_classes: usize) -> Self {
        assert!(n_classes >= 2, "n_classes must be >= 2, got {}", n_classes);
        Self { n_classes }
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[inline]
    fn label(&self, target: f64) -> usize {
        let label = target as usize;
        debug_assert!(
            label < self.n_classes,
            "label {} >= n_classes {}",
            target,
            self.n_classes
        );
        label
    }
}

impl ObjectiveFn for CategoricalCrossEntropy {
    fn n_outputs(&self) -> usize {
        self.n_classes
    }

    fn pointwise_loss(&self, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>, out: &mut [f64]) {
        validate_inputs(self.n_classes, y, raw);
        assert_eq!(out.len(), y.len(), "loss buffer length mismatch");
        for (sample, (o, &target)) in out.iter_mut().zip(y.iter()).enumerate() {
            let logits = raw.column(sample);
            *o = logsumexp(logits) - logits[self.label(target)];
        }
    }

    fn inverse_link_inplace(&self, mut raw: ArrayViewMut2<'_, f64>) {
        assert_eq!(
            raw.nrows(),
            self.n_classes,
            "raw predictions have {} outputs, objective expects {}",
            raw.nrows(),
            self.n_classes
        );
        let mut logits = vec![0.0; self.n_classes];
        let mut probas = vec![0.0; self.n_classes];
        for mut column in raw.columns_mut() {
            for (l, &v) in logits.iter_mut().zip(column.iter()) {
                *l = v;
            }
            softmax_into(&logits, &mut probas);
            column.assign(&aview1(&probas));
        }
    }

    fn update_gradients_and_hessians(
        &self,
        gradients: &mut [f32],
        hessians: &mut [f32],
        y: ArrayView1<'_, f64>,
        raw: ArrayView2<'_, f64>,
    ) {
        validate_gradient_inputs(self.n_classes, y, raw, gradients.len(), hessians.len());
        let n_samples = y.len();
        if n_samples == 0 {
            return;
        }

        // One task per sample block. The normalizer is computed once per
        // sample and every class of that sample is written from the same task.
        let writer = DisjointSampleWriter::new(gradients, hessians);
        (0..n_samples.div_ceil(BLOCK_SIZE))
            .into_par_iter()
            .for_each(|block| {
                let start = block * BLOCK_SIZE;
                let end = (start + BLOCK_SIZE).min(n_samples);
                for sample in start..end {
                    let logits = raw.column(sample);
                    let lse = logsumexp(logits);
                    let label = self.label(y[sample]);
                    for (class, &logit) in logits.iter().enumerate() {
                        let p = (logit - lse).exp();
                        let indicator = if class == label { 1.0 } else { 0.0 };
                        // SAFETY: `raw` has `n_classes` rows and `sample < n_samples`
                        // (validated above), and `sample` belongs to this block only.
                        unsafe {
                            writer.write(
                                class * n_samples + sample,
                                (p - indicator) as f32,
                                (p * (1.0 - p)) as f32,
                            );
                        }
                    }
                }
            });
    }

    fn baseline_prediction(&self, y_train: ArrayView1<'_, f64>) -> Vec<f64> {
        if y_train.is_empty() {
            return vec![0.0; self.n_classes];
        }

        // Labels outside 0..n_classes only count towards the total.
        let mut counts = vec![0usize; self.n_classes];
        for &target in y_train.iter() {
            if let Some(count) = counts.get_mut(target as usize) {
                *count += 1;
            }
        }

        let n = y_train.len() as f64;
        counts
            .into_iter()
            .map(|count| clip_probability(count as f64 / n).ln())
            .collect()
    }

    fn name(&self) -> &'static str {
        "categorical_crossentropy"
    }
}
