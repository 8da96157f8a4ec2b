//! Objective (loss) functions for gradient boosting.
//!
//! An objective turns raw predictions into per-sample losses, first and
//! second derivatives, link-space probabilities, and a constant baseline
//! prediction to start boosting from.
//!
//! # Multi-Output Layout
//!
//! Raw predictions are an `[n_outputs, n_samples]` array. Gradient and
//! hessian buffers are flat slices in the same **output-major** order:
//! `gradients[output * n_samples + sample]`.
//!
//! For example, with 3 samples and 2 outputs:
//! - `gradients[0..3]` = output 0 for all samples
//! - `gradients[3..6]` = output 1 for all samples
//!
//! Targets are one value per sample. For categorical cross-entropy the
//! target is the class index stored as a float.
//!
//! # Available Objectives
//!
//! - [`LeastSquares`]: regression, `½(y − s)²`
//! - [`BinaryCrossEntropy`]: binary classification on logits
//! - [`CategoricalCrossEntropy`]: multiclass softmax cross-entropy
//!
//! # Example
//!
//! ```
//! use histboost::objective::{Gradients, Objective, ObjectiveFn};
//! use ndarray::{array, Array2};
//!
//! let objective = Objective::from_name("binary_crossentropy", 1).unwrap();
//! let y = array![0.0, 1.0, 1.0, 1.0];
//!
//! let baseline = objective.baseline_prediction(y.view());
//! let raw = Array2::from_elem((1, 4), baseline[0]);
//!
//! let mut gradients = Gradients::new(4, objective.n_outputs());
//! objective.update(&mut gradients, y.view(), raw.view());
//! assert!(gradients.output_grads(0)[0] > 0.0);
//! assert!(gradients.output_grads(0)[1] < 0.0);
//! ```

mod classification;
mod gradients;
pub mod math;
mod regression;

pub use classification::{BinaryCrossEntropy, CategoricalCrossEntropy};
pub use gradients::Gradients;
pub use regression::LeastSquares;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};
use rayon::prelude::*;

use crate::error::{ConfigError, Error, Result};

/// Samples per parallel work item in the gradient loops.
pub(crate) const BLOCK_SIZE: usize = 4096;

/// Probability clip used by the classification baselines so that all-0 or
/// all-1 targets still give finite log-odds.
pub(crate) const PROBA_EPSILON: f64 = f32::EPSILON as f64;

// =============================================================================
// Objective Trait
// =============================================================================

/// An objective (loss) function for training gradient boosted models.
///
/// Implementations hold no per-call state; buffers are borrowed for the
/// duration of a call only.
///
/// # Panics
///
/// Methods taking `y` and `raw` panic if `raw` is not
/// `[n_outputs, y.len()]` or an output buffer has the wrong length.
pub trait ObjectiveFn: Send + Sync {
    /// Number of raw predictions per sample.
    fn n_outputs(&self) -> usize;

    /// Write the loss of every sample into `out` (length `n_samples`).
    fn pointwise_loss(&self, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>, out: &mut [f64]);

    /// Mean (`average = true`) or sum of the per-sample losses.
    ///
    /// The mean of zero samples is NaN.
    fn evaluate(&self, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>, average: bool) -> f64 {
        let mut losses = vec![0.0; y.len()];
        self.pointwise_loss(y, raw, &mut losses);
        let total: f64 = losses.iter().sum();
        if average {
            total / losses.len() as f64
        } else {
            total
        }
    }

    /// Map raw predictions to the target space in place.
    ///
    /// Identity for regression, sigmoid for binary classification, softmax
    /// over each sample's column for multiclass.
    fn inverse_link_inplace(&self, raw: ArrayViewMut2<'_, f64>);

    /// Map raw predictions to the target space.
    fn inverse_link(&self, raw: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = raw.to_owned();
        self.inverse_link_inplace(out.view_mut());
        out
    }

    /// Overwrite `gradients` and `hessians` with the derivatives of the loss
    /// with respect to `raw`.
    ///
    /// Both buffers have length `n_outputs * n_samples` in output-major
    /// order. Values are computed in `f64` and stored as `f32`.
    fn update_gradients_and_hessians(
        &self,
        gradients: &mut [f32],
        hessians: &mut [f32],
        y: ArrayView1<'_, f64>,
        raw: ArrayView2<'_, f64>,
    );

    /// Constant raw prediction minimizing the loss on `y_train`.
    ///
    /// Returns a vector of length `n_outputs()`.
    fn baseline_prediction(&self, y_train: ArrayView1<'_, f64>) -> Vec<f64>;

    /// Whether the hessian is the same for every sample and prediction.
    fn hessians_are_constant(&self) -> bool {
        false
    }

    /// Registry name of the objective.
    fn name(&self) -> &'static str;
}

// =============================================================================
// Registry
// =============================================================================

/// Identifier of a registered objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveKind {
    LeastSquares,
    BinaryCrossEntropy,
    CategoricalCrossEntropy,
}

impl ObjectiveKind {
    /// All registered objectives.
    pub const ALL: [ObjectiveKind; 3] = [
        ObjectiveKind::LeastSquares,
        ObjectiveKind::BinaryCrossEntropy,
        ObjectiveKind::CategoricalCrossEntropy,
    ];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            Self::LeastSquares => "least_squares",
            Self::BinaryCrossEntropy => "binary_crossentropy",
            Self::CategoricalCrossEntropy => "categorical_crossentropy",
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectiveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnsupportedObjective(s.to_string()))
    }
}

// =============================================================================
// Objective Enum
// =============================================================================

/// Closed set of objectives with static dispatch.
///
/// Implements [`ObjectiveFn`] by delegating to the wrapped variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Squared error for regression.
    LeastSquares(LeastSquares),
    /// Log loss for binary classification.
    BinaryCrossEntropy(BinaryCrossEntropy),
    /// Softmax cross-entropy for multiclass classification.
    CategoricalCrossEntropy(CategoricalCrossEntropy),
}

impl Objective {
    /// Look up an objective by registry name.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedObjective`] for an unknown name.
    /// - [`Error::InvalidConfiguration`] if `prediction_dim` does not fit
    ///   the objective (1 for least squares and binary cross-entropy, at
    ///   least 2 for categorical cross-entropy).
    pub fn from_name(name: &str, prediction_dim: usize) -> Result<Self> {
        Self::new(name.parse()?, prediction_dim)
    }

    /// Build the objective of the given kind.
    ///
    /// See [`from_name`](Self::from_name) for the accepted dimensions.
    pub fn new(kind: ObjectiveKind, prediction_dim: usize) -> Result<Self> {
        let objective = match (kind, prediction_dim) {
            (ObjectiveKind::LeastSquares, 1) => Self::least_squares(),
            (ObjectiveKind::BinaryCrossEntropy, 1) => Self::binary_crossentropy(),
            (ObjectiveKind::CategoricalCrossEntropy, n) if n >= 2 => {
                Self::categorical_crossentropy(n)
            }
            (kind, dim) => {
                return Err(ConfigError::PredictionDim {
                    objective: kind.name(),
                    dim,
                }
                .into())
            }
        };
        Ok(objective)
    }

    pub fn least_squares() -> Self {
        Self::LeastSquares(LeastSquares)
    }

    pub fn binary_crossentropy() -> Self {
        Self::BinaryCrossEntropy(BinaryCrossEntropy)
    }

    /// Softmax cross-entropy over `n_classes` classes.
    ///
    /// # Panics
    ///
    /// Panics if `n_classes < 2`.
    pub fn categorical_crossentropy(n_classes: usize) -> Self {
        Self::CategoricalCrossEntropy(CategoricalCrossEntropy::new(n_classes))
    }

    /// Registry identifier of this objective.
    pub fn kind(&self) -> ObjectiveKind {
        match self {
            Self::LeastSquares(_) => ObjectiveKind::LeastSquares,
            Self::BinaryCrossEntropy(_) => ObjectiveKind::BinaryCrossEntropy,
            Self::CategoricalCrossEntropy(_) => ObjectiveKind::CategoricalCrossEntropy,
        }
    }

    /// Fill a [`Gradients`] buffer for the current raw predictions.
    pub fn update(&self, gradients: &mut Gradients, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>) {
        let (grads, hess) = gradients.as_mut_slices();
        self.update_gradients_and_hessians(grads, hess, y, raw);
    }
}

impl ObjectiveFn for Objective {
    fn n_outputs(&self) -> usize {
        match self {
            Self::LeastSquares(inner) => inner.n_outputs(),
            Self::BinaryCrossEntropy(inner) => inner.n_outputs(),
            Self::CategoricalCrossEntropy(inner) => inner.n_outputs(),
        }
    }

    fn pointwise_loss(&self, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>, out: &mut [f64]) {
        match self {
            Self::LeastSquares(inner) => inner.pointwise_loss(y, raw, out),
            Self::BinaryCrossEntropy(inner) => inner.pointwise_loss(y, raw, out),
            Self::CategoricalCrossEntropy(inner) => inner.pointwise_loss(y, raw, out),
        }
    }

    fn inverse_link_inplace(&self, raw: ArrayViewMut2<'_, f64>) {
        match self {
            Self::LeastSquares(inner) => inner.inverse_link_inplace(raw),
            Self::BinaryCrossEntropy(inner) => inner.inverse_link_inplace(raw),
            Self::CategoricalCrossEntropy(inner) => inner.inverse_link_inplace(raw),
        }
    }

    fn update_gradients_and_hessians(
        &self,
        gradients: &mut [f32],
        hessians: &mut [f32],
        y: ArrayView1<'_, f64>,
        raw: ArrayView2<'_, f64>,
    ) {
        match self {
            Self::LeastSquares(inner) => {
                inner.update_gradients_and_hessians(gradients, hessians, y, raw)
            }
            Self::BinaryCrossEntropy(inner) => {
                inner.update_gradients_and_hessians(gradients, hessians, y, raw)
            }
            Self::CategoricalCrossEntropy(inner) => {
                inner.update_gradients_and_hessians(gradients, hessians, y, raw)
            }
        }
    }

    fn baseline_prediction(&self, y_train: ArrayView1<'_, f64>) -> Vec<f64> {
        match self {
            Self::LeastSquares(inner) => inner.baseline_prediction(y_train),
            Self::BinaryCrossEntropy(inner) => inner.baseline_prediction(y_train),
            Self::CategoricalCrossEntropy(inner) => inner.baseline_prediction(y_train),
        }
    }

    fn hessians_are_constant(&self) -> bool {
        match self {
            Self::LeastSquares(inner) => inner.hessians_are_constant(),
            Self::BinaryCrossEntropy(inner) => inner.hessians_are_constant(),
            Self::CategoricalCrossEntropy(inner) => inner.hessians_are_constant(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::LeastSquares(inner) => inner.name(),
            Self::BinaryCrossEntropy(inner) => inner.name(),
            Self::CategoricalCrossEntropy(inner) => inner.name(),
        }
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Check the shapes shared by every objective call.
fn validate_inputs(n_outputs: usize, y: ArrayView1<'_, f64>, raw: ArrayView2<'_, f64>) {
    assert_eq!(
        raw.nrows(),
        n_outputs,
        "raw predictions have {} outputs, objective expects {}",
        raw.nrows(),
        n_outputs
    );
    assert_eq!(
        raw.ncols(),
        y.len(),
        "raw predictions have {} samples, targets have {}",
        raw.ncols(),
        y.len()
    );
}

/// Check the shapes of a gradient/hessian update.
fn validate_gradient_inputs(
    n_outputs: usize,
    y: ArrayView1<'_, f64>,
    raw: ArrayView2<'_, f64>,
    gradients_len: usize,
    hessians_len: usize,
) {
    validate_inputs(n_outputs, y, raw);
    let required = n_outputs * y.len();
    assert_eq!(
        gradients_len, required,
        "gradients.len() ({}) != n_outputs * n_samples ({})",
        gradients_len, required
    );
    assert_eq!(
        hessians_len, required,
        "hessians.len() ({}) != n_outputs * n_samples ({})",
        hessians_len, required
    );
}

/// Run `f(first_sample, grads, hess)` over `BLOCK_SIZE` sample blocks of one
/// output, in parallel.
fn for_each_block<F>(gradients: &mut [f32], hessians: &mut [f32], f: F)
where
    F: Fn(usize, &mut [f32], &mut [f32]) + Sync + Send,
{
    gradients
        .par_chunks_mut(BLOCK_SIZE)
        .zip(hessians.par_chunks_mut(BLOCK_SIZE))
        .enumerate()
        .for_each(|(block, (grads, hess))| f(block * BLOCK_SIZE, grads, hess));
}

/// Mean of `y`, accumulated in `f64`. `None` when empty.
fn mean(y: ArrayView1<'_, f64>) -> Option<f64> {
    if y.is_empty() {
        None
    } else {
        Some(y.sum() / y.len() as f64)
    }
}

// =============================================================================
// Tests
// =============================================================================
