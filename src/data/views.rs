//! View types for algorithm access.

use ndarray::{ArrayView1, ArrayView2, Axis};

/// Read-only view into raw feature data.
///
/// Storage is feature-major: `[n_features, n_samples]`.
/// This means:
/// - `feature(f)` returns all samples for feature f
/// - `get(s, f)` reads a single cell
///
/// The view does not require contiguous memory. A sample-major array can be
/// wrapped without copying through [`FeaturesView::from_sample_major`]; the
/// per-feature access is then strided.
#[derive(Debug, Clone, Copy)]
pub struct FeaturesView<'a> {
    /// Shape: [n_features, n_samples]
    data: ArrayView2<'a, f32>,
}

impl<'a> FeaturesView<'a> {
    /// Create a features view from a feature-major array.
    ///
    /// # Arguments
    ///
    /// * `data` - Array with shape `[n_features, n_samples]`
    pub fn from_array(data: ArrayView2<'a, f32>) -> Self {
        Self { data }
    }

    /// Create a features view from a sample-major array (`[n_samples, n_features]`).
    ///
    /// This is zero-copy: the axes are swapped in the view.
    pub fn from_sample_major(data: ArrayView2<'a, f32>) -> Self {
        Self {
            data: data.reversed_axes(),
        }
    }

    /// Create from a contiguous slice in feature-major order.
    ///
    /// Data layout: `[f0_s0, f0_s1, ..., f1_s0, f1_s1, ...]`
    ///
    /// Returns `None` if the slice length doesn't match `n_samples * n_features`.
    pub fn from_slice(data: &'a [f32], n_samples: usize, n_features: usize) -> Option<Self> {
        ArrayView2::from_shape((n_features, n_samples), data)
            .ok()
            .map(|data| Self { data })
    }

    /// Number of samples (second dimension).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Number of features (first dimension).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.data.nrows()
    }

    /// Get feature value at (sample, feature).
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> f32 {
        self.data[[feature, sample]]
    }

    /// All sample values of one feature.
    #[inline]
    pub fn feature(&self, feature: usize) -> ArrayView1<'a, f32> {
        self.data.index_axis_move(Axis(0), feature)
    }

    /// The underlying array view, shape `[n_features, n_samples]`.
    pub fn view(&self) -> ArrayView2<'a, f32> {
        self.data
    }
}

impl<'a> From<ArrayView2<'a, f32>> for FeaturesView<'a> {
    fn from(data: ArrayView2<'a, f32>) -> Self {
        Self::from_array(data)
    }
}
