//! Binned feature matrix.

use std::sync::Arc;

use ndarray::{Array2, ArrayView2};

use super::thresholds::BinThresholds;

/// Binned feature matrix storing `u8` bin codes.
///
/// Stored in **feature-major** order for efficient histogram building:
/// iterating samples for a single feature is contiguous memory access.
///
/// # Memory Layout
///
/// ```text
/// For 4 samples × 3 features:
///
/// bins: [s0f0, s1f0, s2f0, s3f0,   ← Feature 0 (contiguous)
///        s0f1, s1f1, s2f1, s3f1,   ← Feature 1
///        s0f2, s1f2, s2f2, s3f2]   ← Feature 2
/// ```
#[derive(Debug, Clone)]
pub struct BinnedMatrix {
    /// Bin codes: bins[feature * n_samples + sample]
    bins: Box<[u8]>,

    n_samples: usize,

    n_features: usize,

    /// Thresholds the codes were produced with.
    thresholds: Arc<BinThresholds>,
}

impl BinnedMatrix {
    /// Create a new binned matrix.
    ///
    /// # Arguments
    ///
    /// * `bins` - Bin codes in feature-major layout
    /// * `n_samples` - Number of samples
    /// * `n_features` - Number of features
    /// * `thresholds` - Thresholds used for binning
    ///
    /// # Panics
    ///
    /// Panics if `bins.len() != n_samples * n_features` or if `thresholds`
    /// describes a different number of features.
    pub fn new(
        bins: Vec<u8>,
        n_samples: usize,
        n_features: usize,
        thresholds: Arc<BinThresholds>,
    ) -> Self {
        assert_eq!(
            bins.len(),
            n_samples * n_features,
            "bins length must equal n_samples * n_features"
        );
        assert_eq!(
            thresholds.n_features(),
            n_features,
            "thresholds must cover every feature"
        );

        Self {
            bins: bins.into_boxed_slice(),
            n_samples,
            n_features,
            thresholds,
        }
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Thresholds the codes were produced with.
    #[inline]
    pub fn thresholds(&self) -> &BinThresholds {
        &self.thresholds
    }

    /// Bin code of a single cell.
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> u8 {
        self.bins[feature * self.n_samples + sample]
    }

    /// All bin codes of one feature (contiguous slice).
    ///
    /// This is the primary access pattern for histogram building.
    #[inline]
    pub fn feature(&self, feature: usize) -> &[u8] {
        let start = feature * self.n_samples;
        &self.bins[start..start + self.n_samples]
    }

    /// Iterate over bin codes for a subset of samples of one feature.
    ///
    /// Used for histogram building on the samples of a tree node.
    #[inline]
    pub fn iter_samples_for_feature<'a>(
        &'a self,
        feature: usize,
        samples: &'a [u32],
    ) -> impl Iterator<Item = u8> + 'a {
        let column = self.feature(feature);
        samples.iter().map(move |&s| column[s as usize])
    }

    /// View with shape `[n_features, n_samples]`.
    pub fn view(&self) -> ArrayView2<'_, u8> {
        ArrayView2::from_shape((self.n_features, self.n_samples), &self.bins)
            .expect("bins length is n_features * n_samples")
    }

    /// Bin codes as `f32` features, shape `[n_features, n_samples]`.
    ///
    /// Lets binned output be fed back into a binner.
    pub fn to_features(&self) -> Array2<f32> {
        self.view().mapv(f32::from)
    }
}
