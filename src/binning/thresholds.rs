//! Per-feature bin thresholds.

/// Bin thresholds for all features.
///
/// Stored in a CSR-like format:
/// - `values`: all thresholds concatenated
/// - `offsets`: offsets into `values` for each feature
///
/// A feature with `k` thresholds has `k + 1` bins. A value `v` maps to the
/// number of thresholds strictly less than `v`:
///
/// ```text
/// thresholds [t0, t1, t2]:
/// - bin 0: v <= t0 (and NaN)
/// - bin 1: t0 < v <= t1
/// - bin 2: t1 < v <= t2
/// - bin 3: v > t2
/// ```
///
/// # Memory Layout
///
/// ```text
/// offsets: [0, 3, 4, 4]
/// values:  [0.5, 1.5, 2.5,   ← Feature 0: 3 thresholds (4 bins)
///           10.0]            ← Feature 1: 1 threshold (2 bins)
///                            ← Feature 2: none (1 bin)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinThresholds {
    /// All thresholds concatenated, non-decreasing per feature.
    values: Box<[f32]>,

    /// `offsets[f]..offsets[f + 1]` is feature f's range in `values`.
    /// Length: n_features + 1
    offsets: Box<[u32]>,
}

impl BinThresholds {
    /// Create from pre-computed values.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is empty, its last element doesn't match
    /// `values.len()`, or a feature has more than 255 thresholds.
    pub fn new(values: Vec<f32>, offsets: Vec<u32>) -> Self {
        assert!(!offsets.is_empty(), "offsets must not be empty");
        assert_eq!(
            offsets[offsets.len() - 1] as usize,
            values.len(),
            "last offset must equal values.len()"
        );
        for w in offsets.windows(2) {
            assert!(w[0] <= w[1], "offsets must be non-decreasing");
            assert!(w[1] - w[0] <= 255, "at most 255 thresholds per feature");
        }

        Self {
            values: values.into_boxed_slice(),
            offsets: offsets.into_boxed_slice(),
        }
    }

    /// Build from one threshold vector per feature.
    pub fn from_features<I>(features: I) -> Self
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let mut values = Vec::new();
        let mut offsets = vec![0u32];
        for thresholds in features {
            values.extend(thresholds);
            offsets.push(values.len() as u32);
        }
        Self::new(values, offsets)
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Thresholds of one feature, non-decreasing.
    #[inline]
    pub fn feature_thresholds(&self, feature: usize) -> &[f32] {
        let start = self.offsets[feature] as usize;
        let end = self.offsets[feature + 1] as usize;
        &self.values[start..end]
    }

    /// Number of bins of one feature (thresholds + 1).
    #[inline]
    pub fn n_bins(&self, feature: usize) -> usize {
        (self.offsets[feature + 1] - self.offsets[feature]) as usize + 1
    }

    /// Total bins across all features.
    ///
    /// Useful for pre-allocating histogram storage.
    pub fn total_bins(&self) -> usize {
        (0..self.n_features()).map(|f| self.n_bins(f)).sum()
    }

    /// Map a single value to its bin code.
    ///
    /// Binary search: O(log n_bins).
    #[inline]
    pub fn bin_value(&self, feature: usize, value: f32) -> u8 {
        bin_index(self.feature_thresholds(feature), value)
    }
}

/// Number of thresholds strictly less than `value`.
///
/// NaN compares false against every threshold and lands in bin 0.
#[inline]
pub(crate) fn bin_index(thresholds: &[f32], value: f32) -> u8 {
    thresholds.partition_point(|&t| t < value) as u8
}
