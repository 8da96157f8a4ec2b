//! Fitted bin mapper.

use std::sync::Arc;

use log::{debug, trace};

use super::config::BinningConfig;
use super::finder::{find_thresholds, subsample_rows};
use super::matrix::BinnedMatrix;
use super::thresholds::{bin_index, BinThresholds};
use crate::data::FeaturesView;
use crate::error::{Error, Result};
use crate::utils::Parallelism;

/// Per-feature thresholds learned from training data.
///
/// Immutable after [`fit`](Self::fit); cheap to clone and safe to share
/// between threads.
#[derive(Debug, Clone)]
pub struct BinMapper {
    thresholds: Arc<BinThresholds>,
    n_bins_per_feature: Box<[u16]>,
    max_bins: usize,
    parallelism: Parallelism,
}

impl BinMapper {
    /// Learn thresholds for every feature of `data`.
    ///
    /// With `config.subsample = Some(s)` and more than `s` samples, the same
    /// `s` randomly drawn rows are used for every feature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` is invalid.
    pub fn fit(config: &BinningConfig, data: FeaturesView<'_>) -> Result<Self> {
        config.validate()?;

        let n_samples = data.n_samples();
        let n_features = data.n_features();

        let rows = match config.subsample {
            Some(subsample) if n_samples > subsample => {
                debug!(
                    "Binning: subsampling {} of {} rows (seed: {:?})",
                    subsample, n_samples, config.seed
                );
                Some(subsample_rows(n_samples, subsample, config.seed))
            }
            _ => None,
        };

        let per_feature = config.parallelism.maybe_par_map(n_features, |feature| {
            let column = data.feature(feature);
            let values: Vec<f32> = match &rows {
                Some(rows) => rows.iter().map(|&row| column[row]).collect(),
                None => column.iter().copied().collect(),
            };
            let thresholds = find_thresholds(values, config.max_bins);
            trace!(
                "Binning: feature {} -> {} bins",
                feature,
                thresholds.len() + 1
            );
            thresholds
        });

        let thresholds = BinThresholds::from_features(per_feature);
        let mapper = Self::from_thresholds(thresholds, config.max_bins, config.parallelism);

        debug!(
            "Binning: fitted {} features on {} samples, {} bins total (max_bins: {})",
            n_features,
            n_samples,
            mapper.thresholds.total_bins(),
            config.max_bins
        );

        Ok(mapper)
    }

    /// Build a mapper from known thresholds.
    ///
    /// # Panics
    ///
    /// Panics if any feature has more than `max_bins - 1` thresholds.
    pub fn new(thresholds: BinThresholds, max_bins: usize) -> Self {
        for feature in 0..thresholds.n_features() {
            assert!(
                thresholds.n_bins(feature) <= max_bins,
                "feature {} has more than {} bins",
                feature,
                max_bins
            );
        }
        Self::from_thresholds(thresholds, max_bins, Parallelism::default())
    }

    fn from_thresholds(thresholds: BinThresholds, max_bins: usize, parallelism: Parallelism) -> Self {
        let n_bins_per_feature = (0..thresholds.n_features())
            .map(|f| thresholds.n_bins(f) as u16)
            .collect();
        Self {
            thresholds: Arc::new(thresholds),
            n_bins_per_feature,
            max_bins,
            parallelism,
        }
    }

    /// Use the given parallelism for [`transform`](Self::transform).
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Map every value of `data` to its bin code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureCountMismatch`] if `data` does not have the
    /// number of features the mapper was fitted on.
    pub fn transform(&self, data: FeaturesView<'_>) -> Result<BinnedMatrix> {
        let n_features = self.n_features();
        if data.n_features() != n_features {
            return Err(Error::FeatureCountMismatch {
                expected: n_features,
                actual: data.n_features(),
            });
        }

        let n_samples = data.n_samples();
        let mut bins = vec![0u8; n_samples * n_features];

        if n_samples > 0 {
            let thresholds = &*self.thresholds;
            self.parallelism
                .maybe_par_chunks_mut(&mut bins, n_samples, |feature, out| {
                    let cuts = thresholds.feature_thresholds(feature);
                    for (code, &value) in out.iter_mut().zip(data.feature(feature).iter()) {
                        *code = bin_index(cuts, value);
                    }
                });
        }

        Ok(BinnedMatrix::new(
            bins,
            n_samples,
            n_features,
            Arc::clone(&self.thresholds),
        ))
    }

    /// Thresholds of all features.
    #[inline]
    pub fn thresholds(&self) -> &BinThresholds {
        &self.thresholds
    }

    /// Thresholds of one feature, non-decreasing.
    #[inline]
    pub fn feature_thresholds(&self, feature: usize) -> &[f32] {
        self.thresholds.feature_thresholds(feature)
    }

    /// Number of bins actually used by one feature.
    ///
    /// This is the number of thresholds plus one. On heavily tied data the
    /// percentile thresholds repeat, and the bins between repeated
    /// thresholds stay empty.
    #[inline]
    pub fn n_bins(&self, feature: usize) -> usize {
        self.n_bins_per_feature[feature] as usize
    }

    /// Number of bins actually used by each feature.
    #[inline]
    pub fn n_bins_per_feature(&self) -> &[u16] {
        &self.n_bins_per_feature
    }

    /// Number of features the mapper was fitted on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_bins_per_feature.len()
    }

    /// Upper bound on bins per feature.
    #[inline]
    pub fn max_bins(&self) -> usize {
        self.max_bins
    }
}
