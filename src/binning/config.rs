//! Binning configuration with builder pattern.

use bon::Builder;

use super::mapper::BinMapper;
use super::matrix::BinnedMatrix;
use crate::data::FeaturesView;
use crate::error::{ConfigError, Result};
use crate::utils::Parallelism;

/// Smallest supported `max_bins`.
pub const MIN_BINS: usize = 2;

/// Largest supported `max_bins`; bin codes must fit in a `u8`.
pub const MAX_BINS: usize = 256;

/// Default `max_bins`.
pub const DEFAULT_MAX_BINS: usize = MAX_BINS;

/// Configuration for fitting a [`BinMapper`].
///
/// # Example
///
/// ```
/// use histboost::binning::BinningConfig;
///
/// // All defaults: 256 bins, no subsampling
/// let config = BinningConfig::builder().build().unwrap();
/// assert_eq!(config.max_bins, 256);
///
/// // Approximate thresholds from 200k rows, reproducibly
/// let config = BinningConfig::builder()
///     .max_bins(64)
///     .subsample(200_000)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert!(BinningConfig::builder().max_bins(1024).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct BinningConfig {
    /// Maximum number of bins per feature, in `[2, 256]`. Default: 256.
    #[builder(default = DEFAULT_MAX_BINS)]
    pub max_bins: usize,

    /// Fit thresholds on at most this many rows, drawn without replacement.
    /// `None` (default) uses every row.
    pub subsample: Option<usize>,

    /// Seed for row subsampling. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Whether features may be processed in parallel. Default: parallel.
    #[builder(default)]
    pub parallelism: Parallelism,
}

impl<S: binning_config_builder::IsComplete> BinningConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `max_bins` is outside `[2, 256]`
    /// - `subsample` is `Some(0)`
    pub fn build(self) -> std::result::Result<BinningConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            max_bins: DEFAULT_MAX_BINS,
            subsample: None,
            seed: None,
            parallelism: Parallelism::default(),
        }
    }
}

impl BinningConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(MIN_BINS..=MAX_BINS).contains(&self.max_bins) {
            return Err(ConfigError::MaxBins(self.max_bins));
        }
        if self.subsample == Some(0) {
            return Err(ConfigError::Subsample(0));
        }
        Ok(())
    }

    /// Learn per-feature thresholds from `data`.
    ///
    /// See [`BinMapper::fit`].
    pub fn fit(&self, data: FeaturesView<'_>) -> Result<BinMapper> {
        BinMapper::fit(self, data)
    }

    /// Fit on `data` and bin the same data.
    ///
    /// Equivalent to [`fit`](Self::fit) followed by [`BinMapper::transform`].
    pub fn fit_transform(&self, data: FeaturesView<'_>) -> Result<(BinMapper, BinnedMatrix)> {
        let mapper = self.fit(data)?;
        let binned = mapper.transform(data)?;
        Ok((mapper, binned))
    }
}
