//! Feature binning for histogram-based training.
//!
//! Histogram-based training discretizes every continuous feature into a small
//! number of bins (at most 256) so that split finding can accumulate integer
//! histograms instead of sorting real values. This enables:
//!
//! - O(n_bins) split search instead of O(n_samples)
//! - Better cache locality (u8 bin codes fit more data in cache)
//! - Histogram subtraction in the grower
//!
//! # Key Types
//!
//! - [`BinningConfig`]: `max_bins`, optional row subsampling and seed
//! - [`BinMapper`]: fitted per-feature thresholds; maps raw values to bins
//! - [`BinThresholds`]: threshold storage for all features
//! - [`BinnedMatrix`]: feature-major `u8` bin codes
//!
//! # Example
//!
//! ```
//! use histboost::binning::BinningConfig;
//! use histboost::data::FeaturesView;
//! use ndarray::Array2;
//!
//! // 1 feature, 1001 samples on a regular grid
//! let data = Array2::from_shape_fn((1, 1001), |(_, i)| i as f32 / 100.0);
//! let config = BinningConfig::builder().max_bins(10).build().unwrap();
//!
//! let (mapper, binned) = config.fit_transform(FeaturesView::from_array(data.view())).unwrap();
//! assert_eq!(mapper.feature_thresholds(0), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
//! assert_eq!(binned.feature(0)[0], 0);
//! assert_eq!(binned.feature(0)[1000], 9);
//! ```
//!
//! # Threshold Rules
//!
//! - At most `max_bins` distinct values: one bin per distinct value, with
//!   thresholds at the midpoints between consecutive distinct values.
//! - Otherwise: `max_bins - 1` thresholds at evenly spaced sample
//!   percentiles (midpoint interpolation), giving equal-occupancy bins.
//!
//! A value's bin is the number of thresholds strictly below it. NaN goes to
//! bin 0.

mod config;
mod finder;
mod mapper;
mod matrix;
mod thresholds;

pub use config::{BinningConfig, DEFAULT_MAX_BINS, MAX_BINS, MIN_BINS};
pub use mapper::BinMapper;
pub use matrix::BinnedMatrix;
pub use thresholds::BinThresholds;
