//! histboost: the numerical core of a histogram-based gradient boosting
//! trainer.
//!
//! Two independent building blocks:
//!
//! - [`binning`]: learns per-feature thresholds from continuous data and maps
//!   values to compact `u8` bin codes, so that split finding works on small
//!   histograms instead of sorted real values.
//! - [`objective`]: loss functions with gradients, hessians, inverse link
//!   and baseline prediction for least squares, binary cross-entropy and
//!   categorical cross-entropy.
//!
//! Tree growing, prediction and model persistence are left to callers.
//!
//! # Example
//!
//! ```
//! use histboost::{BinningConfig, FeaturesView, Objective, ObjectiveFn};
//! use ndarray::{array, Array2};
//!
//! // Feature-major data: 2 features, 6 samples
//! let x = array![
//!     [0.1f32, 0.4, 0.2, 0.9, 0.5, 0.7],
//!     [10.0, 10.0, 20.0, 20.0, 30.0, 30.0],
//! ];
//! let config = BinningConfig::builder().max_bins(4).build().unwrap();
//! let (mapper, binned) = config.fit_transform(FeaturesView::from_array(x.view())).unwrap();
//! assert_eq!(mapper.n_bins(1), 3);
//! assert_eq!(binned.feature(1), &[0, 0, 1, 1, 2, 2]);
//!
//! let y = array![0.0, 0.0, 1.0, 1.0, 1.0, 0.0];
//! let objective = Objective::from_name("least_squares", 1).unwrap();
//! let raw = Array2::from_elem((1, 6), objective.baseline_prediction(y.view())[0]);
//! assert!((objective.evaluate(y.view(), raw.view(), true) - 0.125).abs() < 1e-12);
//! ```

pub mod binning;
pub mod data;
pub mod error;
pub mod objective;
pub mod utils;

pub use binning::{BinMapper, BinThresholds, BinnedMatrix, BinningConfig};
pub use data::FeaturesView;
pub use error::{ConfigError, Error, Result};
pub use objective::{Gradients, Objective, ObjectiveFn, ObjectiveKind};
pub use utils::Parallelism;
