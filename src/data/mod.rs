//! Raw feature data accepted by the binner.
//!
//! Features are stored feature-major (`[n_features, n_samples]`) because
//! binning and the downstream histogram work scan one feature at a time.

mod views;

pub use views::FeaturesView;
