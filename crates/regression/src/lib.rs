//! Errors-in-variables regression between two magnitude scales.
//!
//! Fits `target = f(native; beta)` for linear and polynomial `f` by
//! orthogonal distance regression, weighting every pair by the standard
//! errors on both axes.
//!
//! # Workflow
//!
//! ```text
//!  RegressionData::new ──▶ RegressionModel::new(kind, data) ──▶ run() ──▶ FittedModel
//!   (validation, n >= 3)     .with_config(OdrConfig)          (once)     beta, residual, AIC/AICc
//! ```
//!
//! The starting coefficients come from an ordinary least-squares polyfit
//! unless supplied. A fit succeeds only when the solver reports
//! sum-of-squares convergence.
//!
//! # Quick start
//!
//! ```rust
//! use emsr_regression::{ModelKind, OdrConfig, RegressionData, RegressionModel};
//!
//! let data = RegressionData::new(
//!     vec![4.0, 4.6, 5.1, 5.9],
//!     vec![0.1; 4],
//!     vec![4.3, 4.9, 5.6, 6.3],
//!     vec![0.1; 4],
//! )
//! .unwrap();
//!
//! let fit = RegressionModel::new(ModelKind::Linear, data)
//!     .with_config(OdrConfig::new().with_max_iterations(3000))
//!     .run()
//!     .unwrap();
//! assert_eq!(fit.parameter_count(), 2);
//! ```

mod config;
mod data;
mod error;
mod fit;
mod model;
mod odr;
mod polyfit;

pub use config::OdrConfig;
pub use data::{MIN_SAMPLES, RegressionData};
pub use error::RegressionError;
pub use fit::{Criteria, FittedModel, StopReason, information_criteria};
pub use model::{ModelKind, evaluate, slope};
pub use odr::RegressionModel;
pub use polyfit::polyfit;
