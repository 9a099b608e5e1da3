//! Empirical magnitude scaling relationships.
//!
//! Ties the pipeline together for one measure collection:
//!
//! ```text
//!  MeasureCollection ──▶ GroupingStrategy ──▶ SelectionStrategy ──▶ RegressionModel(s) ──▶ EmsrOutcome
//!                         (Emsr::new)          + MissingUncertainty    one per ModelKind      best() by AICc
//! ```
//!
//! The best [`ScalingRelationship`] converts into a
//! [`ConversionFormula`](emsr_harmonise::ConversionFormula) for the
//! harmoniser.
//!
//! # Quick start
//!
//! ```ignore
//! use emsr_scaling::Emsr;
//!
//! let emsr = Emsr::new(catalogue.all(), GroupingStrategy::ByEvent)?;
//! let outcome = emsr.apply_regression_model(
//!     "mb", "Mw",
//!     &SelectionStrategy::Precise,
//!     &MissingUncertainty::Discard,
//!     &catalogue,
//!     &[ModelKind::Linear, ModelKind::Polynomial { order: 2 }],
//!     &OdrConfig::default(),
//! )?;
//! let formula = outcome.best().map(|r| r.to_formula(None));
//! ```

mod emsr;
mod error;
mod outcome;

pub use emsr::Emsr;
pub use error::ScalingError;
pub use outcome::{EmsrOutcome, ModelFailure, PairPoint, ScalingRelationship};
