//! # emsr-harmonise
//!
//! Converts magnitude measures from heterogeneous scales onto one target
//! scale with a library of [`ConversionFormula`]s.
//!
//! Each formula maps the measures in its domain (a catalogue [`Filter`]
//! such as "scale `mb` reported by agency `A`") to its target scale. When
//! no formula converts a measure directly, the [`Harmoniser`] chains
//! formulas through intermediate scales:
//!
//! ```text
//! mb (agency A) ──f1──▶ M2 ──f2──▶ Mw
//! ```
//!
//! Standard errors propagate along the chain. The [`HarmoniserResult`]
//! partitions the input into converted and unconverted measures and can be
//! exported as CSV or JSON.
//!
//! [`Filter`]: emsr_catalogue::Filter

mod config;
mod error;
mod formula;
mod harmoniser;
mod result;

pub use config::HarmoniserConfig;
pub use error::HarmoniseError;
pub use formula::{ConversionFormula, Transform};
pub use harmoniser::Harmoniser;
pub use result::{ConvertedMeasure, ExportFormat, HarmoniserResult};
