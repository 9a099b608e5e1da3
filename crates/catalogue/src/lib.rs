//! # emsr-catalogue
//!
//! Magnitude measurement data model and the measurement store that every
//! other EMSR crate reads from.
//!
//! ## Entities
//!
//! ```text
//! Event ──< Origin ──< MagnitudeMeasure >── Agency
//! ```
//!
//! An [`Event`] groups every solution reported for one earthquake. Each
//! [`Origin`] is a located solution (time, position, depth and their
//! errors) and may carry several [`MagnitudeMeasure`]s on different scales
//! from different agencies. Measures share their origin through an `Arc`.
//!
//! ## Store
//!
//! [`MeasureStore`] is the write-side contract the bulletin importer needs
//! (get-or-create, duplicate-key detection, commit/rollback of a pending
//! batch). [`Catalogue`] is the in-memory implementation; it answers
//! [`Filter`] queries with a [`MeasureCollection`].
//!
//! ```
//! use emsr_catalogue::{Catalogue, Filter};
//!
//! let catalogue = Catalogue::new();
//! let view = catalogue.query(&Filter::scales(["mb"]).and(Filter::MagnitudeAtLeast(4.0)));
//! assert!(view.is_empty());
//! ```

mod collection;
mod error;
mod filter;
mod memory;
mod model;
mod store;

pub mod geo;

pub use collection::MeasureCollection;
pub use error::CatalogueError;
pub use filter::Filter;
pub use memory::Catalogue;
pub use model::{
    Agency, AnalysisType, Event, LocationMethod, MagnitudeMeasure, MeasureDraft, MeasureId, Origin,
};
pub use store::{EventSiblings, MeasureStore};
