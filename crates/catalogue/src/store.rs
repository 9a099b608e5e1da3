//! Store contracts used by the importer and the selection strategies.

use std::sync::Arc;

use crate::error::CatalogueError;
use crate::model::{Agency, Event, MagnitudeMeasure, MeasureDraft, Origin};

/// Write side of a measurement store.
///
/// Rows inserted since the last [`commit`](MeasureStore::commit) form the
/// pending batch. [`rollback`](MeasureStore::rollback) discards that batch
/// only; committed rows survive.
pub trait MeasureStore {
    /// Returns the event with the given natural key, creating it if needed.
    ///
    /// The boolean is `true` when the event was created by this call.
    fn get_or_create_event(&mut self, catalogue: &str, source_key: &str, name: &str)
    -> (Event, bool);

    /// Returns the agency with the given name, creating it if needed.
    fn get_or_create_agency(&mut self, name: &str) -> (Agency, bool);

    /// Inserts an origin keyed by `(event_key, source_key)`.
    ///
    /// # Errors
    ///
    /// [`CatalogueError::DuplicateKey`] if the key is already present.
    fn insert_origin(&mut self, origin: Origin) -> Result<Arc<Origin>, CatalogueError>;

    /// Inserts a measure keyed by `(event, origin, agency, scale)`.
    ///
    /// # Errors
    ///
    /// [`CatalogueError::DuplicateKey`] if the key is already present,
    /// [`CatalogueError::UnknownOrigin`] if the origin was never inserted.
    fn insert_measure(&mut self, draft: MeasureDraft) -> Result<MagnitudeMeasure, CatalogueError>;

    /// Makes the pending batch permanent.
    fn commit(&mut self);

    /// Discards the pending batch.
    fn rollback(&mut self);
}

/// Read access to every measure reported for an event.
///
/// Passed explicitly to the strategies that need to look beyond a single
/// measure.
pub trait EventSiblings {
    /// Returns all measures whose event source key is `event_key`.
    fn siblings(&self, event_key: &str) -> Vec<&MagnitudeMeasure>;
}
