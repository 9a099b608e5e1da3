//! In-memory [`MeasureStore`] with batch commit and rollback.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::collection::MeasureCollection;
use crate::error::CatalogueError;
use crate::filter::Filter;
use crate::model::{Agency, Event, MagnitudeMeasure, MeasureDraft, MeasureId, Origin};
use crate::store::{EventSiblings, MeasureStore};

type OriginKey = (String, String);
type MeasureKey = (String, String, String, String);

/// Undo record for a row inserted in the pending batch.
#[derive(Debug)]
enum Pending {
    Event((String, String)),
    Agency(String),
    Origin(OriginKey),
    Measure(MeasureKey),
}

/// In-memory measurement store.
///
/// Measures are kept in insertion order. Identities are never reused, even
/// after a rollback.
#[derive(Debug, Default)]
pub struct Catalogue {
    events: BTreeMap<(String, String), Event>,
    agencies: BTreeMap<String, Agency>,
    origins: HashMap<OriginKey, Arc<Origin>>,
    measure_keys: HashSet<MeasureKey>,
    measures: Vec<MagnitudeMeasure>,
    committed_measures: usize,
    pending: Vec<Pending>,
    next_id: u64,
}

impl Catalogue {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all measures in insertion order, pending batch included.
    pub fn measures(&self) -> &[MagnitudeMeasure] {
        &self.measures
    }

    /// Returns the number of stored measures.
    pub fn len(&self) -> usize {
        self.measures.len()
    }

    /// Returns `true` if no measure is stored.
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    /// Returns the number of stored events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns the number of stored origins.
    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }

    /// Returns the number of known agencies.
    pub fn agency_count(&self) -> usize {
        self.agencies.len()
    }

    /// Looks up an event by catalogue and source key.
    pub fn event(&self, catalogue: &str, source_key: &str) -> Option<&Event> {
        self.events.get(&(catalogue.to_string(), source_key.to_string()))
    }

    /// Returns the measures matching `filter`.
    pub fn query(&self, filter: &Filter) -> MeasureCollection {
        MeasureCollection::new(
            self.measures
                .iter()
                .filter(|m| filter.matches(m))
                .cloned()
                .collect(),
        )
    }

    /// Returns the measures reported for one event, in insertion order.
    pub fn measures_of_event(&self, event_key: &str) -> Vec<&MagnitudeMeasure> {
        self.measures
            .iter()
            .filter(|m| m.event_key() == event_key)
            .collect()
    }

    /// Returns every measure as a collection.
    pub fn all(&self) -> MeasureCollection {
        self.query(&Filter::All)
    }

    fn record(&mut self, row: Pending) {
        self.pending.push(row);
    }
}

impl MeasureStore for Catalogue {
    fn get_or_create_event(
        &mut self,
        catalogue: &str,
        source_key: &str,
        name: &str,
    ) -> (Event, bool) {
        let key = (catalogue.to_string(), source_key.to_string());
        if let Some(event) = self.events.get(&key) {
            return (event.clone(), false);
        }
        let event = Event {
            source_key: source_key.to_string(),
            name: name.to_string(),
            catalogue: catalogue.to_string(),
        };
        self.events.insert(key.clone(), event.clone());
        self.record(Pending::Event(key));
        (event, true)
    }

    fn get_or_create_agency(&mut self, name: &str) -> (Agency, bool) {
        if let Some(agency) = self.agencies.get(name) {
            return (agency.clone(), false);
        }
        let agency = Agency {
            name: name.to_string(),
        };
        self.agencies.insert(name.to_string(), agency.clone());
        self.record(Pending::Agency(name.to_string()));
        (agency, true)
    }

    fn insert_origin(&mut self, origin: Origin) -> Result<Arc<Origin>, CatalogueError> {
        let key = (origin.event_key.clone(), origin.source_key.clone());
        if self.origins.contains_key(&key) {
            return Err(CatalogueError::DuplicateKey {
                kind: "origin",
                key: format!("{}/{}", key.0, key.1),
            });
        }
        let origin = Arc::new(origin);
        self.origins.insert(key.clone(), Arc::clone(&origin));
        self.record(Pending::Origin(key));
        Ok(origin)
    }

    fn insert_measure(&mut self, draft: MeasureDraft) -> Result<MagnitudeMeasure, CatalogueError> {
        let origin_key = (draft.event_key.clone(), draft.origin.source_key.clone());
        if !self.origins.contains_key(&origin_key) {
            return Err(CatalogueError::UnknownOrigin {
                event: origin_key.0,
                origin: origin_key.1,
            });
        }
        let key = (
            origin_key.0,
            origin_key.1,
            draft.agency.clone(),
            draft.scale.clone(),
        );
        if self.measure_keys.contains(&key) {
            return Err(CatalogueError::DuplicateKey {
                kind: "measure",
                key: format!("{}/{}/{}/{}", key.0, key.1, key.2, key.3),
            });
        }
        self.next_id += 1;
        let measure = draft.into_measure(MeasureId(self.next_id));
        self.measures.push(measure.clone());
        self.measure_keys.insert(key.clone());
        self.record(Pending::Measure(key));
        Ok(measure)
    }

    fn commit(&mut self) {
        debug!(rows = self.pending.len(), "committing pending batch");
        self.pending.clear();
        self.committed_measures = self.measures.len();
    }

    fn rollback(&mut self) {
        debug!(rows = self.pending.len(), "rolling back pending batch");
        for row in self.pending.drain(..).rev() {
            match row {
                Pending::Event(key) => {
                    self.events.remove(&key);
                }
                Pending::Agency(name) => {
                    self.agencies.remove(&name);
                }
                Pending::Origin(key) => {
                    self.origins.remove(&key);
                }
                Pending::Measure(key) => {
                    self.measure_keys.remove(&key);
                }
            }
        }
        self.measures.truncate(self.committed_measures);
    }
}

impl EventSiblings for Catalogue {
    fn siblings(&self, event_key: &str) -> Vec<&MagnitudeMeasure> {
        self.measures_of_event(event_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn origin(event: &str, key: &str) -> Origin {
        let time = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap();
        Origin::new(key, event, time, 10.0, 20.0, "ISC")
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut c = Catalogue::new();
        let (_, created) = c.get_or_create_event("ISC", "1", "Fiji");
        assert!(created);
        let (event, created) = c.get_or_create_event("ISC", "1", "ignored");
        assert!(!created);
        assert_eq!(event.name, "Fiji");
        assert!(c.get_or_create_agency("NEIC").1);
        assert!(!c.get_or_create_agency("NEIC").1);
    }

    #[test]
    fn duplicate_origin_is_rejected() {
        let mut c = Catalogue::new();
        c.insert_origin(origin("1", "o1")).unwrap();
        let err = c.insert_origin(origin("1", "o1")).unwrap_err();
        assert!(matches!(err, CatalogueError::DuplicateKey { kind: "origin", .. }));
        // same origin key under another event is fine
        assert!(c.insert_origin(origin("2", "o1")).is_ok());
    }

    #[test]
    fn duplicate_measure_is_rejected() {
        let mut c = Catalogue::new();
        let o = c.insert_origin(origin("1", "o1")).unwrap();
        c.insert_measure(MeasureDraft::new("NEIC", Arc::clone(&o), "mb", 5.0))
            .unwrap();
        let err = c
            .insert_measure(MeasureDraft::new("NEIC", Arc::clone(&o), "mb", 5.2))
            .unwrap_err();
        assert!(matches!(err, CatalogueError::DuplicateKey { kind: "measure", .. }));
        assert!(c.insert_measure(MeasureDraft::new("NEIC", o, "MS", 5.2)).is_ok());
    }

    #[test]
    fn measure_requires_known_origin() {
        let mut c = Catalogue::new();
        let stray = Arc::new(origin("1", "o1"));
        let err = c
            .insert_measure(MeasureDraft::new("NEIC", stray, "mb", 5.0))
            .unwrap_err();
        assert!(matches!(err, CatalogueError::UnknownOrigin { .. }));
    }

    #[test]
    fn rollback_discards_only_pending_batch() {
        let mut c = Catalogue::new();
        c.get_or_create_event("ISC", "1", "a");
        let o = c.insert_origin(origin("1", "o1")).unwrap();
        c.insert_measure(MeasureDraft::new("NEIC", o, "mb", 5.0)).unwrap();
        c.commit();

        c.get_or_create_event("ISC", "2", "b");
        c.get_or_create_agency("GCMT");
        let o2 = c.insert_origin(origin("2", "o2")).unwrap();
        c.insert_measure(MeasureDraft::new("GCMT", o2, "Mw", 5.5)).unwrap();
        c.rollback();

        assert_eq!(c.len(), 1);
        assert_eq!(c.event_count(), 1);
        assert_eq!(c.origin_count(), 1);
        assert_eq!(c.agency_count(), 0);
        // rolled back keys can be inserted again
        let o2 = c.insert_origin(origin("2", "o2")).unwrap();
        let m = c
            .insert_measure(MeasureDraft::new("GCMT", o2, "Mw", 5.5))
            .unwrap();
        assert_eq!(m.id(), MeasureId(3));
    }

    #[test]
    fn siblings_span_origins_of_an_event() {
        let mut c = Catalogue::new();
        let a = c.insert_origin(origin("1", "a")).unwrap();
        let b = c.insert_origin(origin("1", "b")).unwrap();
        let other = c.insert_origin(origin("2", "a")).unwrap();
        c.insert_measure(MeasureDraft::new("X", a, "mb", 5.0)).unwrap();
        c.insert_measure(MeasureDraft::new("Y", b, "mb", 5.1)).unwrap();
        c.insert_measure(MeasureDraft::new("X", other, "mb", 4.0)).unwrap();
        assert_eq!(c.siblings("1").len(), 2);
        assert_eq!(c.siblings("3").len(), 0);
    }
}
