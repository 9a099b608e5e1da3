//! Materialised query results.

use std::collections::HashSet;
use std::ops::Index;

use crate::filter::Filter;
use crate::model::{MagnitudeMeasure, MeasureId};
use crate::store::EventSiblings;

/// An ordered, filterable view over magnitude measures.
#[derive(Debug, Clone, Default)]
pub struct MeasureCollection {
    measures: Vec<MagnitudeMeasure>,
    ids: HashSet<MeasureId>,
}

impl MeasureCollection {
    /// Wraps measures in a collection, keeping their order.
    pub fn new(measures: Vec<MagnitudeMeasure>) -> Self {
        let ids = measures.iter().map(MagnitudeMeasure::id).collect();
        Self { measures, ids }
    }

    /// Returns the number of measures.
    pub fn len(&self) -> usize {
        self.measures.len()
    }

    /// Returns `true` if the collection holds no measure.
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    /// Returns the measure at `index`.
    pub fn get(&self, index: usize) -> Option<&MagnitudeMeasure> {
        self.measures.get(index)
    }

    /// Returns `true` if a measure with the same identity is in the collection.
    pub fn contains(&self, measure: &MagnitudeMeasure) -> bool {
        self.ids.contains(&measure.id())
    }

    /// Iterates over the measures in order.
    pub fn iter(&self) -> std::slice::Iter<'_, MagnitudeMeasure> {
        self.measures.iter()
    }

    /// Returns the measures as a slice.
    pub fn as_slice(&self) -> &[MagnitudeMeasure] {
        &self.measures
    }

    /// Narrows the collection to the measures matching `filter`.
    pub fn filter(&self, filter: &Filter) -> Self {
        Self::new(
            self.measures
                .iter()
                .filter(|m| filter.matches(m))
                .cloned()
                .collect(),
        )
    }

    /// Consumes the collection, returning the measures.
    pub fn into_vec(self) -> Vec<MagnitudeMeasure> {
        self.measures
    }
}

impl Index<usize> for MeasureCollection {
    type Output = MagnitudeMeasure;

    fn index(&self, index: usize) -> &Self::Output {
        &self.measures[index]
    }
}

impl<'a> IntoIterator for &'a MeasureCollection {
    type Item = &'a MagnitudeMeasure;
    type IntoIter = std::slice::Iter<'a, MagnitudeMeasure>;

    fn into_iter(self) -> Self::IntoIter {
        self.measures.iter()
    }
}

impl FromIterator<MagnitudeMeasure> for MeasureCollection {
    fn from_iter<T: IntoIterator<Item = MagnitudeMeasure>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl EventSiblings for MeasureCollection {
    fn siblings(&self, event_key: &str) -> Vec<&MagnitudeMeasure> {
        self.measures
            .iter()
            .filter(|m| m.event_key() == event_key)
            .collect()
    }
}
