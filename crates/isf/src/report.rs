//! Import summary.

use std::collections::BTreeMap;

use crate::error::IsfError;

/// Kind of entity created during an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Event,
    Agency,
    Origin,
    Measure,
}

/// Counts of created entities and the line errors met during an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    created: BTreeMap<EntityKind, usize>,
    errors: Vec<IsfError>,
    lines: usize,
}

impl ImportReport {
    /// Number of newly created entities of `kind`.
    ///
    /// Entities that already existed in the store are not counted.
    pub fn created(&self, kind: EntityKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    /// Line errors in the order they were met.
    pub fn errors(&self) -> &[IsfError] {
        &self.errors
    }

    /// Number of lines read, blank lines included.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub(crate) fn count(&mut self, kind: EntityKind, created: bool) {
        if created {
            *self.created.entry(kind).or_insert(0) += 1;
        }
    }

    pub(crate) fn push_error(&mut self, error: IsfError) {
        self.errors.push(error);
    }

    pub(crate) fn set_lines(&mut self, lines: usize) {
        self.lines = lines;
    }
}
