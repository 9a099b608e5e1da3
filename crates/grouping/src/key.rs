//! Group identifiers.

use std::collections::BTreeMap;
use std::fmt;

use emsr_catalogue::MagnitudeMeasure;

/// Identifier of one group of measures.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// All measures of one event, keyed by its source key.
    Event(String),
    /// A cluster label; labels start at 0.
    Cluster(usize),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Event(key) => write!(f, "event {key}"),
            GroupKey::Cluster(label) => write!(f, "cluster {label}"),
        }
    }
}

/// Measures partitioned by group, in key order.
pub type Groups = BTreeMap<GroupKey, Vec<MagnitudeMeasure>>;

/// Collects measures into groups given one label per measure.
pub(crate) fn from_labels(measures: &[&MagnitudeMeasure], labels: &[usize]) -> Groups {
    let mut groups = Groups::new();
    for (measure, &label) in measures.iter().zip(labels) {
        groups
            .entry(GroupKey::Cluster(label))
            .or_default()
            .push((*measure).clone());
    }
    groups
}
