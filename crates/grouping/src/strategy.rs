//! Grouping strategy selection.

use std::collections::BTreeMap;

use emsr_catalogue::MagnitudeMeasure;
use tracing::info;

use crate::cluster::TimeClustering;
use crate::error::GroupingError;
use crate::key::{GroupKey, Groups};
use crate::sequential::SequentialWindows;

/// How measures are partitioned before pair selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GroupingStrategy {
    /// One group per event source key.
    #[default]
    ByEvent,
    /// Single-linkage clustering on a scalar feature.
    TimeClustering(TimeClustering),
    /// Connected components of the time/space/magnitude window graph.
    Sequential(SequentialWindows),
}

impl GroupingStrategy {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            GroupingStrategy::ByEvent => "event",
            GroupingStrategy::TimeClustering(_) => "time_clustering",
            GroupingStrategy::Sequential(_) => "sequential",
        }
    }

    /// Validates the strategy parameters.
    pub fn validate(&self) -> Result<(), GroupingError> {
        match self {
            GroupingStrategy::ByEvent => Ok(()),
            GroupingStrategy::TimeClustering(c) => c.validate(),
            GroupingStrategy::Sequential(w) => w.validate(),
        }
    }

    /// Partitions `measures` into groups.
    ///
    /// Every input measure lands in exactly one group; within a group the
    /// input order is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the strategy parameters are invalid.
    #[tracing::instrument(skip_all, fields(strategy = self.name()))]
    pub fn group_measures<'a, I>(&self, measures: I) -> Result<Groups, GroupingError>
    where
        I: IntoIterator<Item = &'a MagnitudeMeasure>,
    {
        self.validate()?;
        let measures: Vec<&MagnitudeMeasure> = measures.into_iter().collect();
        let groups = match self {
            GroupingStrategy::ByEvent => by_event(&measures),
            GroupingStrategy::TimeClustering(c) => c.group(&measures),
            GroupingStrategy::Sequential(w) => w.group(&measures),
        };
        info!(measures = measures.len(), groups = groups.len(), "grouped");
        Ok(groups)
    }
}

fn by_event(measures: &[&MagnitudeMeasure]) -> Groups {
    let mut groups = BTreeMap::new();
    for m in measures {
        groups
            .entry(GroupKey::Event(m.event_key().to_string()))
            .or_insert_with(Vec::new)
            .push((*m).clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use emsr_catalogue::{MeasureDraft, MeasureId, Origin};

    use super::*;

    fn measure(id: u64, event: &str) -> MagnitudeMeasure {
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let origin = Origin::new("o", event, time, 0.0, 0.0, "ISC");
        MeasureDraft::new("ISC", Arc::new(origin), "mb", 4.0).into_measure(MeasureId(id))
    }

    #[test]
    fn by_event_keeps_input_order() {
        let ms = [measure(1, "b"), measure(2, "a"), measure(3, "b")];
        let groups = GroupingStrategy::ByEvent.group_measures(&ms).unwrap();
        assert_eq!(groups.len(), 2);
        let b: Vec<MeasureId> = groups[&GroupKey::Event("b".into())]
            .iter()
            .map(|m| m.id())
            .collect();
        assert_eq!(b, [MeasureId(1), MeasureId(3)]);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let s = GroupingStrategy::TimeClustering(TimeClustering::new().with_threshold(-1.0));
        assert!(matches!(
            s.group_measures(&[]),
            Err(GroupingError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn default_is_by_event() {
        assert_eq!(GroupingStrategy::default().name(), "event");
    }
}
