//! Choice of one native/target pair per group.

use emsr_catalogue::{EventSiblings, MagnitudeMeasure};
use emsr_grouping::Groups;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::SelectionError;
use crate::missing::MissingUncertainty;
use crate::pairs::MatchedPairs;
use crate::ranking::AgencyRanking;

/// How a pair is chosen among the candidates of one group.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionStrategy {
    /// Uniformly random native and target candidates, drawn independently.
    /// `None` seeds from the operating system.
    Random { seed: Option<u64> },
    /// The combination minimising `sqrt(native² + target²)` of the
    /// magnitude values.
    Precise,
    /// The best ranked agency on each side; ties go to the first candidate.
    AgencyRanking(AgencyRanking),
}

impl SelectionStrategy {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            SelectionStrategy::Random { .. } => "random",
            SelectionStrategy::Precise => "precise",
            SelectionStrategy::AgencyRanking(_) => "agency_ranking",
        }
    }

    /// Selects at most one `(native, target)` pair per group.
    ///
    /// Each measure first goes through `missing`; discarded measures are
    /// not candidates and backfilled errors only exist in the returned
    /// copies. A group contributes a pair only when it has at least one
    /// candidate on each scale. Groups are visited in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the scales are equal or `missing` is invalid.
    #[tracing::instrument(skip(self, groups, missing, siblings), fields(strategy = self.name()))]
    pub fn select(
        &self,
        groups: &Groups,
        native: &str,
        target: &str,
        missing: &MissingUncertainty,
        siblings: &dyn EventSiblings,
    ) -> Result<MatchedPairs, SelectionError> {
        if native == target {
            return Err(SelectionError::IdenticalScales {
                scale: native.to_string(),
            });
        }
        missing.validate()?;

        let mut rng = match self {
            SelectionStrategy::Random { seed: Some(s) } => Some(StdRng::seed_from_u64(*s)),
            SelectionStrategy::Random { seed: None } => Some(StdRng::from_os_rng()),
            _ => None,
        };

        let mut pairs = MatchedPairs::default();
        for (key, measures) in groups {
            let mut natives = Vec::new();
            let mut targets = Vec::new();
            for m in measures {
                let side = if m.scale() == native {
                    &mut natives
                } else if m.scale() == target {
                    &mut targets
                } else {
                    continue;
                };
                match missing.resolve(m, siblings) {
                    Some(resolved) => side.push(resolved),
                    None => debug!(measure = %m.id(), group = %key, "discarded, no uncertainty"),
                }
            }
            if natives.is_empty() || targets.is_empty() {
                continue;
            }

            let (n, t) = match (self, rng.as_mut()) {
                (SelectionStrategy::Random { .. }, Some(rng)) => (
                    rng.random_range(0..natives.len()),
                    rng.random_range(0..targets.len()),
                ),
                (SelectionStrategy::AgencyRanking(ranking), _) => {
                    (best_ranked(ranking, &natives), best_ranked(ranking, &targets))
                }
                _ => smallest_norm(&natives, &targets),
            };
            pairs.push(
                key.clone(),
                natives.swap_remove(n),
                targets.swap_remove(t),
            );
        }

        info!(
            groups = groups.len(),
            pairs = pairs.len(),
            native,
            target,
            "selected pairs"
        );
        Ok(pairs)
    }
}

fn smallest_norm(natives: &[MagnitudeMeasure], targets: &[MagnitudeMeasure]) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_norm = f64::INFINITY;
    for (i, n) in natives.iter().enumerate() {
        for (j, t) in targets.iter().enumerate() {
            let norm = n.value().hypot(t.value());
            if norm < best_norm {
                best_norm = norm;
                best = (i, j);
            }
        }
    }
    best
}

fn best_ranked(ranking: &AgencyRanking, candidates: &[MagnitudeMeasure]) -> usize {
    let mut best = 0;
    let mut best_score = i64::MIN;
    for (i, m) in candidates.iter().enumerate() {
        let score = ranking.score(m.scale(), m.agency());
        if score > best_score {
            best_score = score;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use emsr_catalogue::{MeasureCollection, MeasureDraft, MeasureId, Origin};
    use emsr_grouping::{GroupKey, GroupingStrategy};

    use super::*;

    fn measure(id: u64, event: &str, agency: &str, scale: &str, value: f64) -> MagnitudeMeasure {
        let time = Utc.with_ymd_and_hms(2004, 12, 26, 0, 58, 53).unwrap();
        let origin = Origin::new("o", event, time, 3.3, 95.9, "ISC");
        MeasureDraft::new(agency, Arc::new(origin), scale, value)
            .with_standard_error(0.1)
            .into_measure(MeasureId(id))
    }

    fn store() -> MeasureCollection {
        MeasureCollection::new(vec![
            measure(1, "a", "ISC", "mb", 5.0),
            measure(2, "a", "NEIC", "mb", 4.8),
            measure(3, "a", "GCMT", "Mw", 5.6),
            measure(4, "a", "NEIC", "Mw", 5.5),
            measure(5, "b", "ISC", "mb", 4.1),
            measure(6, "c", "GCMT", "Mw", 6.0),
            measure(7, "c", "ISC", "MS", 6.1),
        ])
    }

    fn select(strategy: &SelectionStrategy) -> MatchedPairs {
        let s = store();
        let groups = GroupingStrategy::ByEvent.group_measures(&s).unwrap();
        strategy
            .select(&groups, "mb", "Mw", &MissingUncertainty::Discard, &s)
            .unwrap()
    }

    #[test]
    fn only_groups_with_both_scales_qualify() {
        let pairs = select(&SelectionStrategy::Precise);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.groups(), [GroupKey::Event("a".into())]);
    }

    #[test]
    fn precise_minimises_value_norm() {
        let pairs = select(&SelectionStrategy::Precise);
        assert_eq!(pairs.native()[0].id(), MeasureId(2));
        assert_eq!(pairs.target()[0].id(), MeasureId(4));
    }

    #[test]
    fn agency_ranking_prefers_listed_agencies() {
        let ranking =
            AgencyRanking::new([("mb", vec!["ISC", "NEIC"]), ("Mw", vec!["GCMT"])]).unwrap();
        let pairs = select(&SelectionStrategy::AgencyRanking(ranking));
        assert_eq!(pairs.native()[0].agency(), "ISC");
        assert_eq!(pairs.target()[0].agency(), "GCMT");
    }

    #[test]
    fn agency_ranking_ties_go_to_first_candidate() {
        let ranking = AgencyRanking::new([("Ms", vec!["X"])]).unwrap();
        let pairs = select(&SelectionStrategy::AgencyRanking(ranking));
        assert_eq!(pairs.native()[0].id(), MeasureId(1));
        assert_eq!(pairs.target()[0].id(), MeasureId(3));
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let a = select(&SelectionStrategy::Random { seed: Some(7) });
        let b = select(&SelectionStrategy::Random { seed: Some(7) });
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn identical_scales_are_rejected() {
        let s = store();
        let groups = GroupingStrategy::ByEvent.group_measures(&s).unwrap();
        let err = SelectionStrategy::Precise
            .select(&groups, "Mw", "Mw", &MissingUncertainty::Discard, &s)
            .unwrap_err();
        assert!(matches!(err, SelectionError::IdenticalScales { .. }));
    }
}
