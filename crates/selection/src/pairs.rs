//! Index-aligned native/target pairs.

use emsr_catalogue::MagnitudeMeasure;
use emsr_grouping::GroupKey;

/// One selected (native, target) pair per qualifying group.
///
/// The i-th native and i-th target measure always come from the group
/// `groups[i]`. Every measure carries a standard error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedPairs {
    native: Vec<MagnitudeMeasure>,
    target: Vec<MagnitudeMeasure>,
    groups: Vec<GroupKey>,
}

impl MatchedPairs {
    pub(crate) fn push(&mut self, group: GroupKey, native: MagnitudeMeasure, target: MagnitudeMeasure) {
        self.groups.push(group);
        self.native.push(native);
        self.target.push(target);
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no group qualified.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Native-scale measures.
    pub fn native(&self) -> &[MagnitudeMeasure] {
        &self.native
    }

    /// Target-scale measures.
    pub fn target(&self) -> &[MagnitudeMeasure] {
        &self.target
    }

    /// Group of each pair.
    pub fn groups(&self) -> &[GroupKey] {
        &self.groups
    }

    pub fn native_values(&self) -> Vec<f64> {
        self.native.iter().map(MagnitudeMeasure::value).collect()
    }

    pub fn target_values(&self) -> Vec<f64> {
        self.target.iter().map(MagnitudeMeasure::value).collect()
    }

    pub fn native_errors(&self) -> Vec<f64> {
        errors(&self.native)
    }

    pub fn target_errors(&self) -> Vec<f64> {
        errors(&self.target)
    }

    /// Iterates over `(group, native, target)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &MagnitudeMeasure, &MagnitudeMeasure)> {
        self.groups
            .iter()
            .zip(&self.native)
            .zip(&self.target)
            .map(|((g, n), t)| (g, n, t))
    }
}

// selection only emits measures with a known error
fn errors(measures: &[MagnitudeMeasure]) -> Vec<f64> {
    measures
        .iter()
        .map(|m| m.standard_error().unwrap_or(f64::NAN))
        .collect()
}
