//! Composable measurement predicates.
//!
//! A [`Filter`] is a pure test over one [`MagnitudeMeasure`]. Leaf
//! variants test a single attribute; `And`, `Or` and `Not` compose them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo;
use crate::model::MagnitudeMeasure;

/// A predicate over magnitude measures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum Filter {
    /// Matches every measure.
    #[default]
    All,
    /// Origin time in `[start, end]`.
    TimeBetween {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Reporting agency in the set.
    Agencies(BTreeSet<String>),
    /// Magnitude scale in the set.
    Scales(BTreeSet<String>),
    /// Magnitude value `>=` the threshold.
    MagnitudeAtLeast(f64),
    /// Magnitude value `<=` the threshold.
    MagnitudeAtMost(f64),
    /// Epicentre inside a `[longitude, latitude]` ring.
    WithinPolygon(Vec<[f64; 2]>),
    /// Epicentre within `km` of a point.
    WithinRadius {
        longitude: f64,
        latitude: f64,
        km: f64,
    },
    /// A standard error is reported.
    HasUncertainty,
    /// Every inner filter matches. Empty matches everything.
    And(Vec<Filter>),
    /// At least one inner filter matches. Empty matches nothing.
    Or(Vec<Filter>),
    /// The inner filter does not match.
    Not(Box<Filter>),
}

impl Filter {
    /// Builds a [`Filter::Scales`] from any list of scale codes.
    pub fn scales<I, S>(scales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Scales(scales.into_iter().map(Into::into).collect())
    }

    /// Builds a [`Filter::Agencies`] from any list of agency names.
    pub fn agencies<I, S>(agencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Agencies(agencies.into_iter().map(Into::into).collect())
    }

    /// Conjunction with another filter, flattening nested `And`s.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut a), Filter::And(b)) => {
                a.extend(b);
                Filter::And(a)
            }
            (Filter::And(mut a), f) => {
                a.push(f);
                Filter::And(a)
            }
            (f, Filter::And(mut b)) => {
                b.insert(0, f);
                Filter::And(b)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }

    /// Disjunction with another filter, flattening nested `Or`s.
    pub fn or(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::Or(mut a), Filter::Or(b)) => {
                a.extend(b);
                Filter::Or(a)
            }
            (Filter::Or(mut a), f) => {
                a.push(f);
                Filter::Or(a)
            }
            (a, b) => Filter::Or(vec![a, b]),
        }
    }

    /// Negation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Filter::Not(inner) => *inner,
            f => Filter::Not(Box::new(f)),
        }
    }

    /// Tests one measure.
    pub fn matches(&self, measure: &MagnitudeMeasure) -> bool {
        let origin = measure.origin();
        match self {
            Filter::All => true,
            Filter::TimeBetween { start, end } => origin.time >= *start && origin.time <= *end,
            Filter::Agencies(set) => set.contains(measure.agency()),
            Filter::Scales(set) => set.contains(measure.scale()),
            Filter::MagnitudeAtLeast(v) => measure.value() >= *v,
            Filter::MagnitudeAtMost(v) => measure.value() <= *v,
            Filter::WithinPolygon(ring) => {
                geo::polygon_contains(ring, origin.longitude, origin.latitude)
            }
            Filter::WithinRadius {
                longitude,
                latitude,
                km,
            } => geo::haversine_km(*longitude, *latitude, origin.longitude, origin.latitude) <= *km,
            Filter::HasUncertainty => measure.standard_error().is_some(),
            Filter::And(inner) => inner.iter().all(|f| f.matches(measure)),
            Filter::Or(inner) => inner.iter().any(|f| f.matches(measure)),
            Filter::Not(inner) => !inner.matches(measure),
        }
    }
}
