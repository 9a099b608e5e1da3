//! Single-linkage clustering on one scalar feature.

use emsr_catalogue::MagnitudeMeasure;

use crate::error::GroupingError;
use crate::key::{Groups, from_labels};

/// Scalar extracted from each measure before clustering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClusterFeature {
    /// Origin time in seconds since the Unix epoch.
    #[default]
    OriginTime,
    /// Origin depth in km.
    Depth,
    /// Magnitude value.
    Magnitude,
}

impl ClusterFeature {
    /// Returns the feature value, or `None` when it is unknown.
    pub fn extract(self, measure: &MagnitudeMeasure) -> Option<f64> {
        let value = match self {
            ClusterFeature::OriginTime => Some(measure.origin().timestamp()),
            ClusterFeature::Depth => measure.origin().depth,
            ClusterFeature::Magnitude => Some(measure.value()),
        };
        value.filter(|v| v.is_finite())
    }
}

/// Hierarchical clustering with a distance cut.
///
/// Two measures end up in one cluster when a chain of measures links them
/// with consecutive feature gaps no larger than the threshold (single
/// linkage, flat clusters at cophenetic distance `threshold`).
///
/// # Example
///
/// ```
/// use emsr_grouping::{ClusterFeature, TimeClustering};
///
/// let clustering = TimeClustering::new()
///     .with_feature(ClusterFeature::OriginTime)
///     .with_threshold(60.0);
/// assert!(clustering.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeClustering {
    feature: ClusterFeature,
    threshold: f64,
}

impl TimeClustering {
    /// Creates a clustering on origin time with threshold 200.
    pub fn new() -> Self {
        Self {
            feature: ClusterFeature::OriginTime,
            threshold: 200.0,
        }
    }

    /// Sets the clustered feature.
    pub fn with_feature(mut self, feature: ClusterFeature) -> Self {
        self.feature = feature;
        self
    }

    /// Sets the distance threshold, in feature units.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns the clustered feature.
    pub fn feature(&self) -> ClusterFeature {
        self.feature
    }

    /// Returns the distance threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), GroupingError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(GroupingError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        Ok(())
    }

    /// Assigns a cluster label to every measure.
    ///
    /// Labels are numbered in ascending feature order. Measures whose feature
    /// is unknown get singleton labels after all others, in input order.
    pub fn labels(&self, measures: &[&MagnitudeMeasure]) -> Vec<usize> {
        let features: Vec<Option<f64>> = measures.iter().map(|m| self.feature.extract(m)).collect();

        let mut known: Vec<(usize, f64)> = features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.map(|v| (i, v)))
            .collect();
        known.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut labels = vec![0; measures.len()];
        let mut label = 0;
        let mut previous: Option<f64> = None;
        for &(i, value) in &known {
            if previous.is_some_and(|prev| value - prev > self.threshold) {
                label += 1;
            }
            labels[i] = label;
            previous = Some(value);
        }

        let mut next = if known.is_empty() { 0 } else { label + 1 };
        for (i, feature) in features.iter().enumerate() {
            if feature.is_none() {
                labels[i] = next;
                next += 1;
            }
        }
        labels
    }

    pub(crate) fn group(&self, measures: &[&MagnitudeMeasure]) -> Groups {
        let labels = self.labels(measures);
        from_labels(measures, &labels)
    }
}

impl Default for TimeClustering {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use emsr_catalogue::{MeasureDraft, MeasureId, Origin};

    use super::*;

    fn at(id: u64, seconds: i64, depth: Option<f64>, value: f64) -> MagnitudeMeasure {
        let time = Utc.timestamp_opt(1_000_000 + seconds, 0).unwrap();
        let mut origin = Origin::new(id.to_string(), id.to_string(), time, 0.0, 0.0, "ISC");
        origin.depth = depth;
        MeasureDraft::new("ISC", Arc::new(origin), "mb", value).into_measure(MeasureId(id))
    }

    #[test]
    fn test_defaults() {
        let c = TimeClustering::default();
        assert_eq!(c.feature(), ClusterFeature::OriginTime);
        assert_eq!(c.threshold(), 200.0);
    }

    #[test]
    fn test_invalid_threshold() {
        for t in [-0.5, f64::INFINITY, f64::NAN] {
            assert!(TimeClustering::new().with_threshold(t).validate().is_err());
        }
        assert!(TimeClustering::new().with_threshold(0.0).validate().is_ok());
    }

    #[test]
    fn labels_follow_feature_order() {
        let ms = [at(1, 1000, None, 4.0), at(2, 0, None, 4.0), at(3, 150, None, 4.0)];
        let refs: Vec<&MagnitudeMeasure> = ms.iter().collect();
        assert_eq!(TimeClustering::new().labels(&refs), [1, 0, 0]);
    }

    #[test]
    fn chaining_links_distant_ends() {
        // 0 and 360 are 360 apart but linked through 180
        let ms = [at(1, 0, None, 4.0), at(2, 180, None, 4.0), at(3, 360, None, 4.0)];
        let refs: Vec<&MagnitudeMeasure> = ms.iter().collect();
        assert_eq!(TimeClustering::new().labels(&refs), [0, 0, 0]);
    }

    #[test]
    fn gap_equal_to_threshold_joins() {
        let ms = [at(1, 0, None, 4.0), at(2, 200, None, 4.0), at(3, 401, None, 4.0)];
        let refs: Vec<&MagnitudeMeasure> = ms.iter().collect();
        assert_eq!(TimeClustering::new().labels(&refs), [0, 0, 1]);
    }

    #[test]
    fn unknown_depth_is_singleton() {
        let ms = [
            at(1, 0, Some(10.0), 4.0),
            at(2, 0, None, 4.0),
            at(3, 0, Some(12.0), 4.0),
            at(4, 0, None, 4.0),
        ];
        let refs: Vec<&MagnitudeMeasure> = ms.iter().collect();
        let c = TimeClustering::new()
            .with_feature(ClusterFeature::Depth)
            .with_threshold(5.0);
        assert_eq!(c.labels(&refs), [0, 1, 0, 2]);
    }

    #[test]
    fn magnitude_feature() {
        let ms = [at(1, 0, None, 4.0), at(2, 0, None, 6.0), at(3, 0, None, 4.2)];
        let refs: Vec<&MagnitudeMeasure> = ms.iter().collect();
        let c = TimeClustering::new()
            .with_feature(ClusterFeature::Magnitude)
            .with_threshold(0.5);
        let groups = c.group(&refs);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(TimeClustering::new().labels(&[]).is_empty());
    }
}
