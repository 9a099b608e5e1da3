//! Window-based clustering of near-coincident reports.

use std::collections::VecDeque;

use emsr_catalogue::MagnitudeMeasure;
use emsr_catalogue::geo::haversine_km;

use crate::error::GroupingError;
use crate::key::{Groups, from_labels};

/// Time, distance and magnitude windows linking two measures.
///
/// Two measures are neighbours when their origins are at most
/// `time_window` seconds and `space_window` km apart and, if a magnitude
/// window is set, their values differ by at most that much. Groups are
/// the connected components of the neighbour graph, so two measures far
/// apart can share a group through an intermediate one.
///
/// # Example
///
/// ```
/// use emsr_grouping::SequentialWindows;
///
/// let windows = SequentialWindows::new(16.0, 100.0).with_magnitude_window(1.0);
/// assert!(windows.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialWindows {
    /// Seconds.
    time_window: f64,
    /// Kilometres.
    space_window: f64,
    magnitude_window: Option<f64>,
}

impl SequentialWindows {
    /// Creates windows without a magnitude constraint.
    pub fn new(time_window: f64, space_window: f64) -> Self {
        Self {
            time_window,
            space_window,
            magnitude_window: None,
        }
    }

    /// Adds a magnitude window.
    pub fn with_magnitude_window(mut self, magnitude_window: f64) -> Self {
        self.magnitude_window = Some(magnitude_window);
        self
    }

    /// Returns the time window in seconds.
    pub fn time_window(&self) -> f64 {
        self.time_window
    }

    /// Returns the space window in km.
    pub fn space_window(&self) -> f64 {
        self.space_window
    }

    /// Returns the magnitude window, if any.
    pub fn magnitude_window(&self) -> Option<f64> {
        self.magnitude_window
    }

    /// Validates this configuration.
    ///
    /// Every window must be finite and non-negative.
    pub fn validate(&self) -> Result<(), GroupingError> {
        let windows = [
            ("time", Some(self.time_window)),
            ("space", Some(self.space_window)),
            ("magnitude", self.magnitude_window),
        ];
        for (window, value) in windows {
            if let Some(value) = value.filter(|v| !v.is_finite() || *v < 0.0) {
                return Err(GroupingError::InvalidWindow { window, value });
            }
        }
        Ok(())
    }

    /// Returns `true` if `a` and `b` fall within every window of each other.
    pub fn linked(&self, a: &MagnitudeMeasure, b: &MagnitudeMeasure) -> bool {
        let (oa, ob) = (a.origin(), b.origin());
        if (oa.timestamp() - ob.timestamp()).abs() > self.time_window {
            return false;
        }
        if self
            .magnitude_window
            .is_some_and(|window| (a.value() - b.value()).abs() > window)
        {
            return false;
        }
        haversine_km(oa.longitude, oa.latitude, ob.longitude, ob.latitude) <= self.space_window
    }

    /// Assigns a component label to every measure.
    ///
    /// Labels are numbered by the earliest origin time in each component.
    pub fn labels(&self, measures: &[&MagnitudeMeasure]) -> Vec<usize> {
        let n = measures.len();
        let times: Vec<f64> = measures.iter().map(|m| m.origin().timestamp()).collect();
        let mut by_time: Vec<usize> = (0..n).collect();
        by_time.sort_by(|&a, &b| times[a].total_cmp(&times[b]));

        // sweep in time order: only pairs inside the time window can link
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (pos, &i) in by_time.iter().enumerate() {
            for &j in &by_time[pos + 1..] {
                if times[j] - times[i] > self.time_window {
                    break;
                }
                if self.linked(measures[i], measures[j]) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }

        let mut labels = vec![usize::MAX; n];
        let mut label = 0;
        for &start in &by_time {
            if labels[start] != usize::MAX {
                continue;
            }
            let mut queue = VecDeque::from([start]);
            labels[start] = label;
            while let Some(node) = queue.pop_front() {
                for &neighbour in &adjacency[node] {
                    if labels[neighbour] == usize::MAX {
                        labels[neighbour] = label;
                        queue.push_back(neighbour);
                    }
                }
            }
            label += 1;
        }
        labels
    }

    pub(crate) fn group(&self, measures: &[&MagnitudeMeasure]) -> Groups {
        let labels = self.labels(measures);
        from_labels(measures, &labels)
    }
}
