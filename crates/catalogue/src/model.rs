//! Catalogue entities: agencies, events, origins and magnitude measures.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Store-assigned identity of a [`MagnitudeMeasure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MeasureId(pub u64);

impl fmt::Display for MeasureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Organisation that reported an origin or a magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Agency {
    pub name: String,
}

/// A seismic event as identified by its source catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Identifier of the event in the source catalogue.
    pub source_key: String,
    /// Free-text region name.
    pub name: String,
    /// Name of the catalogue the event was imported from.
    pub catalogue: String,
}

/// How an origin solution was reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisType {
    Automatic,
    Reviewed,
    Manual,
}

impl AnalysisType {
    /// Decodes the single-letter bulletin code (`a`, `r`, `m`).
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'a' => Some(Self::Automatic),
            'r' => Some(Self::Reviewed),
            'm' => Some(Self::Manual),
            _ => None,
        }
    }
}

/// How an origin was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationMethod {
    Inversion,
    Pattern,
    GroundTruth,
    Other,
}

impl LocationMethod {
    /// Decodes the single-letter bulletin code (`i`, `p`, `g`, `o`).
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'i' => Some(Self::Inversion),
            'p' => Some(Self::Pattern),
            'g' => Some(Self::GroundTruth),
            'o' => Some(Self::Other),
            _ => None,
        }
    }
}

/// A located solution for an event.
///
/// Every optional field is `None` when the bulletin leaves it blank; blank
/// never means zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Origin {
    /// Origin identifier, local to the bulletin.
    pub source_key: String,
    /// Source key of the owning event.
    pub event_key: String,
    pub time: DateTime<Utc>,
    /// Origin time error in seconds.
    pub time_error: Option<f64>,
    /// Root mean square of time residuals in seconds.
    pub time_rms: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    /// Semi-major axis of the 90% error ellipse in km.
    pub semi_major_90: Option<f64>,
    /// Semi-minor axis of the 90% error ellipse in km.
    pub semi_minor_90: Option<f64>,
    /// Strike of the error ellipse in degrees clockwise from north.
    pub error_azimuth: Option<f64>,
    /// Depth in km.
    pub depth: Option<f64>,
    pub depth_error: Option<f64>,
    /// Number of defining phases.
    pub phases: Option<u32>,
    /// Number of defining stations.
    pub stations: Option<u32>,
    /// Largest azimuthal gap in degrees.
    pub azimuth_gap: Option<f64>,
    /// Distance to the closest station in degrees.
    pub min_distance: Option<f64>,
    /// Distance to the furthest station in degrees.
    pub max_distance: Option<f64>,
    pub analysis_type: Option<AnalysisType>,
    pub location_method: Option<LocationMethod>,
    /// Two-letter bulletin event type code (e.g. `ke` for known earthquake).
    pub event_type: Option<String>,
    /// Agency that computed the origin.
    pub author: String,
}

impl Origin {
    /// Creates an origin with the mandatory fields; every optional field is unknown.
    pub fn new(
        source_key: impl Into<String>,
        event_key: impl Into<String>,
        time: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        author: impl Into<String>,
    ) -> Self {
        Self {
            source_key: source_key.into(),
            event_key: event_key.into(),
            time,
            time_error: None,
            time_rms: None,
            latitude,
            longitude,
            semi_major_90: None,
            semi_minor_90: None,
            error_azimuth: None,
            depth: None,
            depth_error: None,
            phases: None,
            stations: None,
            azimuth_gap: None,
            min_distance: None,
            max_distance: None,
            analysis_type: None,
            location_method: None,
            event_type: None,
            author: author.into(),
        }
    }

    /// Sets the depth in km.
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Origin time as fractional seconds since the Unix epoch.
    pub fn timestamp(&self) -> f64 {
        self.time.timestamp() as f64 + f64::from(self.time.timestamp_subsec_micros()) * 1e-6
    }
}

/// The fields of a measure before the store assigns it an identity.
#[derive(Debug, Clone)]
pub struct MeasureDraft {
    pub event_key: String,
    pub agency: String,
    pub origin: Arc<Origin>,
    pub scale: String,
    pub value: f64,
    pub standard_error: Option<f64>,
    pub stations: Option<u32>,
}

impl MeasureDraft {
    /// Creates a draft with no standard error and no station count.
    pub fn new(
        agency: impl Into<String>,
        origin: Arc<Origin>,
        scale: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            event_key: origin.event_key.clone(),
            agency: agency.into(),
            origin,
            scale: scale.into(),
            value,
            standard_error: None,
            stations: None,
        }
    }

    /// Sets the standard error.
    pub fn with_standard_error(mut self, standard_error: f64) -> Self {
        self.standard_error = Some(standard_error);
        self
    }

    /// Consumes the draft, assigning it an identity.
    ///
    /// Stores call this on insert; tests use it to build fixtures.
    pub fn into_measure(self, id: MeasureId) -> MagnitudeMeasure {
        MagnitudeMeasure {
            id,
            event_key: self.event_key,
            agency: self.agency,
            origin: self.origin,
            scale: self.scale,
            value: self.value,
            standard_error: self.standard_error,
            stations: self.stations,
        }
    }
}

/// A magnitude value on one scale, reported by one agency for one origin.
///
/// Immutable once created: the conversion and backfill helpers return
/// modified copies that keep the identity of the original.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeMeasure {
    id: MeasureId,
    event_key: String,
    agency: String,
    origin: Arc<Origin>,
    scale: String,
    value: f64,
    standard_error: Option<f64>,
    stations: Option<u32>,
}

impl MagnitudeMeasure {
    /// Returns the store identity.
    pub fn id(&self) -> MeasureId {
        self.id
    }

    /// Returns the source key of the owning event.
    pub fn event_key(&self) -> &str {
        &self.event_key
    }

    /// Returns the reporting agency.
    pub fn agency(&self) -> &str {
        &self.agency
    }

    /// Returns the origin the magnitude was computed for.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns the shared origin handle.
    pub fn origin_handle(&self) -> &Arc<Origin> {
        &self.origin
    }

    /// Returns the magnitude scale code (e.g. `mb`, `Mw`).
    pub fn scale(&self) -> &str {
        &self.scale
    }

    /// Returns the magnitude value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the standard error, if reported.
    pub fn standard_error(&self) -> Option<f64> {
        self.standard_error
    }

    /// Returns the number of stations used, if reported.
    pub fn stations(&self) -> Option<u32> {
        self.stations
    }

    /// Returns a copy whose missing standard error is replaced by `default`.
    ///
    /// A reported standard error is kept as is.
    pub fn with_default_error(&self, default: f64) -> Self {
        let mut copy = self.clone();
        copy.standard_error.get_or_insert(default);
        copy
    }

    /// Returns a copy expressed on another scale.
    pub fn converted(&self, scale: impl Into<String>, value: f64, standard_error: f64) -> Self {
        let mut copy = self.clone();
        copy.scale = scale.into();
        copy.value = value;
        copy.standard_error = Some(standard_error);
        copy
    }
}
