//! Fixed-column field extraction for origin and magnitude rows.
//!
//! Column ranges are 0-based, end-exclusive character positions. Blank
//! numeric fields decode to `None`.

use std::ops::Range;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use emsr_catalogue::{AnalysisType, LocationMethod, Origin};

use crate::error::IsfError;
use crate::line::{MEASURE_UNKNOWN_SCALE, char_columns};

/// Scale label given to magnitudes whose scale column is blank.
pub const UNKNOWN_SCALE: &str = "unknown";

const DATE: Range<usize> = 0..10;
const TIME: Range<usize> = 11..22;
const TIME_ERROR: Range<usize> = 24..29;
const TIME_RMS: Range<usize> = 30..35;
const LATITUDE: Range<usize> = 36..44;
const LONGITUDE: Range<usize> = 45..54;
const SEMI_MAJOR: Range<usize> = 56..61;
const SEMI_MINOR: Range<usize> = 62..67;
const ERROR_AZIMUTH: Range<usize> = 68..71;
const DEPTH: Range<usize> = 71..76;
const DEPTH_ERROR: Range<usize> = 78..82;
const PHASES: Range<usize> = 83..87;
const STATIONS: Range<usize> = 88..92;
const GAP: Range<usize> = 93..96;
const MIN_DISTANCE: Range<usize> = 97..103;
const MAX_DISTANCE: Range<usize> = 104..110;
const ANALYSIS_TYPE: usize = 111;
const LOCATION_METHOD: usize = 113;
const EVENT_TYPE: Range<usize> = 115..117;
const ORIGIN_AUTHOR: Range<usize> = 118..127;
const ORIGIN_ID: Range<usize> = 128..136;

const MAG_SCALE: Range<usize> = 0..5;
const MAG_VALUE: Range<usize> = 6..10;
const MAG_ERROR: Range<usize> = 11..14;
const MAG_STATIONS: Range<usize> = 15..19;
const MAG_AUTHOR: Range<usize> = 20..29;
const MAG_ORIGIN_ID: Range<usize> = 30..38;

/// A decoded magnitude row, not yet linked to its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRecord {
    pub scale: String,
    pub value: f64,
    pub standard_error: Option<f64>,
    pub stations: Option<u32>,
    pub author: String,
    pub origin_key: String,
}

fn column(line: &str, range: Range<usize>) -> &str {
    char_columns(line, range).unwrap_or("").trim()
}

fn flag(line: &str, at: usize) -> Option<char> {
    line.chars().nth(at).filter(|c| !c.is_whitespace())
}

fn optional<T: FromStr>(
    line: &str,
    range: Range<usize>,
    field: &'static str,
    line_no: usize,
) -> Result<Option<T>, IsfError> {
    let raw = column(line, range);
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| IsfError::InvalidField {
        line: line_no,
        field,
        value: raw.to_string(),
    })
}

fn required<T: FromStr>(
    line: &str,
    range: Range<usize>,
    field: &'static str,
    line_no: usize,
) -> Result<T, IsfError> {
    optional(line, range.clone(), field, line_no)?.ok_or_else(|| IsfError::InvalidField {
        line: line_no,
        field,
        value: column(line, range).to_string(),
    })
}

fn origin_time(line: &str, line_no: usize) -> Result<NaiveDateTime, IsfError> {
    let date_raw = column(line, DATE);
    let date = NaiveDate::parse_from_str(date_raw, "%Y/%m/%d").map_err(|_| {
        IsfError::InvalidField {
            line: line_no,
            field: "date",
            value: date_raw.to_string(),
        }
    })?;
    let time_raw = column(line, TIME);
    let time = NaiveTime::parse_from_str(time_raw, "%H:%M:%S%.f").map_err(|_| {
        IsfError::InvalidField {
            line: line_no,
            field: "time",
            value: time_raw.to_string(),
        }
    })?;
    Ok(date.and_time(time))
}

/// Decodes a 136-character origin row belonging to `event_key`.
///
/// # Errors
///
/// [`IsfError::InvalidField`] if the date, time or position cannot be
/// decoded, or a non-blank numeric field is not a number.
pub fn parse_origin_block(line: &str, event_key: &str, line_no: usize) -> Result<Origin, IsfError> {
    let time = origin_time(line, line_no)?.and_utc();
    let latitude: f64 = required(line, LATITUDE, "latitude", line_no)?;
    let longitude: f64 = required(line, LONGITUDE, "longitude", line_no)?;
    let source_key = column(line, ORIGIN_ID);
    if source_key.is_empty() {
        return Err(IsfError::InvalidField {
            line: line_no,
            field: "origin id",
            value: String::new(),
        });
    }

    let mut origin = Origin::new(
        source_key,
        event_key,
        time,
        latitude,
        longitude,
        column(line, ORIGIN_AUTHOR),
    );
    origin.time_error = optional(line, TIME_ERROR, "time error", line_no)?;
    origin.time_rms = optional(line, TIME_RMS, "time rms", line_no)?;
    origin.semi_major_90 = optional(line, SEMI_MAJOR, "semi-major axis", line_no)?;
    origin.semi_minor_90 = optional(line, SEMI_MINOR, "semi-minor axis", line_no)?;
    origin.error_azimuth = optional(line, ERROR_AZIMUTH, "error azimuth", line_no)?;
    origin.depth = optional(line, DEPTH, "depth", line_no)?;
    origin.depth_error = optional(line, DEPTH_ERROR, "depth error", line_no)?;
    origin.phases = optional(line, PHASES, "defining phases", line_no)?;
    origin.stations = optional(line, STATIONS, "defining stations", line_no)?;
    origin.azimuth_gap = optional(line, GAP, "azimuthal gap", line_no)?;
    origin.min_distance = optional(line, MIN_DISTANCE, "min distance", line_no)?;
    origin.max_distance = optional(line, MAX_DISTANCE, "max distance", line_no)?;
    origin.analysis_type = flag(line, ANALYSIS_TYPE).and_then(AnalysisType::from_code);
    origin.location_method = flag(line, LOCATION_METHOD).and_then(LocationMethod::from_code);
    let event_type = column(line, EVENT_TYPE);
    origin.event_type = (!event_type.is_empty()).then(|| event_type.to_string());
    Ok(origin)
}

/// Decodes a magnitude row.
///
/// Rows with a blank scale column are decoded leniently (whitespace
/// separated) and get the [`UNKNOWN_SCALE`] label.
///
/// # Errors
///
/// [`IsfError::InvalidField`] if the value is missing or a numeric field
/// cannot be decoded.
pub fn parse_measure_block(line: &str, line_no: usize) -> Result<MeasureRecord, IsfError> {
    let scale = column(line, MAG_SCALE);
    if scale.is_empty() {
        return parse_unknown_scale(line, line_no);
    }
    let author = column(line, MAG_AUTHOR);
    let origin_key = column(line, MAG_ORIGIN_ID);
    if origin_key.is_empty() {
        return Err(IsfError::InvalidField {
            line: line_no,
            field: "origin id",
            value: String::new(),
        });
    }
    Ok(MeasureRecord {
        scale: scale.to_string(),
        value: required(line, MAG_VALUE, "magnitude", line_no)?,
        standard_error: optional(line, MAG_ERROR, "magnitude error", line_no)?,
        stations: optional(line, MAG_STATIONS, "magnitude stations", line_no)?,
        author: author.to_string(),
        origin_key: origin_key.to_string(),
    })
}

fn parse_unknown_scale(line: &str, line_no: usize) -> Result<MeasureRecord, IsfError> {
    let caps = MEASURE_UNKNOWN_SCALE
        .captures(line)
        .ok_or_else(|| IsfError::InvalidField {
            line: line_no,
            field: "magnitude",
            value: line.trim().to_string(),
        })?;
    let number = |name: &'static str, field: &'static str| -> Result<Option<f64>, IsfError> {
        caps.name(name)
            .map(|m| {
                m.as_str().parse().map_err(|_| IsfError::InvalidField {
                    line: line_no,
                    field,
                    value: m.as_str().to_string(),
                })
            })
            .transpose()
    };
    let value = number("value", "magnitude")?.ok_or_else(|| IsfError::InvalidField {
        line: line_no,
        field: "magnitude",
        value: String::new(),
    })?;
    let stations = caps
        .name("stations")
        .map(|m| {
            m.as_str().parse().map_err(|_| IsfError::InvalidField {
                line: line_no,
                field: "magnitude stations",
                value: m.as_str().to_string(),
            })
        })
        .transpose()?;
    Ok(MeasureRecord {
        scale: UNKNOWN_SCALE.to_string(),
        value,
        standard_error: number("error", "magnitude error")?,
        stations,
        author: caps["author"].to_string(),
        origin_key: caps["origin"].to_string(),
    })
}
