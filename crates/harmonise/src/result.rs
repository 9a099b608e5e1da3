//! Harmonisation results and their export.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use emsr_catalogue::{MagnitudeMeasure, MeasureId};
use serde::Serialize;

use crate::error::HarmoniseError;

const CSV_HEADER: &str = "event,agency,origin_time,latitude,longitude,depth,native_scale,native_value,native_error,scale,value,standard_error,formulas";

/// A measure and its conversion to the target scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedMeasure {
    pub original: MagnitudeMeasure,
    pub converted: MagnitudeMeasure,
    /// Names of the formulas applied, in order.
    pub formulas: Vec<String>,
}

/// Output format of [`HarmoniserResult::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Converted and unconverted measures of one harmonisation run.
///
/// The two sides partition the input: each appended measure lands on
/// exactly one side, and a measure is converted at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmoniserResult {
    converted: BTreeMap<MeasureId, ConvertedMeasure>,
    unconverted: Vec<MagnitudeMeasure>,
    unconverted_ids: BTreeSet<MeasureId>,
}

impl HarmoniserResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `measure`, converted if `conversion` holds the converted
    /// measure and the formula chain, unconverted otherwise.
    ///
    /// # Errors
    ///
    /// - [`HarmoniseError::AlreadyConverted`] if `measure` was already
    ///   recorded as converted and is converted again.
    /// - [`HarmoniseError::AlreadyRecorded`] if `measure` would end up on
    ///   both sides.
    pub fn append(
        &mut self,
        measure: MagnitudeMeasure,
        conversion: Option<(MagnitudeMeasure, Vec<String>)>,
    ) -> Result<(), HarmoniseError> {
        let id = measure.id();
        if self.unconverted_ids.contains(&id) {
            return Err(HarmoniseError::AlreadyRecorded {
                measure: id.0,
                side: "unconverted",
            });
        }
        let Some((converted, formulas)) = conversion else {
            if self.converted.contains_key(&id) {
                return Err(HarmoniseError::AlreadyRecorded {
                    measure: id.0,
                    side: "converted",
                });
            }
            self.unconverted_ids.insert(id);
            self.unconverted.push(measure);
            return Ok(());
        };
        if self.converted.contains_key(&id) {
            return Err(HarmoniseError::AlreadyConverted { measure: id.0 });
        }
        self.converted.insert(
            id,
            ConvertedMeasure {
                original: measure,
                converted,
                formulas,
            },
        );
        Ok(())
    }

    /// Converted measures, by store identity.
    pub fn converted(&self) -> impl Iterator<Item = &ConvertedMeasure> {
        self.converted.values()
    }

    /// Conversion of one measure, if it was converted.
    pub fn get(&self, id: MeasureId) -> Option<&ConvertedMeasure> {
        self.converted.get(&id)
    }

    pub fn unconverted(&self) -> &[MagnitudeMeasure] {
        &self.unconverted
    }

    pub fn converted_count(&self) -> usize {
        self.converted.len()
    }

    /// Total number of recorded measures.
    pub fn len(&self) -> usize {
        self.converted.len() + self.unconverted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the converted measures, sorted by origin time, to `writer`.
    pub fn export<W: Write>(&self, format: ExportFormat, mut writer: W) -> Result<(), HarmoniseError> {
        let records = self.records();
        match format {
            ExportFormat::Csv => {
                writeln!(writer, "{CSV_HEADER}")?;
                for r in &records {
                    writeln!(writer, "{}", r.csv_line())?;
                }
            }
            ExportFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &records).map_err(|e| {
                    HarmoniseError::Serialization {
                        reason: e.to_string(),
                    }
                })?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn records(&self) -> Vec<ExportRecord<'_>> {
        let mut sorted: Vec<&ConvertedMeasure> = self.converted.values().collect();
        sorted.sort_by_key(|c| c.original.origin().time);
        sorted.into_iter().map(ExportRecord::from).collect()
    }
}

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    event: &'a str,
    agency: &'a str,
    origin_time: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    depth: Option<f64>,
    native_scale: &'a str,
    native_value: f64,
    native_error: Option<f64>,
    scale: &'a str,
    value: f64,
    standard_error: Option<f64>,
    formulas: &'a [String],
}

impl<'a> From<&'a ConvertedMeasure> for ExportRecord<'a> {
    fn from(c: &'a ConvertedMeasure) -> Self {
        let origin = c.original.origin();
        Self {
            event: c.original.event_key(),
            agency: c.original.agency(),
            origin_time: origin.time,
            latitude: origin.latitude,
            longitude: origin.longitude,
            depth: origin.depth,
            native_scale: c.original.scale(),
            native_value: c.original.value(),
            native_error: c.original.standard_error(),
            scale: c.converted.scale(),
            value: c.converted.value(),
            standard_error: c.converted.standard_error(),
            formulas: &c.formulas,
        }
    }
}

impl ExportRecord<'_> {
    fn csv_line(&self) -> String {
        let optional = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        [
            csv_field(self.event),
            csv_field(self.agency),
            self.origin_time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.latitude.to_string(),
            self.longitude.to_string(),
            optional(self.depth),
            csv_field(self.native_scale),
            self.native_value.to_string(),
            optional(self.native_error),
            csv_field(self.scale),
            self.value.to_string(),
            optional(self.standard_error),
            csv_field(&self.formulas.join(";")),
        ]
        .join(",")
    }
}

/// Quotes a field containing a separator, quote or line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
