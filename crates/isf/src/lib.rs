//! # emsr-isf
//!
//! Streaming importer for bulletins in the IASPEI Seismic Format (ISF).
//!
//! ## Parser
//!
//! Every line is first classified structurally into a [`LineType`] (fixed
//! header text, fixed line length, or a regular expression). The pair
//! (current [`ParserState`], line type) then selects the next state from
//! an explicit transition table:
//!
//! ```text
//! Start ──catalogue_header──▶ Start
//! Start ──event_header──────▶ EventHeader        (after a catalogue header)
//! EventHeader ──origin_header──▶ OriginHeader ──origin_block──▶ OriginBlock
//! OriginBlock ──origin_block──▶ OriginBlock
//! OriginBlock ──measure_header──▶ MeasureHeader
//! OriginBlock ──event_header──▶ EventHeader
//! MeasureHeader ──measure_block / measure_unknown_scale_block──▶ MeasureBlock / MeasureUnknownScaleBlock
//! MeasureBlock ──measure_block / measure_unknown_scale_block / event_header──▶ …
//! ```
//!
//! A rejected line is recorded with its line number and the parser falls
//! back to `Start`, so one malformed event does not abort the bulletin.
//! Duplicate keys abort the import after rolling back the pending batch.
//!
//! ## Quick start
//!
//! ```
//! use emsr_catalogue::Catalogue;
//! use emsr_isf::{ImportConfig, import_events};
//!
//! let bulletin = "DATA_TYPE BULLETIN IMS1.0:short\nEvent 1 Fiji Islands region\n";
//! let mut catalogue = Catalogue::new();
//! let report = import_events(bulletin.as_bytes(), &mut catalogue, &ImportConfig::default()).unwrap();
//! assert_eq!(report.created(emsr_isf::EntityKind::Event), 1);
//! ```

mod config;
mod error;
mod fields;
mod import;
mod line;
mod report;
mod state;

pub use config::{ImportConfig, JunkPolicy};
pub use error::IsfError;
pub use fields::{MeasureRecord, UNKNOWN_SCALE, parse_measure_block, parse_origin_block};
pub use import::import_events;
pub use line::{LineType, classify};
pub use report::{EntityKind, ImportReport};
pub use state::ParserState;
