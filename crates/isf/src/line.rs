//! Structural line classification.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Length of an ISF origin line.
pub(crate) const ORIGIN_BLOCK_LEN: usize = 136;
/// Length of an ISF magnitude line.
pub(crate) const MEASURE_BLOCK_LEN: usize = 38;

static CATALOGUE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^DATA_TYPE\s+\S+").expect("valid regex"));
pub(crate) static EVENT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Event\s+(\S+)\s*(.*)$").expect("valid regex"));
static ORIGIN_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Date\s+Time\s+Err\s+RMS\s+Latitude\s+Longitude").expect("valid regex")
});
static MEASURE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Magnitude\s+Err\s+Nsta\s+Author\s+OrigID").expect("valid regex"));
pub(crate) static MEASURE_UNKNOWN_SCALE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s+(?P<ind>[<>])?(?P<value>-?\d+\.\d+)(?:\s+(?P<error>\d+\.\d+))?(?:\s+(?P<stations>\d+))?\s+(?P<author>\S+)\s+(?P<origin>\S+)\s*$",
    )
    .expect("valid regex")
});

/// Structural type of a bulletin line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    /// `DATA_TYPE BULLETIN ...`
    CatalogueHeader,
    /// `Event <key> <region name>`
    EventHeader,
    /// Column titles of the origin table.
    OriginHeader,
    /// One fixed-width origin row.
    OriginBlock,
    /// Column titles of the magnitude table.
    MeasureHeader,
    /// One fixed-width magnitude row with a scale.
    MeasureBlock,
    /// A magnitude row whose scale column is blank.
    MeasureUnknownScaleBlock,
    /// Parenthesised comment following an origin or magnitude.
    Comment,
    /// `STOP`
    Stop,
    /// Anything else.
    Junk,
}

impl LineType {
    /// Snake-case name used in log and error messages.
    pub fn name(self) -> &'static str {
        match self {
            LineType::CatalogueHeader => "catalogue_header",
            LineType::EventHeader => "event_header",
            LineType::OriginHeader => "origin_header",
            LineType::OriginBlock => "origin_block",
            LineType::MeasureHeader => "measure_header",
            LineType::MeasureBlock => "measure_block",
            LineType::MeasureUnknownScaleBlock => "measure_unknown_scale_block",
            LineType::Comment => "comment",
            LineType::Stop => "stop",
            LineType::Junk => "junk",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies one line, without its terminator.
///
/// Header texts and regular expressions are tried before line lengths, so
/// a 38-character event line is still an event header. Lengths count
/// characters, not bytes.
pub fn classify(line: &str) -> LineType {
    if CATALOGUE_HEADER.is_match(line) {
        LineType::CatalogueHeader
    } else if EVENT_HEADER.is_match(line) {
        LineType::EventHeader
    } else if ORIGIN_HEADER.is_match(line) {
        LineType::OriginHeader
    } else if MEASURE_HEADER.is_match(line) {
        LineType::MeasureHeader
    } else if line.trim() == "STOP" {
        LineType::Stop
    } else if line.starts_with(" (") {
        LineType::Comment
    } else if line.chars().count() == ORIGIN_BLOCK_LEN {
        LineType::OriginBlock
    } else if line.chars().count() == MEASURE_BLOCK_LEN && !scale_column(line).is_empty() {
        LineType::MeasureBlock
    } else if MEASURE_UNKNOWN_SCALE.is_match(line) {
        LineType::MeasureUnknownScaleBlock
    } else {
        LineType::Junk
    }
}

fn scale_column(line: &str) -> &str {
    char_columns(line, 0..5).unwrap_or("").trim()
}

/// Text of the character columns `range`, or `None` if the line is
/// shorter than `range.end` characters.
pub(crate) fn char_columns(line: &str, range: Range<usize>) -> Option<&str> {
    let mut bounds = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let start = bounds.nth(range.start)?;
    let end = match range.end.checked_sub(range.start + 1) {
        Some(n) => bounds.nth(n)?,
        None => start,
    };
    line.get(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers() {
        assert_eq!(
            classify("DATA_TYPE BULLETIN IMS1.0:short"),
            LineType::CatalogueHeader
        );
        assert_eq!(
            classify("Event 610326404 Near east coast of Honshu"),
            LineType::EventHeader
        );
        assert_eq!(classify("Event 42"), LineType::EventHeader);
        assert_eq!(
            classify(
                "   Date       Time        Err   RMS Latitude Longitude  Smaj  Smin  Az Depth   Err Ndef Nsta Gap  mdist  Mdist Qual   Author      OrigID"
            ),
            LineType::OriginHeader
        );
        assert_eq!(
            classify("Magnitude  Err Nsta Author      OrigID"),
            LineType::MeasureHeader
        );
        assert_eq!(classify("STOP"), LineType::Stop);
        assert_eq!(classify(" (#PRIME)"), LineType::Comment);
    }

    #[test]
    fn fixed_width_rows() {
        assert_eq!(classify(&" ".repeat(136)), LineType::OriginBlock);
        assert_eq!(
            classify("mb     4.7 0.1   45 ISC       01263580"),
            LineType::MeasureBlock
        );
    }

    #[test]
    fn blank_scale_is_unknown_scale() {
        assert_eq!(
            classify("       4.7 0.1   45 ISC       01263580"),
            LineType::MeasureUnknownScaleBlock
        );
        // trailing spaces trimmed by the producer
        assert_eq!(
            classify("      4.3 ISC 01263580"),
            LineType::MeasureUnknownScaleBlock
        );
    }

    #[test]
    fn non_ascii_rows_measured_in_characters() {
        let origin = format!("{}Sjöberg {}", " ".repeat(118), " ".repeat(10));
        assert_eq!(origin.chars().count(), 136);
        assert_eq!(classify(&origin), LineType::OriginBlock);
        assert_eq!(
            classify("mb     4.7 0.1   45 Åbo       01263580"),
            LineType::MeasureBlock
        );
    }

    #[test]
    fn char_columns_respect_boundaries() {
        let line = "abécd";
        assert_eq!(char_columns(line, 2..3), Some("é"));
        assert_eq!(char_columns(line, 1..5), Some("bécd"));
        assert_eq!(char_columns(line, 3..3), Some(""));
        assert_eq!(char_columns(line, 4..6), None);
    }

    #[test]
    fn junk() {
        assert_eq!(classify("ISC Bulletin"), LineType::Junk);
        assert_eq!(classify("mb 4.7"), LineType::Junk);
    }

    #[test]
    fn display_names() {
        assert_eq!(
            LineType::MeasureUnknownScaleBlock.to_string(),
            "measure_unknown_scale_block"
        );
    }
}
