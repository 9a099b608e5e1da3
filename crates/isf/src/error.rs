//! Error types for the emsr-isf crate.

use emsr_catalogue::CatalogueError;

use crate::line::LineType;
use crate::state::ParserState;

/// Error type for bulletin parsing and import.
///
/// Line-level variants carry the 1-based line number. They are recorded in
/// the [`ImportReport`](crate::ImportReport) and parsing resumes; see
/// [`IsfError::is_fatal`] for the variants that abort an import.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IsfError {
    /// Returned when a line type is not allowed in the current parser state.
    #[error("line {line}: unexpected {kind} in state {state}")]
    UnexpectedLine {
        /// 1-based line number.
        line: usize,
        /// Parser state when the line was read.
        state: ParserState,
        /// Detected line type.
        kind: LineType,
    },

    /// Returned when a fixed-width field cannot be decoded.
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Name of the field.
        field: &'static str,
        /// Raw text of the field.
        value: String,
    },

    /// Returned when a magnitude refers to an origin not listed for its event.
    #[error("line {line}: magnitude refers to unknown origin '{origin}'")]
    UnknownOrigin {
        /// 1-based line number.
        line: usize,
        /// Origin identifier found on the line.
        origin: String,
    },

    /// Returned when the store rejects a row; duplicates abort the import.
    #[error("line {line}: {source}")]
    Store {
        /// 1-based line number.
        line: usize,
        /// Store error.
        source: CatalogueError,
    },

    /// Returned when the commit interval is zero.
    #[error("commit_every must be >= 1, got {value}")]
    InvalidCommitEvery {
        /// The invalid interval.
        value: usize,
    },

    /// Returned when the bulletin cannot be read.
    #[error("failed to read bulletin: {reason}")]
    Io {
        /// Description of the I/O failure.
        reason: String,
    },
}

impl IsfError {
    /// Returns `true` for errors that abort the whole import.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IsfError::Store { .. } | IsfError::Io { .. } | IsfError::InvalidCommitEvery { .. }
        )
    }

    /// Returns the line number of line-level errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            IsfError::UnexpectedLine { line, .. }
            | IsfError::InvalidField { line, .. }
            | IsfError::UnknownOrigin { line, .. }
            | IsfError::Store { line, .. } => Some(*line),
            IsfError::InvalidCommitEvery { .. } | IsfError::Io { .. } => None,
        }
    }
}

impl From<std::io::Error> for IsfError {
    fn from(e: std::io::Error) -> Self {
        IsfError::Io {
            reason: e.to_string(),
        }
    }
}
