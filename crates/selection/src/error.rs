//! Error types for the emsr-selection crate.

/// Error type for all fallible operations in the emsr-selection crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    /// Returned when an agency ranking scale pattern is not a valid regex.
    #[error("invalid scale pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// Returned when a fixed default uncertainty is not finite and positive.
    #[error("default uncertainty must be finite and positive, got {value}")]
    InvalidDefault {
        /// The invalid default.
        value: f64,
    },

    /// Returned when native and target scale are the same.
    #[error("native and target scale are both '{scale}'")]
    IdenticalScales {
        /// The repeated scale.
        scale: String,
    },
}
