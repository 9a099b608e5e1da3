//! Error types for the emsr-grouping crate.

/// Error type for all fallible operations in the emsr-grouping crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GroupingError {
    /// Returned when the clustering distance threshold is negative or not finite.
    #[error("cluster threshold must be finite and non-negative, got {threshold}")]
    InvalidThreshold {
        /// The invalid threshold.
        threshold: f64,
    },

    /// Returned when a sequential clustering window is negative or not finite.
    #[error("{window} window must be finite and non-negative, got {value}")]
    InvalidWindow {
        /// Which window (`time`, `space` or `magnitude`).
        window: &'static str,
        /// The invalid value.
        value: f64,
    },
}
