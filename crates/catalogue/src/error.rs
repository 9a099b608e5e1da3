//! Error types for the emsr-catalogue crate.

/// Error type for all fallible store operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogueError {
    /// Returned when a row with the same natural key already exists.
    #[error("duplicate {kind} key: {key}")]
    DuplicateKey {
        /// Entity kind (`"origin"` or `"measure"`).
        kind: &'static str,
        /// Rendered natural key of the conflicting row.
        key: String,
    },

    /// Returned when a measure references an origin the store does not hold.
    #[error("origin '{origin}' of event '{event}' is not in the catalogue")]
    UnknownOrigin {
        /// Event source key.
        event: String,
        /// Origin source key.
        origin: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_duplicate_key() {
        let e = CatalogueError::DuplicateKey {
            kind: "origin",
            key: "610326404/01263580".to_string(),
        };
        assert_eq!(e.to_string(), "duplicate origin key: 610326404/01263580");
    }

    #[test]
    fn error_unknown_origin() {
        let e = CatalogueError::UnknownOrigin {
            event: "1".to_string(),
            origin: "9".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "origin '9' of event '1' is not in the catalogue"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<CatalogueError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CatalogueError>();
    }
}
