//! Error types for the emsr-harmonise crate.

/// Error type for all fallible operations in the emsr-harmonise crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarmoniseError {
    /// Returned when a formula is applied to a measure outside its domain.
    #[error("formula '{formula}' does not apply to {scale} measure {measure} from {agency}")]
    OutOfDomain {
        /// Name of the formula.
        formula: String,
        /// Store identity of the measure.
        measure: u64,
        /// Scale of the measure.
        scale: String,
        /// Reporting agency of the measure.
        agency: String,
    },

    /// Returned when the same measure is recorded as converted twice.
    #[error("measure {measure} has already been converted")]
    AlreadyConverted {
        /// Store identity of the measure.
        measure: u64,
    },

    /// Returned when a measure is recorded on both sides of a result.
    #[error("measure {measure} has already been recorded as {side}")]
    AlreadyRecorded {
        /// Store identity of the measure.
        measure: u64,
        /// `converted` or `unconverted`.
        side: &'static str,
    },

    /// Returned when a default uncertainty is negative or not finite.
    #[error("default uncertainty must be finite and >= 0, got {value}")]
    InvalidUncertainty {
        /// The invalid value.
        value: f64,
    },

    /// Returned when a formula's model error is negative or not finite.
    #[error("model error of formula '{formula}' must be finite and >= 0, got {value}")]
    InvalidModelError {
        /// Name of the formula.
        formula: String,
        /// The invalid value.
        value: f64,
    },

    /// Returned when writing an export fails.
    #[error("I/O error: {reason}")]
    Io {
        /// Description of the failure.
        reason: String,
    },

    /// Returned when JSON serialisation fails.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}

impl From<std::io::Error> for HarmoniseError {
    fn from(e: std::io::Error) -> Self {
        HarmoniseError::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_out_of_domain() {
        let e = HarmoniseError::OutOfDomain {
            formula: "mb->Mw".to_string(),
            measure: 4,
            scale: "ML".to_string(),
            agency: "ISC".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "formula 'mb->Mw' does not apply to ML measure 4 from ISC"
        );
    }

    #[test]
    fn error_already_converted() {
        let e = HarmoniseError::AlreadyConverted { measure: 12 };
        assert_eq!(e.to_string(), "measure 12 has already been converted");
    }

    #[test]
    fn error_already_recorded() {
        let e = HarmoniseError::AlreadyRecorded {
            measure: 3,
            side: "unconverted",
        };
        assert_eq!(e.to_string(), "measure 3 has already been recorded as unconverted");
    }

    #[test]
    fn error_invalid_uncertainty() {
        let e = HarmoniseError::InvalidUncertainty { value: -0.1 };
        assert_eq!(
            e.to_string(),
            "default uncertainty must be finite and >= 0, got -0.1"
        );
    }

    #[test]
    fn error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let e = HarmoniseError::from(io);
        assert_eq!(e.to_string(), "I/O error: closed");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HarmoniseError>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<HarmoniseError>();
    }
}
