//! Error types for the emsr-scaling crate.

use emsr_grouping::GroupingError;
use emsr_regression::RegressionError;
use emsr_selection::SelectionError;

/// Error type for all fallible operations in the emsr-scaling crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalingError {
    /// Returned when fewer matched pairs than a fit needs were selected.
    #[error("not enough samples for {native} -> {target}: got {pairs} pairs, need at least {min}")]
    NotEnoughSamples {
        /// Native scale.
        native: String,
        /// Target scale.
        target: String,
        /// Number of matched pairs.
        pairs: usize,
        /// Minimum number of pairs.
        min: usize,
    },

    /// Returned when no model kinds were requested.
    #[error("no regression models requested")]
    NoModels,

    /// Returned when every requested model failed to fit.
    #[error("all {attempts} regression models failed for {native} -> {target}")]
    AllModelsFailed {
        /// Native scale.
        native: String,
        /// Target scale.
        target: String,
        /// Number of models tried.
        attempts: usize,
    },

    /// Returned when the outcome cannot be serialised.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Grouping error.
    #[error(transparent)]
    Grouping(#[from] GroupingError),

    /// Selection error.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Regression error.
    #[error(transparent)]
    Regression(#[from] RegressionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_not_enough_samples() {
        let e = ScalingError::NotEnoughSamples {
            native: "mb".to_string(),
            target: "Mw".to_string(),
            pairs: 2,
            min: 3,
        };
        assert_eq!(
            e.to_string(),
            "not enough samples for mb -> Mw: got 2 pairs, need at least 3"
        );
    }

    #[test]
    fn error_all_models_failed() {
        let e = ScalingError::AllModelsFailed {
            native: "MS".to_string(),
            target: "Mw".to_string(),
            attempts: 2,
        };
        assert_eq!(e.to_string(), "all 2 regression models failed for MS -> Mw");
    }

    #[test]
    fn error_transparent_selection() {
        let e = ScalingError::from(SelectionError::IdenticalScales {
            scale: "Mw".to_string(),
        });
        assert_eq!(e.to_string(), "native and target scale are both 'Mw'");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScalingError>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<ScalingError>();
    }
}
