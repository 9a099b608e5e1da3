//! Error types for the emsr-regression crate.

/// Error type for all fallible operations in the emsr-regression crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegressionError {
    /// Returned when fewer paired samples than required are supplied.
    #[error("not enough samples: got {n}, need at least {min}")]
    NotEnoughSamples {
        /// Number of pairs provided.
        n: usize,
        /// Minimum number of pairs.
        min: usize,
    },

    /// Returned when the value and sigma arrays differ in length.
    #[error("length mismatch: {input} has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array.
        input: &'static str,
        /// Its length.
        got: usize,
        /// Length of the native values.
        expected: usize,
    },

    /// Returned when an input array contains NaN or infinity.
    #[error("non-finite value in {input}")]
    NonFiniteInput {
        /// Name of the offending array.
        input: &'static str,
    },

    /// Returned when a standard error is zero or negative.
    #[error("{input}[{index}] must be positive")]
    NonPositiveSigma {
        /// Name of the offending array.
        input: &'static str,
        /// Position of the first bad entry.
        index: usize,
    },

    /// Returned when a polynomial order is zero.
    #[error("polynomial order must be >= 1, got {order}")]
    InvalidOrder {
        /// The invalid order.
        order: usize,
    },

    /// Returned when the model has at least as many parameters as samples.
    #[error("{k} parameters cannot be fitted to {n} samples")]
    TooManyParameters {
        /// Number of samples.
        n: usize,
        /// Number of model parameters.
        k: usize,
    },

    /// Returned when a supplied initial guess has the wrong length.
    #[error("initial beta has {got} coefficients, model needs {expected}")]
    InitialBetaMismatch {
        /// Length supplied.
        got: usize,
        /// Parameter count of the model.
        expected: usize,
    },

    /// Returned when the iteration limit is zero.
    #[error("max_iterations must be >= 1, got {value}")]
    InvalidMaxIterations {
        /// The invalid limit.
        value: u64,
    },

    /// Returned when the convergence tolerance is not finite and positive.
    #[error("sd_tolerance must be finite and positive, got {value}")]
    InvalidTolerance {
        /// The invalid tolerance.
        value: f64,
    },

    /// Returned when the least-squares initial guess has no unique solution.
    #[error("initial polyfit is singular (are all native values equal?)")]
    SingularPolyfit,

    /// Returned when the solver stops without converging.
    #[error("regression failed: {reason}")]
    RegressionFailed {
        /// Solver stop reason.
        reason: String,
    },

    /// Returned when AICc is requested with n <= k + 1.
    #[error("AICc undefined for {n} samples and {k} parameters")]
    CriterionUndefined {
        /// Number of samples.
        n: usize,
        /// Number of model parameters.
        k: usize,
    },
}
