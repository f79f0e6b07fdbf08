//! Error types for objective evaluation and optimisation.
//!
//! Objective functions report [`ObjectiveError`]; the optimiser loop, the
//! line search and the step strategies report [`OptimizerError`], which wraps
//! objective failures.

use thiserror::Error;

/// Errors that can occur while evaluating an objective function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObjectiveError {
    /// A derivative capability was requested from an objective that does not
    /// provide it.
    ///
    /// Objectives never return a default value in place of a derivative they
    /// cannot compute.
    #[error("{capability} is not implemented for {objective}")]
    NotImplemented {
        /// The requested capability ("gradient", "hessian")
        capability: String,
        /// Name of the objective that was asked
        objective: String,
    },

    /// Dimension mismatch between a position and what the objective expects.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// An objective was configured with an invalid parameter.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the invalid parameter
        reason: String,
    },

    /// Numerical failure while evaluating the objective.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl ObjectiveError {
    /// Create a NotImplemented error for a capability of a named objective.
    pub fn not_implemented<S1, S2>(capability: S1, objective: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::NotImplemented {
            capability: capability.into(),
            objective: objective.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Returns true if this error reports a missing derivative capability.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

/// Errors that can occur during optimisation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// Propagated objective error.
    #[error("Objective evaluation failed: {0}")]
    Objective(#[from] ObjectiveError),

    /// Invalid optimiser configuration.
    ///
    /// Raised when a tolerance, step or budget is outside its valid range.
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// The linear system of a Newton step could not be solved.
    ///
    /// Singular Hessians are handled by the least-squares solve and do not
    /// produce this error; it is only raised when the decomposition itself
    /// fails.
    #[error("Linear solve failed: {reason}")]
    LinearSolveFailed {
        /// Description of the failure
        reason: String,
    },
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a LinearSolveFailed error.
    pub fn linear_solve_failed<S: Into<String>>(reason: S) -> Self {
        Self::LinearSolveFailed {
            reason: reason.into(),
        }
    }
}

/// Result type alias for objective evaluations.
pub type Result<T> = std::result::Result<T, ObjectiveError>;

/// Result type alias for optimiser operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
