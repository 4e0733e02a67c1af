//! # Error Types
//!
//! Structured error types for riprap_core. Two failure classes matter to
//! callers and are kept distinct so the UI can phrase them differently:
//!
//! - [`CalcError::InvalidInput`] - a supplied value violates a declared
//!   acceptable range ("value out of range - please correct the input").
//! - [`CalcError::OutOfDomain`] - values are individually in range but
//!   combine to a physically undefined result ("no stable configuration
//!   exists for these conditions").
//!
//! Failures are always surfaced as typed values to the immediate caller.
//! Retrying is meaningless for a deterministic pure computation, and there is
//! never a partial result: a call produces a complete result or an error.
//!
//! ## Example
//!
//! ```rust
//! use riprap_core::errors::{CalcError, CalcResult};
//!
//! fn validate_velocity(velocity_ms: f64) -> CalcResult<()> {
//!     if velocity_ms <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "velocity_ms",
//!             velocity_ms.to_string(),
//!             "Velocity must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for riprap_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by callers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value violates a declared acceptable range
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Inputs are individually in range but combine to a physically
    /// undefined result (e.g. slope angle at or above the angle of repose)
    #[error("Out of physical domain for '{parameter}': {reason}")]
    OutOfDomain { parameter: String, reason: String },

    /// Calculation produced a non-finite intermediate (guard; not expected
    /// on validated input)
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Project schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutOfDomain error
    pub fn out_of_domain(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::OutOfDomain {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(
        calculation_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// True for the malformed-request class (caller should re-prompt)
    pub fn is_validation(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. })
    }

    /// True for the physical-impossibility class (no stable configuration)
    pub fn is_domain(&self) -> bool {
        matches!(self, CalcError::OutOfDomain { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::OutOfDomain { .. } => "OUT_OF_DOMAIN",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("velocity_ms", "-1.0", "Velocity must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_classes() {
        let validation = CalcError::invalid_input("depth_m", "0", "Depth must be positive");
        assert!(validation.is_validation());
        assert!(!validation.is_domain());

        let domain = CalcError::out_of_domain("slope_angle", "Slope exceeds angle of repose");
        assert!(domain.is_domain());
        assert!(!domain.is_validation());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::out_of_domain("specific_gravity", "test").error_code(),
            "OUT_OF_DOMAIN"
        );
        assert_eq!(
            CalcError::invalid_input("velocity_ms", "0", "test").error_code(),
            "INVALID_INPUT"
        );
    }
}
