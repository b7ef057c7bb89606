//! # Error Types
//!
//! Structured error types for calc_core. Calculator pages render these as
//! localized messages, so each variant carries enough context to pick the
//! right message without parsing strings.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_side(side: f64) -> CalcResult<()> {
//!     if side <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "side".to_string(),
//!             value: side.to_string(),
//!             reason: "Side must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for formula and session operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Inputs are individually fine but describe something impossible
    /// (a triangle that does not close, a negative absolute temperature...)
    #[error("Domain error in {calculation}: {reason}")]
    DomainError { calculation: String, reason: String },

    /// A solver would have divided by zero
    #[error("Division by zero in {calculation}: '{operand}' is zero")]
    DivisionByZero { calculation: String, operand: String },

    /// An expression string could not be parsed
    #[error("Cannot parse '{expression}' at position {position}: {reason}")]
    ParseError {
        expression: String,
        position: usize,
        reason: String,
    },

    /// Problem pool not found among the embedded pools
    #[error("Problem pool not found: {name}")]
    PoolNotFound { name: String },

    /// Problem pool exists but could not be read
    #[error("Malformed problem pool '{name}': {reason}")]
    MalformedPool { name: String, reason: String },

    /// Session or heuristic configuration could not be loaded
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a DomainError
    pub fn domain(calculation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DomainError {
            calculation: calculation.into(),
            reason: reason.into(),
        }
    }

    /// Create a DivisionByZero error
    pub fn division_by_zero(calculation: impl Into<String>, operand: impl Into<String>) -> Self {
        CalcError::DivisionByZero {
            calculation: calculation.into(),
            operand: operand.into(),
        }
    }

    /// Create a ParseError
    pub fn parse_error(expression: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        CalcError::ParseError {
            expression: expression.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Create a PoolNotFound error
    pub fn pool_not_found(name: impl Into<String>) -> Self {
        CalcError::PoolNotFound { name: name.into() }
    }

    /// Create a MalformedPool error
    pub fn malformed_pool(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::MalformedPool {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            reason: reason.into(),
        }
    }

    /// True for errors caused by what the user typed rather than by
    /// embedded data or a bug. Pages show these next to the form.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::DomainError { .. }
                | CalcError::DivisionByZero { .. }
                | CalcError::ParseError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::DomainError { .. } => "DOMAIN_ERROR",
            CalcError::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            CalcError::ParseError { .. } => "PARSE_ERROR",
            CalcError::PoolNotFound { .. } => "POOL_NOT_FOUND",
            CalcError::MalformedPool { .. } => "MALFORMED_POOL",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("side_a", "-5", "Side must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::domain("triangle", "does not close").error_code(), "DOMAIN_ERROR");
        assert_eq!(CalcError::division_by_zero("ohms_law", "R").error_code(), "DIVISION_BY_ZERO");
        assert_eq!(CalcError::pool_not_found("nope").error_code(), "POOL_NOT_FOUND");
    }

    #[test]
    fn test_user_facing_split() {
        assert!(CalcError::parse_error("2+", 2, "unexpected end").is_user_facing());
        assert!(!CalcError::malformed_pool("capitales", "bad toml").is_user_facing());
        assert!(!CalcError::config("missing table").is_user_facing());
    }

    #[test]
    fn test_display_mentions_context() {
        let msg = CalcError::division_by_zero("percentage_of", "total").to_string();
        assert!(msg.contains("percentage_of"));
        assert!(msg.contains("total"));
    }
}
