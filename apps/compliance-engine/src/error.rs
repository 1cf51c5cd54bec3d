//! Structured errors for the compliance engine.
//!
//! Wraps the domain and configuration errors in a coded error carrying
//! key-value context, suitable for logs and for callers that report
//! compliance outcomes over a wire.
//!
//! # Error Codes
//!
//! | Code | Category | Usage |
//! |------|----------|-------|
//! | `COMPLIANCE_VIOLATION` | Rejection | A rule rejected a submission or cancellation |
//! | `UNKNOWN_RULE` | Schema | No rule registered under the schema name |
//! | `MALFORMED_SCHEMA` | Schema | Wrapped schema or parameter is malformed |
//! | `PARAMETER_TYPE_MISMATCH` | Schema | A parameter holds the wrong value type |
//! | `NO_TIME_ZONE` | Reference data | Venue time zone missing or invalid |
//! | `UNKNOWN_VENUE` | Reference data | Venue not in the venue database |
//! | `INVALID_CONFIG` | Configuration | Configuration failed to load or validate |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::compliance::{ComplianceError, SchemaError};

/// Domain for compliance engine errors.
pub const ERROR_DOMAIN: &str = "cream.compliance";

/// Error codes for the compliance engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A rule rejected the action.
    ComplianceViolation,
    /// No rule registered under the schema name.
    UnknownRule,
    /// Wrapped schema or parameter is malformed.
    MalformedSchema,
    /// A parameter holds the wrong value type.
    ParameterTypeMismatch,
    /// Venue time zone missing or invalid.
    NoTimeZone,
    /// Venue not in the venue database.
    UnknownVenue,
    /// Configuration failed to load or validate.
    InvalidConfig,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::ComplianceViolation => "COMPLIANCE_VIOLATION",
            Self::UnknownRule => "UNKNOWN_RULE",
            Self::MalformedSchema => "MALFORMED_SCHEMA",
            Self::ParameterTypeMismatch => "PARAMETER_TYPE_MISMATCH",
            Self::NoTimeZone => "NO_TIME_ZONE",
            Self::UnknownVenue => "UNKNOWN_VENUE",
            Self::InvalidConfig => "INVALID_CONFIG",
        }
    }

    /// Returns true if the error is a business rejection rather than a
    /// fault in configuration or reference data.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::ComplianceViolation)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A coded error with context.
#[derive(Debug, Error)]
pub struct EngineError {
    /// Error code.
    code: ErrorCode,
    /// Human-readable message.
    message: String,
    /// Additional context (key-value pairs).
    context: Vec<(String, String)>,
}

impl EngineError {
    /// Create a new engine error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Convert to a serializable response body.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code.reason().to_string(),
            domain: ERROR_DOMAIN.to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

impl From<ComplianceError> for EngineError {
    fn from(error: ComplianceError) -> Self {
        let message = error.to_string();
        match error {
            ComplianceError::Check(_) => Self::new(ErrorCode::ComplianceViolation, message),
            ComplianceError::Schema(SchemaError::UnknownRule { name }) => {
                Self::new(ErrorCode::UnknownRule, message).with_context("schema", name)
            }
            ComplianceError::Schema(SchemaError::Malformed { schema, .. }) => {
                Self::new(ErrorCode::MalformedSchema, message).with_context("schema", schema)
            }
            ComplianceError::Schema(SchemaError::TypeMismatch {
                schema, parameter, ..
            }) => Self::new(ErrorCode::ParameterTypeMismatch, message)
                .with_context("schema", schema)
                .with_context("parameter", parameter),
            ComplianceError::NoTimeZone { venue } => {
                Self::new(ErrorCode::NoTimeZone, message).with_context("venue", venue.to_string())
            }
            ComplianceError::UnknownVenue { venue } => {
                Self::new(ErrorCode::UnknownVenue, message).with_context("venue", venue.to_string())
            }
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorCode::InvalidConfig, error.to_string())
    }
}

/// Serializable error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code string.
    pub code: String,
    /// Error domain.
    pub domain: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: std::collections::HashMap<String, String>,
}
