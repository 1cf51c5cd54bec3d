//! Compliance errors.

use thiserror::Error;

use crate::domain::shared::VenueCode;

/// A rule's business predicate was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ComplianceFailure {
    /// Human-readable reason.
    pub message: String,
}

impl ComplianceFailure {
    /// Create a failure carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A schema could not be turned into a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The wrapped-schema encoding is malformed.
    #[error("Malformed schema {schema}: {reason}")]
    Malformed {
        /// Name of the offending schema.
        schema: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No builder is registered under the schema name.
    #[error("Unknown compliance rule: {name}")]
    UnknownRule {
        /// The unrecognized name.
        name: String,
    },

    /// A parameter holds a value of the wrong type.
    #[error("Parameter {parameter} of {schema} must be a {expected}")]
    TypeMismatch {
        /// Name of the offending schema.
        schema: String,
        /// Name of the parameter.
        parameter: String,
        /// Expected value type.
        expected: &'static str,
    },
}

impl SchemaError {
    /// Build a [`SchemaError::Malformed`].
    #[must_use]
    pub fn malformed(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            schema: schema.into(),
            reason: reason.into(),
        }
    }
}

/// Error returned by rule operations and the rule builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplianceError {
    /// Compliance check failure.
    #[error(transparent)]
    Check(#[from] ComplianceFailure),

    /// Schema construction failure.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The venue has no usable time zone.
    #[error("No time zone registered for venue {venue}")]
    NoTimeZone {
        /// The venue.
        venue: VenueCode,
    },

    /// The venue is not in the venue database.
    #[error("Unknown venue {venue}")]
    UnknownVenue {
        /// The venue.
        venue: VenueCode,
    },
}

impl ComplianceError {
    /// Shorthand for a compliance check failure.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Check(ComplianceFailure::new(message))
    }

    /// Returns true for a compliance check failure (as opposed to a
    /// construction or reference data error).
    #[must_use]
    pub const fn is_check_failure(&self) -> bool {
        matches!(self, Self::Check(_))
    }
}
