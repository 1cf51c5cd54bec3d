//! Named compliance parameter.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ComplianceValue;

/// A named value in a rule schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: ComplianceValue,
}

impl ComplianceParameter {
    /// Create a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<ComplianceValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ComplianceParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.name, self.value)
    }
}
