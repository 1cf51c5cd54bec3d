//! Typed values carried by compliance rule parameters.

use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{CurrencyId, Money, Quantity, Security, Timestamp};

/// A parameter value.
///
/// Lists nest arbitrarily; wrapped schemas encode an inner rule's
/// parameters as a list of `[name, value]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer-like quantity.
    Quantity(Quantity),
    /// Floating point number.
    Double(f64),
    /// Free-form string.
    String(String),
    /// Point in time.
    DateTime(Timestamp),
    /// Time-of-day or elapsed duration.
    Duration(#[serde(with = "duration_millis")] TimeDelta),
    /// Currency identifier.
    Currency(CurrencyId),
    /// Monetary amount.
    Money(Money),
    /// Security, possibly a wildcard selector.
    Security(Security),
    /// Ordered list of values.
    List(Vec<ComplianceValue>),
}

impl ComplianceValue {
    /// Name of the value's type, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Quantity(_) => "quantity",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::DateTime(_) => "date_time",
            Self::Duration(_) => "duration",
            Self::Currency(_) => "currency",
            Self::Money(_) => "money",
            Self::Security(_) => "security",
            Self::List(_) => "list",
        }
    }

    /// The boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The quantity, if this is one.
    #[must_use]
    pub const fn as_quantity(&self) -> Option<Quantity> {
        match self {
            Self::Quantity(value) => Some(*value),
            _ => None,
        }
    }

    /// The floating point number, if this is one.
    #[must_use]
    pub const fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// The timestamp, if this is one.
    #[must_use]
    pub const fn as_date_time(&self) -> Option<Timestamp> {
        match self {
            Self::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    /// The duration, if this is one.
    #[must_use]
    pub const fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Self::Duration(value) => Some(*value),
            _ => None,
        }
    }

    /// The currency, if this is one.
    #[must_use]
    pub const fn as_currency(&self) -> Option<&CurrencyId> {
        match self {
            Self::Currency(value) => Some(value),
            _ => None,
        }
    }

    /// The monetary amount, if this is one.
    #[must_use]
    pub const fn as_money(&self) -> Option<Money> {
        match self {
            Self::Money(value) => Some(*value),
            _ => None,
        }
    }

    /// The security, if this is one.
    #[must_use]
    pub const fn as_security(&self) -> Option<&Security> {
        match self {
            Self::Security(value) => Some(value),
            _ => None,
        }
    }

    /// The list, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for ComplianceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Quantity(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "\"{value}\""),
            Self::DateTime(value) => write!(f, "{}", value.to_rfc3339()),
            Self::Duration(value) => format_duration(f, *value),
            Self::Currency(value) => write!(f, "{value}"),
            Self::Money(value) => write!(f, "{value}"),
            Self::Security(value) => write!(f, "{value}"),
            Self::List(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

fn format_duration(f: &mut fmt::Formatter<'_>, value: TimeDelta) -> fmt::Result {
    let sign = if value < TimeDelta::zero() { "-" } else { "" };
    let value = value.abs();
    let seconds = value.num_seconds();
    let millis = value.subsec_nanos() / 1_000_000;
    write!(
        f,
        "{sign}{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )?;
    if millis != 0 {
        write!(f, ".{millis:03}")?;
    }
    Ok(())
}

impl From<bool> for ComplianceValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Quantity> for ComplianceValue {
    fn from(value: Quantity) -> Self {
        Self::Quantity(value)
    }
}

impl From<f64> for ComplianceValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<String> for ComplianceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ComplianceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Timestamp> for ComplianceValue {
    fn from(value: Timestamp) -> Self {
        Self::DateTime(value)
    }
}

impl From<TimeDelta> for ComplianceValue {
    fn from(value: TimeDelta) -> Self {
        Self::Duration(value)
    }
}

impl From<CurrencyId> for ComplianceValue {
    fn from(value: CurrencyId) -> Self {
        Self::Currency(value)
    }
}

impl From<Money> for ComplianceValue {
    fn from(value: Money) -> Self {
        Self::Money(value)
    }
}

impl From<Security> for ComplianceValue {
    fn from(value: Security) -> Self {
        Self::Security(value)
    }
}

impl From<Vec<Self>> for ComplianceValue {
    fn from(values: Vec<Self>) -> Self {
        Self::List(values)
    }
}

/// Serializes a `TimeDelta` as whole milliseconds.
mod duration_millis {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        TimeDelta::try_milliseconds(millis)
            .ok_or_else(|| serde::de::Error::custom(format!("duration out of range: {millis}ms")))
    }
}
