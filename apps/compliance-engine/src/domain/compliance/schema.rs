//! Compliance rule schemas.
//!
//! A schema names a rule kind and lists its parameters. Decorators and
//! multiplexers embed the schema of the rule they own with [`wrap`]: the
//! inner schema's name and parameters travel as two extra parameters of the
//! outer schema, `name` and `arguments`, where `arguments` is a list of
//! `[name, value]` pairs. [`unwrap`] recovers the inner schema.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ComplianceParameter, ComplianceValue, SchemaError};

/// Synthetic parameter carrying the wrapped schema's name.
pub const WRAPPED_NAME: &str = "name";

/// Synthetic parameter carrying the wrapped schema's parameters.
pub const WRAPPED_ARGUMENTS: &str = "arguments";

/// Serializable description of a rule instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRuleSchema {
    name: String,
    #[serde(default)]
    parameters: Vec<ComplianceParameter>,
}

impl ComplianceRuleSchema {
    /// Create a schema.
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: Vec<ComplianceParameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Rule kind.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ComplianceParameter] {
        &self.parameters
    }

    /// Value of the first parameter named `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ComplianceValue> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name == name)
            .map(|parameter| &parameter.value)
    }

    fn last_parameter(&self, name: &str) -> Option<&ComplianceValue> {
        self.parameters
            .iter()
            .rev()
            .find(|parameter| parameter.name == name)
            .map(|parameter| &parameter.value)
    }
}

impl fmt::Display for ComplianceRuleSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ")")
    }
}

/// Embed `schema` into a new schema named `name` whose own parameters are
/// `parameters`.
#[must_use]
pub fn wrap(
    name: impl Into<String>,
    mut parameters: Vec<ComplianceParameter>,
    schema: &ComplianceRuleSchema,
) -> ComplianceRuleSchema {
    let arguments = schema
        .parameters
        .iter()
        .map(|parameter| {
            ComplianceValue::List(vec![
                ComplianceValue::String(parameter.name.clone()),
                parameter.value.clone(),
            ])
        })
        .collect();
    parameters.push(ComplianceParameter::new(
        WRAPPED_NAME,
        ComplianceValue::String(schema.name.clone()),
    ));
    parameters.push(ComplianceParameter::new(
        WRAPPED_ARGUMENTS,
        ComplianceValue::List(arguments),
    ));
    ComplianceRuleSchema::new(name, parameters)
}

/// Recover the schema embedded by [`wrap`].
///
/// The synthetic parameters are looked up from the end, so outer parameters
/// that happen to share their names do not interfere.
///
/// # Errors
///
/// Returns [`SchemaError::Malformed`] if either synthetic parameter is
/// missing or has the wrong type, or if an `arguments` entry is not a
/// `[string, value]` pair.
pub fn unwrap(schema: &ComplianceRuleSchema) -> Result<ComplianceRuleSchema, SchemaError> {
    let name = schema
        .last_parameter(WRAPPED_NAME)
        .ok_or_else(|| SchemaError::malformed(schema.name(), "missing wrapped rule name"))?
        .as_str()
        .ok_or_else(|| SchemaError::malformed(schema.name(), "wrapped rule name is not a string"))?;
    let arguments = schema
        .last_parameter(WRAPPED_ARGUMENTS)
        .ok_or_else(|| SchemaError::malformed(schema.name(), "missing wrapped arguments"))?
        .as_list()
        .ok_or_else(|| SchemaError::malformed(schema.name(), "wrapped arguments are not a list"))?;
    let parameters = arguments
        .iter()
        .map(|argument| match argument.as_list() {
            Some([ComplianceValue::String(name), value]) => {
                Ok(ComplianceParameter::new(name.clone(), value.clone()))
            }
            _ => Err(SchemaError::malformed(
                schema.name(),
                format!("argument {argument} is not a [name, value] pair"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ComplianceRuleSchema::new(name, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Quantity;
    use chrono::TimeDelta;

    fn inner() -> ComplianceRuleSchema {
        ComplianceRuleSchema::new(
            "order_count_limit",
            vec![ComplianceParameter::new("limit", Quantity::from_i64(5))],
        )
    }

    #[test]
    fn wrap_appends_synthetic_parameters() {
        let outer = wrap(
            "time_filter",
            vec![ComplianceParameter::new("start_period", TimeDelta::hours(9))],
            &inner(),
        );
        assert_eq!(outer.name(), "time_filter");
        assert_eq!(outer.parameters().len(), 3);
        assert_eq!(outer.parameters()[0].name, "start_period");
        assert_eq!(
            outer.parameter(WRAPPED_NAME),
            Some(&ComplianceValue::from("order_count_limit"))
        );
        assert_eq!(
            outer.parameter(WRAPPED_ARGUMENTS),
            Some(&ComplianceValue::List(vec![ComplianceValue::List(vec![
                "limit".into(),
                Quantity::from_i64(5).into(),
            ])]))
        );
    }

    #[test]
    fn unwrap_recovers_inner_schema() {
        let outer = wrap("per_account", Vec::new(), &inner());
        assert_eq!(unwrap(&outer).unwrap(), inner());
    }

    #[test]
    fn unwrap_nested() {
        let middle = wrap("per_account", Vec::new(), &inner());
        let outer = wrap("region_filter", Vec::new(), &middle);
        let recovered = unwrap(&unwrap(&outer).unwrap()).unwrap();
        assert_eq!(recovered, inner());
    }

    #[test]
    fn unwrap_rejects_bad_argument_shape() {
        let schema = ComplianceRuleSchema::new(
            "per_account",
            vec![
                ComplianceParameter::new(WRAPPED_NAME, "reject_cancels"),
                ComplianceParameter::new(
                    WRAPPED_ARGUMENTS,
                    ComplianceValue::List(vec![ComplianceValue::List(vec!["message".into()])]),
                ),
            ],
        );
        assert!(matches!(unwrap(&schema), Err(SchemaError::Malformed { .. })));
    }

    #[test]
    fn unwrap_rejects_missing_name() {
        let schema = ComplianceRuleSchema::new("per_account", Vec::new());
        assert!(matches!(unwrap(&schema), Err(SchemaError::Malformed { .. })));
    }

    #[test]
    fn display_lists_parameters() {
        assert_eq!(inner().to_string(), "order_count_limit((limit, 5))");
    }
}
