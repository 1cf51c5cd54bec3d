//! Typed access to schema parameters.

use chrono::TimeDelta;
use chrono_tz::Tz;

use crate::domain::compliance::{ComplianceRuleSchema, ComplianceValue, SchemaError};
use crate::domain::reference_data::{Region, Scope};
use crate::domain::shared::{CurrencyId, Money, Security};

/// Reads a schema's parameters, falling back to a rule's default schema
/// for anything the schema leaves out.
#[derive(Debug, Clone, Copy)]
pub struct Parameters<'a> {
    schema: &'a ComplianceRuleSchema,
    defaults: &'a ComplianceRuleSchema,
}

impl<'a> Parameters<'a> {
    /// Read `schema`, defaulting from `defaults`.
    #[must_use]
    pub const fn new(schema: &'a ComplianceRuleSchema, defaults: &'a ComplianceRuleSchema) -> Self {
        Self { schema, defaults }
    }

    fn mismatch(&self, parameter: &str, expected: &'static str) -> SchemaError {
        SchemaError::TypeMismatch {
            schema: self.schema.name().to_string(),
            parameter: parameter.to_string(),
            expected,
        }
    }

    /// The raw value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Malformed`] if neither the schema nor the
    /// defaults carry the parameter.
    pub fn value(&self, name: &str) -> Result<&'a ComplianceValue, SchemaError> {
        self.schema
            .parameter(name)
            .or_else(|| self.defaults.parameter(name))
            .ok_or_else(|| {
                SchemaError::malformed(self.schema.name(), format!("missing parameter {name}"))
            })
    }

    /// A string parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the parameter is missing or not a string.
    pub fn string(&self, name: &str) -> Result<&'a str, SchemaError> {
        self.value(name)?
            .as_str()
            .ok_or_else(|| self.mismatch(name, "string"))
    }

    /// A non-negative whole quantity parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the parameter is missing, not a quantity,
    /// or negative.
    pub fn count(&self, name: &str) -> Result<u64, SchemaError> {
        let quantity = self
            .value(name)?
            .as_quantity()
            .ok_or_else(|| self.mismatch(name, "quantity"))?;
        u64::try_from(quantity.as_i64()).map_err(|_| {
            SchemaError::malformed(self.schema.name(), format!("{name} must not be negative"))
        })
    }

    /// A money parameter. Quantities are accepted as whole amounts.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the parameter is missing or not money.
    pub fn money(&self, name: &str) -> Result<Money, SchemaError> {
        match self.value(name)? {
            ComplianceValue::Money(money) => Ok(*money),
            ComplianceValue::Quantity(quantity) => Ok(Money::new(quantity.amount())),
            _ => Err(self.mismatch(name, "money")),
        }
    }

    /// A currency parameter. Strings are accepted as currency codes.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the parameter is missing or not a
    /// currency.
    pub fn currency(&self, name: &str) -> Result<CurrencyId, SchemaError> {
        match self.value(name)? {
            ComplianceValue::Currency(currency) => Ok(currency.clone()),
            ComplianceValue::String(code) => Ok(CurrencyId::new(code.clone())),
            _ => Err(self.mismatch(name, "currency")),
        }
    }

    /// A duration parameter. Quantities are read as whole seconds.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the parameter is missing, not a
    /// duration, negative, or too large to represent.
    pub fn duration(&self, name: &str) -> Result<TimeDelta, SchemaError> {
        let duration = match self.value(name)? {
            ComplianceValue::Duration(duration) => *duration,
            ComplianceValue::Quantity(seconds) => TimeDelta::try_seconds(seconds.as_i64())
                .ok_or_else(|| {
                    SchemaError::malformed(self.schema.name(), format!("{name} out of range"))
                })?,
            _ => return Err(self.mismatch(name, "duration")),
        };
        if duration < TimeDelta::zero() {
            return Err(SchemaError::malformed(
                self.schema.name(),
                format!("{name} must not be negative"),
            ));
        }
        Ok(duration)
    }

    /// A time zone parameter holding an IANA name.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the parameter is missing, not a string,
    /// or not a known time zone.
    pub fn time_zone(&self, name: &str) -> Result<Tz, SchemaError> {
        let zone = self.string(name)?;
        zone.parse::<Tz>().map_err(|_| {
            SchemaError::malformed(self.schema.name(), format!("unknown time zone {zone}"))
        })
    }

    /// A list of selector securities. A single security is accepted as a
    /// one-element list.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the parameter is missing or holds
    /// anything other than securities.
    pub fn securities(&self, name: &str) -> Result<Vec<Security>, SchemaError> {
        match self.value(name)? {
            ComplianceValue::Security(security) => Ok(vec![security.clone()]),
            ComplianceValue::List(values) => values
                .iter()
                .map(|value| {
                    value
                        .as_security()
                        .cloned()
                        .ok_or_else(|| self.mismatch(name, "list of securities"))
                })
                .collect(),
            _ => Err(self.mismatch(name, "list of securities")),
        }
    }

    /// The union of the regions selected by a securities parameter.
    ///
    /// # Errors
    ///
    /// See [`Parameters::securities`].
    pub fn region(&self, name: &str) -> Result<Region, SchemaError> {
        Ok(self.securities(name)?.into_iter().collect())
    }

    /// The union of the scopes selected by a securities parameter.
    ///
    /// # Errors
    ///
    /// See [`Parameters::securities`].
    pub fn scope(&self, name: &str) -> Result<Scope, SchemaError> {
        Ok(self.securities(name)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compliance::ComplianceParameter;
    use crate::domain::shared::Quantity;

    fn defaults() -> ComplianceRuleSchema {
        ComplianceRuleSchema::new(
            "rule",
            vec![
                ComplianceParameter::new("limit", Quantity::ZERO),
                ComplianceParameter::new("time_zone", "UTC"),
            ],
        )
    }

    #[test]
    fn schema_value_overrides_default() {
        let schema = ComplianceRuleSchema::new(
            "rule",
            vec![ComplianceParameter::new("limit", Quantity::from_i64(7))],
        );
        let defaults = defaults();
        let parameters = Parameters::new(&schema, &defaults);
        assert_eq!(parameters.count("limit").unwrap(), 7);
        assert_eq!(parameters.time_zone("time_zone").unwrap(), Tz::UTC);
    }

    #[test]
    fn missing_parameter_without_default_is_malformed() {
        let schema = ComplianceRuleSchema::new("rule", Vec::new());
        let defaults = defaults();
        let parameters = Parameters::new(&schema, &defaults);
        assert!(matches!(
            parameters.string("message"),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn wrong_type_is_a_mismatch() {
        let schema = ComplianceRuleSchema::new(
            "rule",
            vec![ComplianceParameter::new("limit", "five")],
        );
        let defaults = defaults();
        let parameters = Parameters::new(&schema, &defaults);
        assert_eq!(
            parameters.count("limit"),
            Err(SchemaError::TypeMismatch {
                schema: "rule".into(),
                parameter: "limit".into(),
                expected: "quantity",
            })
        );
    }

    #[test]
    fn negative_count_is_malformed() {
        let schema = ComplianceRuleSchema::new(
            "rule",
            vec![ComplianceParameter::new("limit", Quantity::from_i64(-1))],
        );
        let defaults = defaults();
        assert!(matches!(
            Parameters::new(&schema, &defaults).count("limit"),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn quantity_duration_is_read_as_seconds() {
        let schema = ComplianceRuleSchema::new(
            "rule",
            vec![ComplianceParameter::new("timeout", Quantity::from_i64(90))],
        );
        let defaults = defaults();
        assert_eq!(
            Parameters::new(&schema, &defaults).duration("timeout"),
            Ok(TimeDelta::seconds(90))
        );
    }

    #[test]
    fn oversized_duration_is_malformed() {
        let schema = ComplianceRuleSchema::new(
            "rule",
            vec![ComplianceParameter::new(
                "timeout",
                Quantity::from_i64(10_000_000_000_000_000),
            )],
        );
        let defaults = defaults();
        assert!(matches!(
            Parameters::new(&schema, &defaults).duration("timeout"),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn negative_duration_is_malformed() {
        let defaults = defaults();
        for value in [
            ComplianceValue::from(Quantity::from_i64(-5)),
            ComplianceValue::from(TimeDelta::seconds(-5)),
        ] {
            let schema =
                ComplianceRuleSchema::new("rule", vec![ComplianceParameter::new("timeout", value)]);
            assert!(matches!(
                Parameters::new(&schema, &defaults).duration("timeout"),
                Err(SchemaError::Malformed { .. })
            ));
        }
    }

    #[test]
    fn unknown_time_zone_is_malformed() {
        let schema = ComplianceRuleSchema::new(
            "rule",
            vec![ComplianceParameter::new("time_zone", "Mars/Olympus")],
        );
        let defaults = defaults();
        assert!(matches!(
            Parameters::new(&schema, &defaults).time_zone("time_zone"),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn securities_accept_a_single_selector() {
        let schema = ComplianceRuleSchema::new(
            "rule",
            vec![ComplianceParameter::new("region", Security::country_wide("US"))],
        );
        let defaults = defaults();
        let region = Parameters::new(&schema, &defaults).region("region").unwrap();
        assert_eq!(region, Region::from_country("US"));
    }
}
