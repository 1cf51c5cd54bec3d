//! Schema encoding and compilation tests.
//!
//! Wrapped schemas must survive any choice of names and parameters, and the
//! builder must turn every malformed or unknown schema into an error before
//! a rule exists.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::TimeDelta;
use proptest::prelude::*;

use compliance_engine::domain::compliance::rules::map_rule::per_security_schema;
use compliance_engine::domain::compliance::rules::time_filter::time_filter_schema;
use compliance_engine::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRuleSchema, ComplianceValue, SchemaError,
    WRAPPED_ARGUMENTS, WRAPPED_NAME, unwrap, wrap,
};
use compliance_engine::domain::reference_data::{VenueDatabase, VenueEntry};
use compliance_engine::domain::shared::{Money, Quantity, Security, Timestamp};
use compliance_engine::{
    ComplianceRuleBuilder, FixedTimeClient, InMemoryDefinitionsClient,
    UnavailableMarketDataClient,
};

// =============================================================================
// Strategies
// =============================================================================

fn leaf() -> impl Strategy<Value = ComplianceValue> {
    prop_oneof![
        any::<bool>().prop_map(ComplianceValue::Bool),
        any::<i32>().prop_map(|n| ComplianceValue::Quantity(Quantity::from_i64(i64::from(n)))),
        "[a-z ]{0,12}".prop_map(ComplianceValue::String),
        (0i64..86_400_000).prop_map(|ms| ComplianceValue::Duration(TimeDelta::milliseconds(ms))),
        (0i64..1_000_000).prop_map(|c| ComplianceValue::Money(Money::from_cents(c))),
        "[A-Z]{1,4}".prop_map(|s| ComplianceValue::Security(Security::new(s, "XNAS", "US"))),
    ]
}

fn value() -> impl Strategy<Value = ComplianceValue> {
    leaf().prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(ComplianceValue::List)
    })
}

fn parameters() -> impl Strategy<Value = Vec<ComplianceParameter>> {
    prop::collection::vec(
        (prop_oneof!["[a-z_]{1,10}", Just(WRAPPED_NAME.to_string())], value())
            .prop_map(|(name, value)| ComplianceParameter::new(name, value)),
        0..5,
    )
}

fn schema() -> impl Strategy<Value = ComplianceRuleSchema> {
    ("[a-z_]{1,16}", parameters()).prop_map(|(name, parameters)| {
        ComplianceRuleSchema::new(name, parameters)
    })
}

proptest! {
    #[test]
    fn unwrap_recovers_wrapped_schema(
        inner in schema(),
        outer_name in "[a-z_]{1,16}",
        outer_parameters in parameters(),
    ) {
        let wrapped = wrap(outer_name.clone(), outer_parameters, &inner);
        prop_assert_eq!(wrapped.name(), outer_name.as_str());
        prop_assert_eq!(unwrap(&wrapped).unwrap(), inner);
    }

    #[test]
    fn nested_wrapping_unwraps_layer_by_layer(inner in schema()) {
        let once = wrap("region_filter", Vec::new(), &inner);
        let twice = wrap("per_account", Vec::new(), &once);
        prop_assert_eq!(unwrap(&unwrap(&twice).unwrap()).unwrap(), inner);
    }
}

// =============================================================================
// Builder
// =============================================================================

fn builder() -> ComplianceRuleBuilder {
    let venues: VenueDatabase = [VenueEntry::new("XNAS", "US", "America/New_York")]
        .into_iter()
        .collect();
    ComplianceRuleBuilder::with_defaults(
        Arc::new(UnavailableMarketDataClient),
        Arc::new(InMemoryDefinitionsClient::new(venues)),
        Arc::new(FixedTimeClient::new(Timestamp::MIN)),
    )
}

#[test]
fn unknown_rule_name_is_rejected() {
    let result = builder().build(&ComplianceRuleSchema::new("frobnicate", Vec::new()));
    assert_eq!(
        result.err(),
        Some(ComplianceError::Schema(SchemaError::UnknownRule {
            name: "frobnicate".into()
        }))
    );
}

#[test]
fn arguments_of_wrong_type_are_malformed() {
    let schema = ComplianceRuleSchema::new(
        "per_account",
        vec![
            ComplianceParameter::new(WRAPPED_NAME, "reject_cancels"),
            ComplianceParameter::new(WRAPPED_ARGUMENTS, "not a list"),
        ],
    );
    assert!(matches!(
        builder().build(&schema),
        Err(ComplianceError::Schema(SchemaError::Malformed { .. }))
    ));
}

#[test]
fn argument_that_is_not_a_pair_is_malformed() {
    let schema = ComplianceRuleSchema::new(
        "region_filter",
        vec![
            ComplianceParameter::new(WRAPPED_NAME, "reject_cancels"),
            ComplianceParameter::new(
                WRAPPED_ARGUMENTS,
                ComplianceValue::List(vec![ComplianceValue::String("message".into())]),
            ),
        ],
    );
    assert!(matches!(
        builder().build(&schema),
        Err(ComplianceError::Schema(SchemaError::Malformed { .. }))
    ));
}

#[test]
fn unknown_rule_nested_in_decorators_fails_at_build() {
    let inner = ComplianceRuleSchema::new("frobnicate", Vec::new());
    let schema = per_security_schema(&time_filter_schema(
        TimeDelta::hours(9),
        TimeDelta::hours(16),
        &inner,
    ));
    assert!(matches!(
        builder().build(&schema),
        Err(ComplianceError::Schema(SchemaError::UnknownRule { .. }))
    ));
}

#[test]
fn well_formed_nested_schema_builds() {
    let inner = ComplianceRuleSchema::new(
        "order_count_limit",
        vec![ComplianceParameter::new("limit", Quantity::from_i64(3))],
    );
    let schema = per_security_schema(&time_filter_schema(
        TimeDelta::hours(9),
        TimeDelta::hours(16),
        &inner,
    ));
    assert!(builder().build(&schema).is_ok());
}

#[test]
fn out_of_range_timeout_fails_to_build() {
    let schema = ComplianceRuleSchema::new(
        "opposing_cancel",
        vec![ComplianceParameter::new(
            "timeout",
            Quantity::from_i64(10_000_000_000_000_000),
        )],
    );
    assert!(matches!(
        builder().build(&schema),
        Err(ComplianceError::Schema(SchemaError::Malformed { .. }))
    ));
}

#[test]
fn negative_window_bound_fails_to_build() {
    let schema = time_filter_schema(
        TimeDelta::hours(-1),
        TimeDelta::hours(2),
        &ComplianceRuleSchema::new("reject_submissions", Vec::new()),
    );
    assert!(matches!(
        builder().build(&schema),
        Err(ComplianceError::Schema(SchemaError::Malformed { .. }))
    ));
}
