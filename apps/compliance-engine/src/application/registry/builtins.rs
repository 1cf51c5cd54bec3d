//! Constructors for the built-in rules.

use tracing::debug;

use super::{BuildResult, ComplianceRuleBuilder, ComplianceRuleRegistry, Parameters};
use crate::domain::compliance::rules::{
    BuyingPowerComplianceRule, CancelRestrictionPeriodComplianceRule, OpposingCancelComplianceRule,
    OpposingSubmissionComplianceRule, OrderCountLimitComplianceRule, PerAccountComplianceRule,
    PerSecurityComplianceRule, RegionFilterComplianceRule, RejectCancelsComplianceRule,
    RejectSubmissionsComplianceRule, RestrictionPeriod, ScopeFilterComplianceRule,
    SubmissionRestrictionPeriodComplianceRule, TimeFilterComplianceRule, buying_power, map_rule,
    opposing_cancel, opposing_submission, order_count_limit, region_filter, reject,
    restriction_period, scope_filter, time_filter,
};
use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRuleSchema, ComplianceValue, TimeWindow,
    unwrap,
};
use crate::domain::shared::Security;

pub(super) fn register(registry: &mut ComplianceRuleRegistry) {
    registry.register(reject::REJECT_SUBMISSIONS_NAME, build_reject_submissions);
    registry.register(reject::REJECT_CANCELS_NAME, build_reject_cancels);
    registry.register(order_count_limit::ORDER_COUNT_LIMIT_NAME, build_order_count_limit);
    registry.register(
        restriction_period::CANCEL_RESTRICTION_PERIOD_NAME,
        build_cancel_restriction_period,
    );
    registry.register(
        restriction_period::SUBMISSION_RESTRICTION_PERIOD_NAME,
        build_submission_restriction_period,
    );
    registry.register(opposing_cancel::OPPOSING_CANCEL_NAME, build_opposing_cancel);
    registry.register(
        opposing_cancel::OPPOSING_ORDER_CANCELLATION_NAME,
        build_opposing_cancel,
    );
    registry.register(
        opposing_submission::OPPOSING_SUBMISSION_NAME,
        build_opposing_submission,
    );
    registry.register(buying_power::BUYING_POWER_NAME, build_buying_power);
    registry.register(region_filter::REGION_FILTER_NAME, build_region_filter);
    registry.register(scope_filter::SCOPE_FILTER_NAME, build_scope_filter);
    registry.register(time_filter::TIME_FILTER_NAME, build_time_filter);
    registry.register(map_rule::PER_ACCOUNT_NAME, build_per_account);
    registry.register(map_rule::PER_SECURITY_NAME, build_per_security);
}

fn build_reject_submissions(
    schema: &ComplianceRuleSchema,
    _: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = reject::reject_submissions_schema();
    let parameters = Parameters::new(schema, &defaults);
    Ok(Box::new(RejectSubmissionsComplianceRule::new(
        parameters.string("message")?,
    )))
}

fn build_reject_cancels(schema: &ComplianceRuleSchema, _: &ComplianceRuleBuilder) -> BuildResult {
    let defaults = reject::reject_cancels_schema();
    let parameters = Parameters::new(schema, &defaults);
    Ok(Box::new(RejectCancelsComplianceRule::new(
        parameters.string("message")?,
    )))
}

fn build_order_count_limit(
    schema: &ComplianceRuleSchema,
    _: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = order_count_limit::order_count_limit_schema();
    let parameters = Parameters::new(schema, &defaults);
    Ok(Box::new(OrderCountLimitComplianceRule::new(
        parameters.count("limit")?,
    )))
}

fn read_restriction_period(
    schema: &ComplianceRuleSchema,
    defaults: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> Result<RestrictionPeriod, ComplianceError> {
    let parameters = Parameters::new(schema, defaults);
    let window = TimeWindow::new(
        parameters.duration("start_period")?,
        parameters.duration("end_period")?,
    );
    Ok(RestrictionPeriod::new(
        parameters.region("region")?,
        window,
        parameters.time_zone("time_zone")?,
        builder.time_client(),
    ))
}

fn build_cancel_restriction_period(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = restriction_period::cancel_restriction_period_schema();
    let period = read_restriction_period(schema, &defaults, builder)?;
    Ok(Box::new(CancelRestrictionPeriodComplianceRule::new(period)))
}

fn build_submission_restriction_period(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = restriction_period::submission_restriction_period_schema();
    let period = read_restriction_period(schema, &defaults, builder)?;
    Ok(Box::new(SubmissionRestrictionPeriodComplianceRule::new(period)))
}

fn build_opposing_cancel(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = opposing_cancel::opposing_cancel_schema();
    let parameters = Parameters::new(schema, &defaults);
    Ok(Box::new(OpposingCancelComplianceRule::new(
        parameters.duration("timeout")?,
        builder.time_client(),
    )))
}

fn build_opposing_submission(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = opposing_submission::opposing_submission_schema();
    let parameters = Parameters::new(schema, &defaults);
    Ok(Box::new(OpposingSubmissionComplianceRule::new(
        parameters.duration("timeout")?,
        parameters.money("offset")?,
        builder.time_client(),
    )))
}

fn build_buying_power(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = buying_power::buying_power_schema();
    let parameters = Parameters::new(schema, &defaults);
    Ok(Box::new(BuyingPowerComplianceRule::new(
        parameters.currency("currency")?,
        parameters.money("buying_power")?,
        parameters.region("symbols")?,
        builder.market_data(),
    )))
}

/// Build the rule wrapped inside a decorator's schema.
fn build_wrapped(schema: &ComplianceRuleSchema, builder: &ComplianceRuleBuilder) -> BuildResult {
    let inner = unwrap(schema)?;
    debug!(decorator = %schema.name(), inner = %inner.name(), "Building wrapped rule");
    builder.build(&inner)
}

fn build_region_filter(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = ComplianceRuleSchema::new(
        region_filter::REGION_FILTER_NAME,
        vec![ComplianceParameter::new(
            "region",
            ComplianceValue::List(vec![Security::any().into()]),
        )],
    );
    let region = Parameters::new(schema, &defaults).region("region")?;
    let inner = build_wrapped(schema, builder)?;
    Ok(Box::new(RegionFilterComplianceRule::new(region, inner)))
}

fn build_scope_filter(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = ComplianceRuleSchema::new(
        scope_filter::SCOPE_FILTER_NAME,
        vec![ComplianceParameter::new(
            "scope",
            ComplianceValue::List(vec![Security::any().into()]),
        )],
    );
    let scope = Parameters::new(schema, &defaults).scope("scope")?;
    let inner = build_wrapped(schema, builder)?;
    Ok(Box::new(ScopeFilterComplianceRule::new(
        scope,
        builder.definitions().load_venue_database(),
        inner,
    )))
}

fn build_time_filter(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let defaults = ComplianceRuleSchema::new(
        time_filter::TIME_FILTER_NAME,
        vec![
            ComplianceParameter::new("start_period", chrono::TimeDelta::zero()),
            ComplianceParameter::new("end_period", chrono::TimeDelta::zero()),
        ],
    );
    let parameters = Parameters::new(schema, &defaults);
    let window = TimeWindow::new(
        parameters.duration("start_period")?,
        parameters.duration("end_period")?,
    );
    let inner = build_wrapped(schema, builder)?;
    Ok(Box::new(TimeFilterComplianceRule::new(
        window,
        builder.definitions().load_venue_database(),
        builder.time_client(),
        inner,
    )))
}

fn build_per_account(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let inner = unwrap(schema)?;
    // Children are built lazily; build one now so bad schemas fail here.
    builder.build(&inner).map(drop)?;
    Ok(Box::new(PerAccountComplianceRule::per_account(
        inner,
        builder.factory(),
    )))
}

fn build_per_security(
    schema: &ComplianceRuleSchema,
    builder: &ComplianceRuleBuilder,
) -> BuildResult {
    let inner = unwrap(schema)?;
    builder.build(&inner).map(drop)?;
    Ok(Box::new(PerSecurityComplianceRule::per_security(
        inner,
        builder.factory(),
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;

    use super::*;
    use crate::domain::compliance::rules::testing::{at, limit_order, market_order, venues};
    use crate::domain::compliance::rules::{
        map_rule::{per_account_schema, per_security_schema},
        region_filter::region_filter_schema,
        time_filter::time_filter_schema,
    };
    use crate::domain::compliance::{SchemaError, WRAPPED_NAME, wrap};
    use crate::domain::order_execution::Side;
    use crate::domain::reference_data::Region;
    use crate::domain::shared::Quantity;
    use crate::infrastructure::{
        FixedTimeClient, InMemoryDefinitionsClient, UnavailableMarketDataClient,
    };

    fn builder_at(hour: u32) -> ComplianceRuleBuilder {
        ComplianceRuleBuilder::with_defaults(
            Arc::new(UnavailableMarketDataClient),
            Arc::new(InMemoryDefinitionsClient::new(venues())),
            Arc::new(FixedTimeClient::new(at(hour, 0))),
        )
    }

    fn limit(count: i64) -> ComplianceRuleSchema {
        ComplianceRuleSchema::new(
            order_count_limit::ORDER_COUNT_LIMIT_NAME,
            vec![ComplianceParameter::new("limit", Quantity::from_i64(count))],
        )
    }

    #[test]
    fn unknown_name_is_reported() {
        let result = builder_at(12).build(&ComplianceRuleSchema::new("nope", Vec::new()));
        assert_eq!(
            result.err(),
            Some(ComplianceError::Schema(SchemaError::UnknownRule {
                name: "nope".into()
            }))
        );
    }

    #[test]
    fn order_count_limit_reads_its_limit() {
        let rule = builder_at(12).build(&limit(1)).unwrap();
        let first = limit_order("A", Side::Bid, 10);
        let second = limit_order("A", Side::Bid, 10);
        rule.submit(&first).unwrap();
        assert!(rule.submit(&second).unwrap_err().is_check_failure());
    }

    #[test]
    fn reject_defaults_its_message() {
        let schema = ComplianceRuleSchema::new(reject::REJECT_SUBMISSIONS_NAME, Vec::new());
        let rule = builder_at(12).build(&schema).unwrap();
        let order = market_order("A", Side::Ask);
        assert_eq!(
            rule.submit(&order).unwrap_err(),
            ComplianceError::rejected("Submissions not permitted.")
        );
    }

    #[test]
    fn mistyped_parameter_is_a_mismatch() {
        let schema = ComplianceRuleSchema::new(
            opposing_cancel::OPPOSING_CANCEL_NAME,
            vec![ComplianceParameter::new("timeout", "soon")],
        );
        assert!(matches!(
            builder_at(12).build(&schema),
            Err(ComplianceError::Schema(SchemaError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn time_filter_only_applies_inside_window() {
        let reject = ComplianceRuleSchema::new(reject::REJECT_SUBMISSIONS_NAME, Vec::new());
        let schema = time_filter_schema(TimeDelta::hours(9), TimeDelta::hours(10), &reject);
        let order = limit_order("A", Side::Bid, 10);

        // 14:00 UTC is 09:00 in New York.
        let inside = builder_at(14).build(&schema).unwrap();
        assert!(inside.submit(&order).is_err());

        let outside = builder_at(18).build(&schema).unwrap();
        assert!(outside.submit(&order).is_ok());
    }

    #[test]
    fn region_filter_skips_foreign_orders() {
        let reject = ComplianceRuleSchema::new(reject::REJECT_SUBMISSIONS_NAME, Vec::new());
        let schema = region_filter_schema(&Region::from_country("CA"), &reject);
        let rule = builder_at(12).build(&schema).unwrap();
        assert!(rule.submit(&limit_order("A", Side::Bid, 1)).is_ok());
    }

    #[test]
    fn decorator_with_unknown_inner_fails_eagerly() {
        let schema = wrap(
            region_filter::REGION_FILTER_NAME,
            Vec::new(),
            &ComplianceRuleSchema::new("missing", Vec::new()),
        );
        assert!(matches!(
            builder_at(12).build(&schema),
            Err(ComplianceError::Schema(SchemaError::UnknownRule { .. }))
        ));
    }

    #[test]
    fn per_account_with_unknown_inner_fails_eagerly() {
        let schema = per_account_schema(&ComplianceRuleSchema::new("missing", Vec::new()));
        assert!(matches!(
            builder_at(12).build(&schema),
            Err(ComplianceError::Schema(SchemaError::UnknownRule { .. }))
        ));
    }

    #[test]
    fn per_security_with_mistyped_inner_fails_eagerly() {
        let inner = ComplianceRuleSchema::new(
            order_count_limit::ORDER_COUNT_LIMIT_NAME,
            vec![ComplianceParameter::new("limit", "many")],
        );
        assert!(matches!(
            builder_at(12).build(&per_security_schema(&inner)),
            Err(ComplianceError::Schema(SchemaError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn per_account_limits_each_account_separately() {
        let rule = builder_at(12).build(&per_account_schema(&limit(1))).unwrap();
        rule.submit(&limit_order("A", Side::Bid, 1)).unwrap();
        rule.submit(&limit_order("B", Side::Bid, 1)).unwrap();
        assert!(rule.submit(&limit_order("A", Side::Bid, 1)).is_err());
    }

    #[test]
    fn decorator_without_arguments_is_malformed() {
        let schema = ComplianceRuleSchema::new(
            time_filter::TIME_FILTER_NAME,
            vec![ComplianceParameter::new(WRAPPED_NAME, "reject_cancels")],
        );
        assert!(matches!(
            builder_at(12).build(&schema),
            Err(ComplianceError::Schema(SchemaError::Malformed { .. }))
        ));
    }
}
