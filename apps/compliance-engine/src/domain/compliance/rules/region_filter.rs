//! Gate an inner rule by the order's region.

use tracing::debug;

use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema, ComplianceValue,
    wrap,
};
use crate::domain::order_execution::Order;
use crate::domain::reference_data::Region;

/// Schema name of [`RegionFilterComplianceRule`].
pub const REGION_FILTER_NAME: &str = "region_filter";

/// Schema of a [`RegionFilterComplianceRule`] applying `schema` within
/// `region`.
#[must_use]
pub fn region_filter_schema(
    region: &Region,
    schema: &ComplianceRuleSchema,
) -> ComplianceRuleSchema {
    let selectors = region
        .to_selectors()
        .into_iter()
        .map(ComplianceValue::Security)
        .collect();
    wrap(
        REGION_FILTER_NAME,
        vec![ComplianceParameter::new("region", ComplianceValue::List(selectors))],
        schema,
    )
}

/// Applies the inner rule only to orders whose security lies in a region.
///
/// Orders outside the region are still registered with the inner rule.
pub struct RegionFilterComplianceRule {
    region: Region,
    inner: Box<dyn ComplianceRule>,
}

impl RegionFilterComplianceRule {
    /// Create the decorator.
    #[must_use]
    pub fn new(region: Region, inner: Box<dyn ComplianceRule>) -> Self {
        Self { region, inner }
    }

    fn applies_to(&self, order: &Order) -> bool {
        self.region.contains_security(&order.fields().security)
    }
}

impl ComplianceRule for RegionFilterComplianceRule {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.applies_to(order) {
            self.inner.submit(order)
        } else {
            debug!(order_id = %order.id(), region = %self.region, "Order outside region");
            self.add(order)
        }
    }

    fn cancel(&self, order: &Order) -> Result<(), ComplianceError> {
        if self.applies_to(order) {
            self.inner.cancel(order)
        } else {
            Ok(())
        }
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        self.inner.add(order)
    }
}

impl std::fmt::Debug for RegionFilterComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionFilterComplianceRule")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
