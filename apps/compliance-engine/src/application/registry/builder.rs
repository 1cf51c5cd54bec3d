//! Rule builder.

use std::fmt;
use std::sync::Arc;

use tracing::error;

use super::ComplianceRuleRegistry;
use crate::domain::clients::{DefinitionsClient, MarketDataClient, TimeClient};
use crate::domain::compliance::rules::RuleFactory;
use crate::domain::compliance::{
    ComplianceError, ComplianceRule, ComplianceRuleSchema, SchemaError,
};

/// Builds rule trees from schemas using a registry and the platform's
/// collaborators.
///
/// Cheap to clone; clones share the registry and collaborators.
#[derive(Clone)]
pub struct ComplianceRuleBuilder {
    registry: Arc<ComplianceRuleRegistry>,
    market_data: Arc<dyn MarketDataClient>,
    definitions: Arc<dyn DefinitionsClient>,
    time_client: Arc<dyn TimeClient>,
}

impl ComplianceRuleBuilder {
    /// Create a builder.
    #[must_use]
    pub fn new(
        registry: Arc<ComplianceRuleRegistry>,
        market_data: Arc<dyn MarketDataClient>,
        definitions: Arc<dyn DefinitionsClient>,
        time_client: Arc<dyn TimeClient>,
    ) -> Self {
        Self {
            registry,
            market_data,
            definitions,
            time_client,
        }
    }

    /// Create a builder over the built-in rules.
    #[must_use]
    pub fn with_defaults(
        market_data: Arc<dyn MarketDataClient>,
        definitions: Arc<dyn DefinitionsClient>,
        time_client: Arc<dyn TimeClient>,
    ) -> Self {
        Self::new(
            Arc::new(ComplianceRuleRegistry::with_defaults()),
            market_data,
            definitions,
            time_client,
        )
    }

    /// Build the rule described by `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownRule`] if no constructor is registered
    /// under the schema name, or whatever the constructor reports.
    pub fn build(
        &self,
        schema: &ComplianceRuleSchema,
    ) -> Result<Box<dyn ComplianceRule>, ComplianceError> {
        let Some(constructor) = self.registry.get(schema.name()) else {
            error!(schema = %schema.name(), "Unknown compliance rule");
            return Err(SchemaError::UnknownRule {
                name: schema.name().to_string(),
            }
            .into());
        };
        constructor(schema, self)
    }

    /// A factory building `schema`-style rules through this builder, for
    /// multiplexers that construct children lazily.
    #[must_use]
    pub fn factory(&self) -> RuleFactory {
        let builder = self.clone();
        Arc::new(move |schema| builder.build(schema))
    }

    /// The registry.
    #[must_use]
    pub fn registry(&self) -> &ComplianceRuleRegistry {
        &self.registry
    }

    /// The market data client.
    #[must_use]
    pub fn market_data(&self) -> Arc<dyn MarketDataClient> {
        Arc::clone(&self.market_data)
    }

    /// The definitions client.
    #[must_use]
    pub fn definitions(&self) -> Arc<dyn DefinitionsClient> {
        Arc::clone(&self.definitions)
    }

    /// The time client.
    #[must_use]
    pub fn time_client(&self) -> Arc<dyn TimeClient> {
        Arc::clone(&self.time_client)
    }
}

impl fmt::Debug for ComplianceRuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceRuleBuilder")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
