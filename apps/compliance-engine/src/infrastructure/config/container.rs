//! Dependency Injection Container
//!
//! Manages creation and wiring of the rule builder, the rule set and the
//! collaborators they depend on.

use std::sync::Arc;

use tracing::{error, info};

use crate::application::{ComplianceRuleBuilder, ComplianceRuleRegistry, ComplianceRuleSet};
use crate::config::Config;
use crate::domain::clients::{DefinitionsClient, MarketDataClient, TimeClient};
use crate::error::EngineError;
use crate::infrastructure::{InMemoryDefinitionsClient, InMemoryMarketDataClient, SystemTimeClient};

/// Dependency injection container.
///
/// Holds the collaborator ports and the rule registry. Use
/// [`Container::from_config`] for the production wiring or
/// [`Container::new`] to inject specific implementations.
#[derive(Clone)]
pub struct Container {
    time_client: Arc<dyn TimeClient>,
    definitions: Arc<dyn DefinitionsClient>,
    market_data: Arc<dyn MarketDataClient>,
    registry: Arc<ComplianceRuleRegistry>,
}

impl Container {
    /// Create a new container with all dependencies.
    #[must_use]
    pub fn new(
        time_client: Arc<dyn TimeClient>,
        definitions: Arc<dyn DefinitionsClient>,
        market_data: Arc<dyn MarketDataClient>,
        registry: Arc<ComplianceRuleRegistry>,
    ) -> Self {
        Self {
            time_client,
            definitions,
            market_data,
            registry,
        }
    }

    /// Wire the system clock, the configured venues, an empty quote book
    /// and the built-in rules.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(SystemTimeClient),
            Arc::new(InMemoryDefinitionsClient::new(
                config.reference_data.venue_database(),
            )),
            Arc::new(InMemoryMarketDataClient::new()),
            Arc::new(ComplianceRuleRegistry::with_defaults()),
        )
    }

    /// Get the time client.
    pub fn time_client(&self) -> Arc<dyn TimeClient> {
        Arc::clone(&self.time_client)
    }

    /// Get the definitions client.
    pub fn definitions(&self) -> Arc<dyn DefinitionsClient> {
        Arc::clone(&self.definitions)
    }

    /// Get the market data client.
    pub fn market_data(&self) -> Arc<dyn MarketDataClient> {
        Arc::clone(&self.market_data)
    }

    /// Create a rule builder over the registry.
    pub fn rule_builder(&self) -> ComplianceRuleBuilder {
        ComplianceRuleBuilder::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.market_data),
            Arc::clone(&self.definitions),
            Arc::clone(&self.time_client),
        )
    }

    /// Compile every configured policy into a new rule set.
    ///
    /// # Errors
    ///
    /// Returns the first policy that fails to compile, after logging every
    /// failure.
    pub fn rule_set(&self, config: &Config) -> Result<ComplianceRuleSet, EngineError> {
        let rule_set = ComplianceRuleSet::new(self.rule_builder());
        let mut first_error = None;
        for policy in &config.policies {
            if let Err(e) = rule_set.update(policy.to_entry()) {
                let e = EngineError::from(e)
                    .with_context("policy_id", policy.id.to_string())
                    .with_context("account", policy.account.to_string());
                error!(error = %e, "Policy failed to compile");
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }
        info!(policies = rule_set.len(), "Compliance policies compiled");
        Ok(rule_set)
    }
}
