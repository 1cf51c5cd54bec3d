//! Compliance Rule Registry
//!
//! Turns schemas into live rule trees. The registry maps schema names to
//! constructors; the [`ComplianceRuleBuilder`] pairs a registry with the
//! collaborators rules need and is passed to every constructor so wrapped
//! schemas can be built recursively.

mod builder;
mod builtins;
mod parameters;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use builder::ComplianceRuleBuilder;
pub use parameters::Parameters;

use crate::domain::compliance::{ComplianceError, ComplianceRule, ComplianceRuleSchema};

/// Result of building a rule.
pub type BuildResult = Result<Box<dyn ComplianceRule>, ComplianceError>;

/// Builds a rule from its schema.
pub type RuleConstructor =
    Arc<dyn Fn(&ComplianceRuleSchema, &ComplianceRuleBuilder) -> BuildResult + Send + Sync>;

/// Schema name → rule constructor table.
#[derive(Clone, Default)]
pub struct ComplianceRuleRegistry {
    constructors: BTreeMap<String, RuleConstructor>,
}

impl ComplianceRuleRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in rule.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    /// Register `constructor` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&ComplianceRuleSchema, &ComplianceRuleBuilder) -> BuildResult + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    /// The constructor registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleConstructor> {
        self.constructors.get(name)
    }

    /// Returns true if a constructor is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl fmt::Debug for ComplianceRuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceRuleRegistry")
            .field("names", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
