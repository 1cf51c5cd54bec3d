//! Market data client adapters.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::clients::{BboQuote, MarketDataClient};
use crate::domain::shared::Security;

/// Serves quotes published into memory.
#[derive(Debug, Default)]
pub struct InMemoryMarketDataClient {
    quotes: RwLock<HashMap<Security, BboQuote>>,
}

impl InMemoryMarketDataClient {
    /// Create a client with no quotes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the latest quote for `security`.
    pub fn publish(&self, security: Security, quote: BboQuote) {
        self.quotes.write().insert(security, quote);
    }
}

impl MarketDataClient for InMemoryMarketDataClient {
    fn load_bbo_quote(&self, security: &Security) -> Option<BboQuote> {
        self.quotes.read().get(security).copied()
    }
}

/// A market data client with no quotes at all.
///
/// Rules that need a quote reject every order they check.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableMarketDataClient;

impl MarketDataClient for UnavailableMarketDataClient {
    fn load_bbo_quote(&self, _security: &Security) -> Option<BboQuote> {
        None
    }
}
