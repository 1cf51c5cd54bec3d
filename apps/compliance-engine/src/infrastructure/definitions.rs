//! Definitions client adapters.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::clients::DefinitionsClient;
use crate::domain::reference_data::{VenueDatabase, VenueEntry};

/// Serves reference data held in memory (loaded from configuration).
#[derive(Debug, Default)]
pub struct InMemoryDefinitionsClient {
    venues: RwLock<Arc<VenueDatabase>>,
}

impl InMemoryDefinitionsClient {
    /// Create a client serving `venues`.
    #[must_use]
    pub fn new(venues: VenueDatabase) -> Self {
        Self {
            venues: RwLock::new(Arc::new(venues)),
        }
    }

    /// Create a client serving the given entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = VenueEntry>) -> Self {
        Self::new(entries.into_iter().collect())
    }

    /// Replace the venue database. Rules built earlier keep the old one.
    pub fn set_venue_database(&self, venues: VenueDatabase) {
        *self.venues.write() = Arc::new(venues);
    }
}

impl DefinitionsClient for InMemoryDefinitionsClient {
    fn load_venue_database(&self) -> Arc<VenueDatabase> {
        Arc::clone(&self.venues.read())
    }
}
