//! Reference data configuration.

use serde::{Deserialize, Serialize};

use crate::domain::reference_data::{VenueDatabase, VenueEntry};

/// Static reference data loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ReferenceDataConfig {
    /// Known venues with their country and IANA time zone.
    #[serde(default)]
    pub venues: Vec<VenueEntry>,
}

impl ReferenceDataConfig {
    /// The configured venues as a database.
    #[must_use]
    pub fn venue_database(&self) -> VenueDatabase {
        self.venues.iter().cloned().collect()
    }
}
