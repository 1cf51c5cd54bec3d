//! Venue reference data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::shared::{CountryCode, VenueCode};

/// Reference data for a single venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueEntry {
    /// Venue code (e.g., `XNAS`).
    pub code: VenueCode,
    /// Country the venue is registered in.
    pub country: CountryCode,
    /// IANA time zone name the venue trades in.
    pub time_zone: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

impl VenueEntry {
    /// Create a venue entry.
    #[must_use]
    pub fn new(
        code: impl Into<VenueCode>,
        country: impl Into<CountryCode>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            country: country.into(),
            time_zone: time_zone.into(),
            description: String::new(),
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Venue → country and time zone lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueDatabase {
    entries: BTreeMap<VenueCode, VenueEntry>,
}

impl VenueDatabase {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn add(&mut self, entry: VenueEntry) {
        self.entries.insert(entry.code.clone(), entry);
    }

    /// Look up a venue.
    #[must_use]
    pub fn from_code(&self, code: &VenueCode) -> Option<&VenueEntry> {
        self.entries.get(code)
    }

    /// Country a venue is registered in.
    #[must_use]
    pub fn country_of(&self, code: &VenueCode) -> Option<&CountryCode> {
        self.from_code(code).map(|entry| &entry.country)
    }

    /// Time zone name a venue trades in.
    #[must_use]
    pub fn time_zone_of(&self, code: &VenueCode) -> Option<&str> {
        self.from_code(code).map(|entry| entry.time_zone.as_str())
    }

    /// Every entry, ordered by venue code.
    pub fn entries(&self) -> impl Iterator<Item = &VenueEntry> {
        self.entries.values()
    }

    /// Number of venues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no venue is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VenueEntry> for VenueDatabase {
    fn from_iter<I: IntoIterator<Item = VenueEntry>>(iter: I) -> Self {
        let mut database = Self::new();
        for entry in iter {
            database.add(entry);
        }
        database
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_venue() {
        let database: VenueDatabase = [
            VenueEntry::new("XNAS", "US", "America/New_York"),
            VenueEntry::new("XTSE", "CA", "America/Toronto").with_description("Toronto"),
        ]
        .into_iter()
        .collect();

        assert_eq!(database.len(), 2);
        assert_eq!(
            database.country_of(&VenueCode::new("XTSE")),
            Some(&CountryCode::new("CA"))
        );
        assert_eq!(
            database.time_zone_of(&VenueCode::new("XNAS")),
            Some("America/New_York")
        );
        assert!(database.from_code(&VenueCode::new("XLON")).is_none());
    }
}
