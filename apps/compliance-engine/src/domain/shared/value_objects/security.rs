//! Security and ticker value objects.
//!
//! A `Security` names a listing (symbol on a venue) together with the country
//! that venue is registered in. Schema parameters reuse the type as a selector
//! by putting [`WILDCARD`] in the symbol and/or venue position.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CountryCode, VenueCode};

/// Wildcard marker used in selector securities.
pub const WILDCARD: &str = "*";

/// A tradeable listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Security {
    symbol: String,
    #[serde(default)]
    venue: VenueCode,
    #[serde(default)]
    country: CountryCode,
}

impl Security {
    /// Create a security listed on `venue`, which is registered in `country`.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        venue: impl Into<VenueCode>,
        country: impl Into<CountryCode>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            venue: venue.into(),
            country: country.into(),
        }
    }

    /// Selector matching every security.
    #[must_use]
    pub fn any() -> Self {
        Self::new(WILDCARD, WILDCARD, "")
    }

    /// Selector matching every security listed on `venue`.
    #[must_use]
    pub fn venue_wide(venue: impl Into<VenueCode>, country: impl Into<CountryCode>) -> Self {
        Self::new(WILDCARD, venue, country)
    }

    /// Selector matching every security registered in `country`.
    #[must_use]
    pub fn country_wide(country: impl Into<CountryCode>) -> Self {
        Self::new(WILDCARD, WILDCARD, country)
    }

    /// The listing symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The venue the security is listed on.
    #[must_use]
    pub const fn venue(&self) -> &VenueCode {
        &self.venue
    }

    /// The country the listing venue is registered in.
    #[must_use]
    pub const fn country(&self) -> &CountryCode {
        &self.country
    }

    /// Returns true if the symbol position holds the wildcard.
    #[must_use]
    pub fn has_wildcard_symbol(&self) -> bool {
        self.symbol == WILDCARD
    }

    /// Returns true if the venue position holds the wildcard (or is unset).
    #[must_use]
    pub fn has_wildcard_venue(&self) -> bool {
        self.venue.as_str() == WILDCARD || self.venue.is_empty()
    }

    /// The (symbol, venue) pair identifying this listing.
    #[must_use]
    pub fn ticker(&self) -> Ticker {
        Ticker::new(self.symbol.clone(), self.venue.clone())
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.venue.is_empty() {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{}.{}", self.symbol, self.venue)
        }
    }
}

/// A symbol on a venue, without country metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Ticker {
    symbol: String,
    venue: VenueCode,
}

impl Ticker {
    /// Create a new ticker.
    #[must_use]
    pub fn new(symbol: impl Into<String>, venue: impl Into<VenueCode>) -> Self {
        Self {
            symbol: symbol.into(),
            venue: venue.into(),
        }
    }

    /// The listing symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The venue the ticker trades on.
    #[must_use]
    pub const fn venue(&self) -> &VenueCode {
        &self.venue
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_display() {
        let security = Security::new("RY", "XTSE", "CA");
        assert_eq!(format!("{security}"), "RY.XTSE");
        assert_eq!(format!("{}", security.ticker()), "RY.XTSE");
    }

    #[test]
    fn selector_constructors() {
        assert!(Security::any().has_wildcard_symbol());
        assert!(Security::any().has_wildcard_venue());
        assert!(Security::country_wide("US").has_wildcard_venue());
        let venue = Security::venue_wide("XNAS", "US");
        assert!(venue.has_wildcard_symbol());
        assert!(!venue.has_wildcard_venue());
    }

    #[test]
    fn security_deserializes_with_defaults() {
        let security: Security = serde_json::from_str(r#"{"symbol":"*"}"#).unwrap();
        assert!(security.has_wildcard_symbol());
        assert!(security.country().is_empty());
    }
}
