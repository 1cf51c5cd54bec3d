//! Scope: a containment set over countries, venues and tickers.
//!
//! Unlike [`Region`](super::Region), a scope does not carry country metadata
//! for its venues and tickers, so containment resolves venue → country
//! through a [`VenueDatabase`].

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign};

use super::VenueDatabase;
use crate::domain::shared::{CountryCode, Security, Ticker, VenueCode};

/// A set of markets and tickers.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    name: String,
    is_global: bool,
    countries: BTreeSet<CountryCode>,
    venues: BTreeSet<VenueCode>,
    tickers: BTreeSet<Ticker>,
}

impl Scope {
    /// The scope containing everything.
    #[must_use]
    pub fn global() -> Self {
        Self {
            is_global: true,
            ..Self::default()
        }
    }

    /// A scope consisting of one country.
    #[must_use]
    pub fn from_country(country: impl Into<CountryCode>) -> Self {
        let mut scope = Self::default();
        scope.countries.insert(country.into());
        scope
    }

    /// A scope consisting of one venue.
    #[must_use]
    pub fn from_venue(venue: impl Into<VenueCode>) -> Self {
        let mut scope = Self::default();
        scope.venues.insert(venue.into());
        scope
    }

    /// A scope consisting of one ticker.
    #[must_use]
    pub fn from_ticker(ticker: Ticker) -> Self {
        let mut scope = Self::default();
        scope.tickers.insert(ticker);
        scope
    }

    /// A scope decoded from a selector security, with the same wildcard
    /// rules as [`Region::from_security`](super::Region::from_security).
    #[must_use]
    pub fn from_security(security: &Security) -> Self {
        if !security.has_wildcard_symbol() {
            return Self::from_ticker(security.ticker());
        }
        if security.has_wildcard_venue() {
            if security.country().is_empty() {
                Self::global()
            } else {
                Self::from_country(security.country().clone())
            }
        } else {
            Self::from_venue(security.venue().clone())
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true iff this is the global scope.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.is_global
    }

    /// Returns true iff the scope is not global and lists nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_global
            && self.countries.is_empty()
            && self.venues.is_empty()
            && self.tickers.is_empty()
    }

    /// Returns true iff every member of this scope is covered by `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self, venues: &VenueDatabase) -> bool {
        if other.is_global {
            return true;
        }
        if self.is_global {
            return false;
        }
        let in_listed_country = |venue: &VenueCode| {
            venues
                .country_of(venue)
                .is_some_and(|country| other.countries.contains(country))
        };
        let tickers_covered = self.tickers.iter().all(|ticker| {
            other.tickers.contains(ticker)
                || other.venues.contains(ticker.venue())
                || in_listed_country(ticker.venue())
        });
        let venues_covered = self
            .venues
            .iter()
            .all(|venue| other.venues.contains(venue) || in_listed_country(venue));
        tickers_covered && venues_covered && self.countries.is_subset(&other.countries)
    }

    /// Returns true iff `ticker` lies in this scope.
    #[must_use]
    pub fn contains_ticker(&self, ticker: &Ticker, venues: &VenueDatabase) -> bool {
        Self::from_ticker(ticker.clone()).is_subset_of(self, venues)
    }
}

impl FromIterator<Security> for Scope {
    fn from_iter<I: IntoIterator<Item = Security>>(iter: I) -> Self {
        iter.into_iter()
            .map(|security| Self::from_security(&security))
            .fold(Self::default(), |scope, next| scope + next)
    }
}

impl AddAssign<&Self> for Scope {
    fn add_assign(&mut self, rhs: &Self) {
        if rhs.is_global {
            self.is_global = true;
            self.countries.clear();
            self.venues.clear();
            self.tickers.clear();
        } else if !self.is_global {
            self.countries.extend(rhs.countries.iter().cloned());
            self.venues.extend(rhs.venues.iter().cloned());
            self.tickers.extend(rhs.tickers.iter().cloned());
        }
    }
}

impl Add for Scope {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += &rhs;
        self
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.is_global == other.is_global
            && self.countries == other.countries
            && self.venues == other.venues
            && self.tickers == other.tickers
    }
}

impl Eq for Scope {}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reference_data::VenueEntry;

    fn venues() -> VenueDatabase {
        [
            VenueEntry::new("XNAS", "US", "America/New_York"),
            VenueEntry::new("XTSE", "CA", "America/Toronto"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn ticker_covered_by_country_through_database() {
        let venues = venues();
        let ticker = Ticker::new("AAPL", "XNAS");
        assert!(Scope::from_country("US").contains_ticker(&ticker, &venues));
        assert!(!Scope::from_country("CA").contains_ticker(&ticker, &venues));
        assert!(Scope::from_venue("XNAS").contains_ticker(&ticker, &venues));
        assert!(Scope::global().contains_ticker(&ticker, &venues));
    }

    #[test]
    fn unknown_venue_only_matches_directly() {
        let venues = venues();
        let ticker = Ticker::new("VOD", "XLON");
        assert!(!Scope::from_country("GB").contains_ticker(&ticker, &venues));
        assert!(Scope::from_ticker(ticker.clone()).contains_ticker(&ticker, &venues));
    }

    #[test]
    fn selectors_decode() {
        let scope: Scope = vec![
            Security::country_wide("CA"),
            Security::new("AAPL", "XNAS", "US"),
        ]
        .into_iter()
        .collect();
        let venues = venues();
        assert!(scope.contains_ticker(&Ticker::new("RY", "XTSE"), &venues));
        assert!(scope.contains_ticker(&Ticker::new("AAPL", "XNAS"), &venues));
        assert!(!scope.contains_ticker(&Ticker::new("MSFT", "XNAS"), &venues));
        assert!(!scope.is_empty());
        assert!(!Scope::global().is_empty());
    }
}
