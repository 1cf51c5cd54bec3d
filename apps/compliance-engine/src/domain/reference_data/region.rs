//! Region: a containment set over countries, venues and securities.
//!
//! # Ordering
//!
//! `a <= b` holds when every member of `a` is covered by `b`:
//!
//! - a security is covered if `b` lists it, lists its venue, or lists its
//!   country
//! - a venue is covered if `b` lists it or lists its country
//! - a country is covered only if `b` lists it
//!
//! The global region covers everything and is covered only by itself.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::domain::shared::{CountryCode, Security, VenueCode};

/// A set of trading locations.
#[derive(Debug, Clone, Default)]
pub struct Region {
    name: String,
    is_global: bool,
    countries: BTreeSet<CountryCode>,
    venues: BTreeMap<VenueCode, CountryCode>,
    securities: BTreeSet<Security>,
}

impl Region {
    /// The region containing everything.
    #[must_use]
    pub fn global() -> Self {
        Self {
            is_global: true,
            ..Self::default()
        }
    }

    /// An empty named region.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A region consisting of one country.
    #[must_use]
    pub fn from_country(country: impl Into<CountryCode>) -> Self {
        let mut region = Self::default();
        region.countries.insert(country.into());
        region
    }

    /// A region consisting of one venue registered in `country`.
    #[must_use]
    pub fn from_venue(venue: impl Into<VenueCode>, country: impl Into<CountryCode>) -> Self {
        let mut region = Self::default();
        region.venues.insert(venue.into(), country.into());
        region
    }

    /// A region decoded from a selector security.
    ///
    /// A wildcard symbol with a wildcard or empty venue selects the security's
    /// country, or the global region when no country is given. A wildcard
    /// symbol on a concrete venue selects that venue. Anything else selects
    /// the single security.
    #[must_use]
    pub fn from_security(security: Security) -> Self {
        if !security.has_wildcard_symbol() {
            let mut region = Self::default();
            region.securities.insert(security);
            return region;
        }
        if security.has_wildcard_venue() {
            if security.country().is_empty() {
                Self::global()
            } else {
                Self::from_country(security.country().clone())
            }
        } else {
            Self::from_venue(security.venue().clone(), security.country().clone())
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

    /// Returns true iff this is the global region.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.is_global
    }

    /// Returns true iff the region is not global and lists nothing, so it
    /// contains no security.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_global
            && self.countries.is_empty()
            && self.venues.is_empty()
            && self.securities.is_empty()
    }

    /// Listed countries.
    #[must_use]
    pub const fn countries(&self) -> &BTreeSet<CountryCode> {
        &self.countries
    }

    /// Listed venues.
    pub fn venues(&self) -> impl Iterator<Item = &VenueCode> {
        self.venues.keys()
    }

    /// Listed securities.
    #[must_use]
    pub const fn securities(&self) -> &BTreeSet<Security> {
        &self.securities
    }

    /// Returns true iff `other` is a subset of this region.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.is_subset_of(self)
    }

    /// Returns true iff `security` lies in this region.
    #[must_use]
    pub fn contains_security(&self, security: &Security) -> bool {
        self.contains(&Self::from_security(security.clone()))
    }

    /// Returns true iff every member of this region is covered by `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        if other.is_global {
            return true;
        }
        if self.is_global {
            return false;
        }
        let securities_covered = self.securities.iter().all(|security| {
            other.securities.contains(security)
                || other.venues.contains_key(security.venue())
                || other.countries.contains(security.country())
        });
        if !securities_covered {
            return false;
        }
        let venues_covered = self.venues.iter().all(|(venue, country)| {
            other.venues.contains_key(venue) || other.countries.contains(country)
        });
        venues_covered && self.countries.is_subset(&other.countries)
    }

    /// Selector securities that decode back into this region.
    #[must_use]
    pub fn to_selectors(&self) -> Vec<Security> {
        if self.is_global {
            return vec![Security::any()];
        }
        self.countries
            .iter()
            .map(|country| Security::country_wide(country.clone()))
            .chain(
                self.venues
                    .iter()
                    .map(|(venue, country)| Security::venue_wide(venue.clone(), country.clone())),
            )
            .chain(self.securities.iter().cloned())
            .collect()
    }
}

impl FromIterator<Security> for Region {
    fn from_iter<I: IntoIterator<Item = Security>>(iter: I) -> Self {
        iter.into_iter()
            .map(Self::from_security)
            .fold(Self::default(), |region, next| region + next)
    }
}

impl AddAssign<&Self> for Region {
    fn add_assign(&mut self, rhs: &Self) {
        if rhs.is_global {
            self.is_global = true;
            self.countries.clear();
            self.venues.clear();
            self.securities.clear();
        } else if !self.is_global {
            self.countries.extend(rhs.countries.iter().cloned());
            self.venues
                .extend(rhs.venues.iter().map(|(v, c)| (v.clone(), c.clone())));
            self.securities.extend(rhs.securities.iter().cloned());
        }
    }
}

impl Add for Region {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += &rhs;
        self
    }
}

/// Equality ignores the name; venues compare by code.
impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.is_global == other.is_global
            && self.countries == other.countries
            && self.venues.keys().eq(other.venues.keys())
            && self.securities == other.securities
    }
}

impl Eq for Region {}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.is_subset_of(other) {
            Some(Ordering::Less)
        } else if other.is_subset_of(self) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global {
            write!(f, "GLOBAL")
        } else {
            write!(f, "{}", self.name)
        }
    }
}
