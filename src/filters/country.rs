//! Country allow-list filter.

use super::Filter;
use crate::locator::Marker;

/// Keeps markers whose country code is in the allow-list.
pub struct CountryFilter {
    allowed: Vec<String>,
}

impl CountryFilter {
    /// Creates a filter for the given country codes.
    pub fn new(countries: impl IntoIterator<Item = String>) -> Self {
        Self { allowed: countries.into_iter().collect() }
    }
}

impl Filter for CountryFilter {
    fn matches(&self, marker: &Marker) -> bool {
        marker.country().is_some_and(|country| self.allowed.iter().any(|a| a == country))
    }

    fn description(&self) -> String {
        format!("Country in {}", self.allowed.join(", "))
    }
}
