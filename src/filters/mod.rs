//! Marker admission: composable filters and the dedup ledger.

pub mod country;
pub mod ledger;

use crate::locator::Marker;

pub use country::CountryFilter;
pub use ledger::{Admission, Ledger};

/// Trait for filtering markers.
pub trait Filter: Send + Sync {
    /// Returns true if the marker passes the filter.
    fn matches(&self, marker: &Marker) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a marker passes all filters.
    pub fn matches(&self, marker: &Marker) -> bool {
        self.filters.iter().all(|f| f.matches(marker))
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain from configuration.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Adds a country allow-list filter; an empty list adds nothing.
    pub fn countries(mut self, countries: &[String]) -> Self {
        if !countries.is_empty() {
            self.chain.add(CountryFilter::new(countries.iter().cloned()));
        }
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_marker(country: &str) -> Marker {
        serde_json::from_value(json!({"id": "1", "country": country})).unwrap()
    }

    struct NamedFilter(&'static str);

    impl Filter for NamedFilter {
        fn matches(&self, marker: &Marker) -> bool {
            marker.contains(self.0)
        }

        fn description(&self) -> String {
            format!("Has field {}", self.0)
        }
    }

    #[test]
    fn test_filter_chain_new() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_filter_chain_empty_matches_all() {
        let chain = FilterChain::default();
        assert!(chain.matches(&make_marker("FR")));
        assert!(chain.matches(&Marker::new()));
    }

    #[test]
    fn test_filter_chain_all_must_pass() {
        let mut chain = FilterChain::new();
        chain.add(CountryFilter::new(["ES".to_string()]));
        chain.add(NamedFilter("id"));

        assert_eq!(chain.len(), 2);
        assert!(chain.matches(&make_marker("ES")));
        assert!(!chain.matches(&make_marker("FR")));

        let no_id: Marker = serde_json::from_value(json!({"country": "ES"})).unwrap();
        assert!(!chain.matches(&no_id));
    }

    #[test]
    fn test_filter_chain_descriptions() {
        let mut chain = FilterChain::new();
        chain.add(CountryFilter::new(["ES".to_string(), "PT".to_string()]));
        chain.add(NamedFilter("phone"));

        let descriptions = chain.descriptions();
        assert_eq!(descriptions, vec!["Country in ES, PT", "Has field phone"]);
    }

    #[test]
    fn test_filter_chain_builder_countries() {
        let chain = FilterChainBuilder::new()
            .countries(&["ES".to_string(), "PT".to_string(), "AD".to_string()])
            .build();

        assert_eq!(chain.len(), 1);
        assert!(chain.matches(&make_marker("AD")));
        assert!(!chain.matches(&make_marker("FR")));
    }

    #[test]
    fn test_filter_chain_builder_no_filter_when_empty() {
        let chain = FilterChainBuilder::default().countries(&[]).build();
        assert!(chain.is_empty());
    }
}
