//! Marker enrichment from the store and dealer catalogs.
//!
//! A store id usually exists in only one of the two catalogs, so a failed
//! store lookup is the normal path to the dealer lookup, not an error.

use crate::error::LocatorError;
use crate::locator::models::{AFFILIATE_FIELD, MAPS_URL_FIELD, WEBSITE_URL_FIELD};
use crate::locator::{extract_links, DetailTier, Marker, StoreLinks, StoreLocator};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, trace};

/// Result of trying a list of tiers in order.
#[derive(Debug)]
pub struct Fallback<T> {
    /// The tier that succeeded and its value, if any did.
    pub resolved: Option<(DetailTier, T)>,
    /// Every tier that was tried and failed, in order.
    pub failures: Vec<(DetailTier, LocatorError)>,
}

impl<T> Fallback<T> {
    pub fn tier(&self) -> Option<DetailTier> {
        self.resolved.as_ref().map(|(tier, _)| *tier)
    }

    /// Tiers that were actually attempted, in order.
    pub fn attempted(&self) -> Vec<DetailTier> {
        let mut tiers: Vec<DetailTier> = self.failures.iter().map(|(t, _)| *t).collect();
        tiers.extend(self.tier());
        tiers
    }
}

/// Tries each tier once, in order, stopping at the first success.
pub async fn first_success<T, F, Fut>(tiers: &[DetailTier], mut attempt: F) -> Fallback<T>
where
    F: FnMut(DetailTier) -> Fut,
    Fut: Future<Output = Result<T, LocatorError>>,
{
    let mut failures = Vec::new();

    for &tier in tiers {
        match attempt(tier).await {
            Ok(value) => return Fallback { resolved: Some((tier, value)), failures },
            Err(err) => {
                debug!("{} lookup failed: {}", tier, err);
                failures.push((tier, err));
            }
        }
    }

    Fallback { resolved: None, failures }
}

/// What enrichment did to one marker.
#[derive(Debug)]
pub struct Enrichment {
    /// Catalog the detail fields came from; `None` if both lookups failed.
    pub source: Option<DetailTier>,
    /// Number of fields the detail record added.
    pub fields_added: usize,
    pub failures: Vec<(DetailTier, LocatorError)>,
    pub links: StoreLinks,
}

/// Enriches admitted markers through a [`StoreLocator`].
pub struct Reconciler<'a, L: ?Sized> {
    locator: &'a L,
}

impl<'a, L: StoreLocator + ?Sized> Reconciler<'a, L> {
    pub fn new(locator: &'a L) -> Self {
        Self { locator }
    }

    /// Merges detail fields into the marker and sets the derived link fields.
    ///
    /// Never fails; a marker whose lookups all fail keeps its own fields.
    pub async fn enrich(&self, marker: &mut Marker) -> Enrichment {
        let id = marker.id().unwrap_or_default();

        let fallback =
            first_success(&DetailTier::ORDER, |tier| self.locator.detail(tier, &id)).await;

        let source = fallback.tier();
        let fields_added = match fallback.resolved {
            Some((tier, detail)) => {
                let added = marker.fill_missing(detail);
                trace!("Marker {}: {} fields from {} detail", id, added, tier);
                added
            }
            None => {
                debug!("Marker {}: no detail record, keeping search fields", id);
                0
            }
        };

        let links = finalize(marker);

        Enrichment { source, fields_added, failures: fallback.failures, links }
    }
}

/// Writes the link fields and pins the affiliate flag onto the marker.
///
/// The link fields replace whatever a detail record supplied; the affiliate
/// flag keeps its value and defaults to an empty string.
pub fn finalize(marker: &mut Marker) -> StoreLinks {
    let links = extract_links(marker.store_html());
    let affiliate = marker.get(AFFILIATE_FIELD).cloned().unwrap_or_else(|| Value::from(""));

    marker.set(WEBSITE_URL_FIELD, links.website_url.clone());
    marker.set(MAPS_URL_FIELD, links.maps_url.clone());
    marker.set(AFFILIATE_FIELD, affiliate);

    links
}
