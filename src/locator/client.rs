//! HTTP client for the store-locator API using wreq for browser emulation.

use crate::config::{Config, QueryParams};
use crate::error::LocatorError;
use crate::geo::BoundingBox;
use crate::locator::models::{Marker, MarkersResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

/// The two detail catalogs, in the order they are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailTier {
    /// Brand-operated and retail stores.
    Store,
    /// Independent dealers.
    Dealer,
}

impl DetailTier {
    /// Precedence used when enriching a marker.
    pub const ORDER: [DetailTier; 2] = [DetailTier::Store, DetailTier::Dealer];

    /// Path segment of the detail endpoint.
    pub fn path_segment(&self) -> &'static str {
        match self {
            DetailTier::Store => "store",
            DetailTier::Dealer => "dealer",
        }
    }
}

impl fmt::Display for DetailTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Trait for locator queries - enables mocking for tests.
#[async_trait]
pub trait StoreLocator: Send + Sync {
    /// Returns the markers inside one bounding box.
    async fn search(&self, bbox: &BoundingBox) -> Result<Vec<Marker>, LocatorError>;

    /// Fetches the detail record for a store id from one catalog.
    async fn detail(&self, tier: DetailTier, id: &str) -> Result<Map<String, Value>, LocatorError>;
}

/// Locator HTTP client.
pub struct LocallyClient {
    client: Client,
    base_url: String,
    query: QueryParams,
}

impl LocallyClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            query: config.query.clone(),
        })
    }

    /// Builds the map search URL for one bounding box.
    pub fn search_url(&self, bbox: &BoundingBox) -> String {
        let q = &self.query;
        let params: [(&str, String); 19] = [
            ("has_data", "true".to_string()),
            ("company_id", q.company_id.clone()),
            ("category", q.category.clone()),
            ("inline", "1".to_string()),
            ("map_ne_lat", bbox.ne_lat.to_string()),
            ("map_ne_lng", bbox.ne_lng.to_string()),
            ("map_sw_lat", bbox.sw_lat.to_string()),
            ("map_sw_lng", bbox.sw_lng.to_string()),
            ("map_center_lat", bbox.center_lat.to_string()),
            ("map_center_lng", bbox.center_lng.to_string()),
            ("map_distance_diag", q.map_distance_diag.clone()),
            ("sort_by", "proximity".to_string()),
            ("no_variants", "0".to_string()),
            ("dealers_company_id", q.company_id.clone()),
            ("only_store_id", "false".to_string()),
            ("uses_alt_coords", "false".to_string()),
            ("q", "false".to_string()),
            ("zoom_level", q.zoom_level.clone()),
            ("lang", q.lang.clone()),
        ];

        format!("{}/stores/conversion_data?{}", self.base_url, encode_query(&params))
    }

    /// Builds the detail URL for a store id in one catalog.
    pub fn detail_url(&self, tier: DetailTier, id: &str) -> String {
        let params = [
            ("company_id", self.query.company_id.clone()),
            ("only_retailer_id", String::new()),
            ("service", "store-locator".to_string()),
            ("lang", self.query.lang.clone()),
        ];

        format!(
            "{}/conversion/location/{}/{}?{}",
            self.base_url,
            tier.path_segment(),
            urlencoding::encode(id),
            encode_query(&params)
        )
    }

    /// Performs a GET request and parses the JSON body.
    async fn get_json(&self, url: &str) -> Result<Value, LocatorError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(LocatorError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl StoreLocator for LocallyClient {
    async fn search(&self, bbox: &BoundingBox) -> Result<Vec<Marker>, LocatorError> {
        let url = self.search_url(bbox);
        let body = self.get_json(&url).await?;
        let response: MarkersResponse = serde_json::from_value(body)?;

        debug!("Box {} returned {} markers", bbox, response.markers.len());
        Ok(response.markers)
    }

    async fn detail(&self, tier: DetailTier, id: &str) -> Result<Map<String, Value>, LocatorError> {
        let url = self.detail_url(tier, id);

        match self.get_json(&url).await? {
            Value::Object(fields) => Ok(fields),
            other => Err(LocatorError::Parse(format!(
                "{} detail for {} is not an object: {}",
                tier, id, other
            ))),
        }
    }
}
