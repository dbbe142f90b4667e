//! locator-crawler - Store-locator grid scraper
//!
//! Tiles a region into bounding boxes, queries a map store locator for each
//! box, and writes the stores found in the target countries to CSV.

pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod geo;
pub mod locator;
pub mod reconcile;
pub mod sink;

pub use config::Config;
pub use error::LocatorError;
pub use geo::{BoundingBox, RegionSpec};
pub use locator::{Marker, StoreLocator};
