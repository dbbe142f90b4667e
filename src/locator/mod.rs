//! Store-locator specific modules for HTTP client, markup parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{DetailTier, LocallyClient, StoreLocator};
pub use models::{Marker, MarkersResponse, StoreLinks};
pub use parser::extract_links;
