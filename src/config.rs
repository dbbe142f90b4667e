//! Configuration management with TOML and environment variable overrides.

use crate::geo::RegionSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Locator host, e.g. https://brand.locally.com
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Pause after each bounding-box query in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output file path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Language of the CSV header row
    #[serde(default)]
    pub header_locale: HeaderLocale,

    /// Country codes to keep; empty keeps everything
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,

    /// Fixed parameters of the map search query
    #[serde(default)]
    pub query: QueryParams,

    /// Area to tile
    #[serde(default)]
    pub region: RegionSpec,
}

fn default_base_url() -> String {
    "https://helly-hansen.locally.com".to_string()
}

fn default_delay_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output() -> PathBuf {
    PathBuf::from("helly_hansen_stores.csv")
}

fn default_countries() -> Vec<String> {
    vec!["ES".to_string(), "PT".to_string(), "AD".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            proxy: None,
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            output: default_output(),
            format: OutputFormat::Csv,
            header_locale: HeaderLocale::Es,
            countries: default_countries(),
            query: QueryParams::default(),
            region: RegionSpec::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("locator-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("LOCATOR_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }

        if let Ok(output) = std::env::var("LOCATOR_OUTPUT") {
            if !output.is_empty() {
                self.output = PathBuf::from(output);
            }
        }

        if let Ok(delay) = std::env::var("LOCATOR_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(countries) = std::env::var("LOCATOR_COUNTRIES") {
            self.countries = countries
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }

        if let Ok(proxy) = std::env::var("LOCATOR_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Rejects configurations the scan cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.region.validate().context("Invalid region in configuration")?;

        if self.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        Ok(())
    }
}

/// Fixed parameters of the map search query that are not derived from the tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub company_id: String,
    pub category: String,
    pub lang: String,
    /// Search radius descriptor the map widget sends with every query
    pub map_distance_diag: String,
    pub zoom_level: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            company_id: "58".to_string(),
            category: "Sportswear or brandstore or outlet".to_string(),
            lang: "en-us".to_string(),
            map_distance_diag: "110.4776385381557".to_string(),
            zoom_level: "8.867423876504883".to_string(),
        }
    }
}

/// Output format for records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Language used for the human-readable column headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLocale {
    #[default]
    Es,
    En,
}
