//! locator-crawler - Store-locator grid scraper
//!
//! Every scan parameter comes from configuration (config.toml or LOCATOR_* env vars).

use anyhow::Result;
use clap::Parser;
use locator_crawler::commands::ScanCommand;
use locator_crawler::config::Config;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "locator-crawler",
    version,
    about = "Export the stores of a map store locator for a region",
    long_about = "Tiles the configured region into bounding boxes, queries the store locator for each one, \
                  and writes the stores in the configured countries to a CSV file.\n\n\
                  Configuration is read from $LOCATOR_CONFIG, ./config.toml or the XDG config directory, \
                  then overridden by LOCATOR_BASE_URL, LOCATOR_OUTPUT, LOCATOR_DELAY, LOCATOR_COUNTRIES \
                  and LOCATOR_PROXY. Set RUST_LOG=debug for request-level logging."
)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let explicit = std::env::var_os("LOCATOR_CONFIG").map(PathBuf::from);
    let config = Config::load(explicit.as_deref())?.with_env();

    let cmd = ScanCommand::new(config);
    let summary = cmd.execute().await?;
    println!("{}", summary);

    Ok(())
}
