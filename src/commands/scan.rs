//! Scan command: walk the grid, admit, enrich and write every store.

use crate::config::Config;
use crate::filters::{Admission, FilterChainBuilder, Ledger};
use crate::locator::{DetailTier, LocallyClient, StoreLocator};
use crate::reconcile::Reconciler;
use crate::sink::{self, RecordSink};
use anyhow::{Context, Result};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters collected over one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub boxes: usize,
    pub failed_boxes: usize,
    pub markers: usize,
    pub duplicates: usize,
    pub filtered: usize,
    pub missing_id: usize,
    pub written: usize,
    pub from_store: usize,
    pub from_dealer: usize,
    pub unenriched: usize,
}

impl ScanSummary {
    fn record_admission(&mut self, admission: Admission) {
        match admission {
            Admission::Admitted => {}
            Admission::Duplicate => self.duplicates += 1,
            Admission::Filtered => self.filtered += 1,
            Admission::MissingId => self.missing_id += 1,
        }
    }

    fn record_source(&mut self, source: Option<DetailTier>) {
        match source {
            Some(DetailTier::Store) => self.from_store += 1,
            Some(DetailTier::Dealer) => self.from_dealer += 1,
            None => self.unenriched += 1,
        }
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} stores from {} boxes ({} failed). Markers: {} seen, {} duplicate, {} outside region, {} without id. Details: {} store, {} dealer, {} none.",
            self.written,
            self.boxes,
            self.failed_boxes,
            self.markers,
            self.duplicates,
            self.filtered,
            self.missing_id,
            self.from_store,
            self.from_dealer,
            self.unenriched
        )
    }
}

/// Executes a full scan of the configured region.
pub struct ScanCommand {
    config: Config,
}

impl ScanCommand {
    /// Creates a new scan command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the scan against the live locator and the configured output file.
    pub async fn execute(&self) -> Result<ScanSummary> {
        self.config.validate()?;

        let client = LocallyClient::new(&self.config).context("Failed to create HTTP client")?;
        let mut sink =
            sink::open(&self.config.output, self.config.format, self.config.header_locale)?;

        info!("Writing {} output to {}", self.config.format, self.config.output.display());
        self.execute_with(&client, sink.as_mut()).await
    }

    /// Runs the scan with a provided locator and sink (for testing).
    pub async fn execute_with(
        &self,
        locator: &impl StoreLocator,
        sink: &mut dyn RecordSink,
    ) -> Result<ScanSummary> {
        self.config.validate()?;

        let region = &self.config.region;
        let total = region.tile_count().unwrap_or_default();
        let filters = FilterChainBuilder::new().countries(&self.config.countries).build();

        if !filters.is_empty() {
            debug!("Active filters: {}", filters.descriptions().join(", "));
        }

        let mut ledger = Ledger::new(filters);
        let reconciler = Reconciler::new(locator);
        let mut summary = ScanSummary::default();

        info!("Scanning {} boxes", total);

        for (index, bbox) in region.tiles().enumerate() {
            summary.boxes += 1;

            let markers = match locator.search(&bbox).await {
                Ok(markers) => markers,
                Err(e) => {
                    warn!("Box {}/{} at {} failed: {}", index + 1, total, bbox, e);
                    summary.failed_boxes += 1;
                    self.pace().await;
                    continue;
                }
            };

            info!("Box {}/{} at {}: {} markers", index + 1, total, bbox, markers.len());

            for mut marker in markers {
                summary.markers += 1;

                let admission = ledger.check(&marker);
                summary.record_admission(admission);
                if !admission.is_admitted() {
                    debug!("Skipping marker {:?}: {:?}", marker.id(), admission);
                    continue;
                }

                let enrichment = reconciler.enrich(&mut marker).await;
                summary.record_source(enrichment.source);

                sink.write_record(&marker)?;
                summary.written += 1;
            }

            self.pace().await;
        }

        sink.finish()?;

        info!("{}", summary);
        Ok(summary)
    }

    /// Fixed pause after each box query.
    async fn pace(&self) {
        if self.config.delay_ms == 0 {
            return;
        }

        debug!("Delaying {}ms", self.config.delay_ms);
        tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
    }
}
