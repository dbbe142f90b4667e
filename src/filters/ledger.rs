//! Seen-id ledger deciding which markers get processed.
//!
//! An id is recorded the first time it is sighted, before the filter chain
//! runs. A store rejected by the filter therefore stays rejected when an
//! overlapping tile returns it again, even if that later copy would pass.

use super::FilterChain;
use crate::locator::Marker;
use std::collections::HashSet;

/// Outcome of offering a marker to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting and the filters passed.
    Admitted,
    /// The id was sighted before.
    Duplicate,
    /// First sighting, rejected by the filters.
    Filtered,
    /// The marker carries no usable id.
    MissingId,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Tracks every id sighted during a scan.
pub struct Ledger {
    seen: HashSet<String>,
    filters: FilterChain,
}

impl Ledger {
    /// Creates an empty ledger applying `filters` on first sighting.
    pub fn new(filters: FilterChain) -> Self {
        Self { seen: HashSet::new(), filters }
    }

    /// Classifies a marker and records its id as seen.
    pub fn check(&mut self, marker: &Marker) -> Admission {
        let Some(id) = marker.id() else {
            return Admission::MissingId;
        };

        if !self.seen.insert(id) {
            return Admission::Duplicate;
        }

        if self.filters.matches(marker) {
            Admission::Admitted
        } else {
            Admission::Filtered
        }
    }

    /// Returns true if the marker should be enriched and written.
    pub fn admit(&mut self, marker: &Marker) -> bool {
        self.check(marker).is_admitted()
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Number of distinct ids sighted so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
