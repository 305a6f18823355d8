//! In-memory fleet snapshot.
//!
//! The snapshot is always sorted by ascending id and is replaced as a whole
//! by a successful load. A failed load never touches it.

use crate::core::ingest::{self, DroppedDocument};
use crate::errors::FetchError;
use crate::models::document::Document;
use crate::models::status::BinStatus;
use crate::models::telemetry::TelemetryRecord;
use crate::ports::DocumentSource;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Monotonic tag given to each issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ticket: LoadTicket,
    pub loaded: usize,
    pub dropped: Vec<DroppedDocument>,
}

impl LoadReport {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Applied(LoadReport),
    /// A newer load was issued before this one completed; result discarded.
    Superseded(LoadTicket),
}

impl LoadOutcome {
    pub fn report(&self) -> Option<&LoadReport> {
        match self {
            LoadOutcome::Applied(r) => Some(r),
            LoadOutcome::Superseded(_) => None,
        }
    }
}

/// Counts per status for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

#[derive(Debug)]
pub struct FleetStore {
    collection: String,
    records: Vec<TelemetryRecord>,
    issued: u64,
    applied: Option<LoadTicket>,
}

impl Default for FleetStore {
    fn default() -> Self {
        Self::new("bins")
    }
}

impl FleetStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            records: Vec::new(),
            issued: 0,
            applied: None,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Issue a new ticket; any earlier outstanding ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Ticket of the load that produced the current snapshot.
    pub fn snapshot_ticket(&self) -> Option<LoadTicket> {
        self.applied
    }

    /// Apply the result of a fetch started with `ticket`.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<Vec<Document>, FetchError>,
    ) -> Result<LoadOutcome, FetchError> {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding superseded load"
            );
            return Ok(LoadOutcome::Superseded(ticket));
        }

        let documents = match fetched {
            Ok(docs) => docs,
            Err(e) => {
                warn!(
                    collection = %self.collection,
                    kept = self.records.len(),
                    error = %e,
                    "load failed; keeping previous snapshot"
                );
                return Err(e);
            }
        };

        let batch = ingest::normalize_all(&documents);

        for dropped in &batch.dropped {
            debug!(doc_id = %dropped.doc_id, reason = %dropped.reason, "dropped bin document");
        }
        if !batch.dropped.is_empty() {
            warn!(
                collection = %self.collection,
                dropped = batch.dropped.len(),
                "some bin documents were malformed and skipped"
            );
        }

        let report = LoadReport {
            ticket,
            loaded: batch.records.len(),
            dropped: batch.dropped,
        };
        self.records = batch.records;
        self.applied = Some(ticket);

        info!(collection = %self.collection, bins = report.loaded, "fleet snapshot replaced");
        Ok(LoadOutcome::Applied(report))
    }

    /// Fetch the whole collection and replace the snapshot.
    pub async fn load(&mut self, source: &dyn DocumentSource) -> Result<LoadOutcome, FetchError> {
        let ticket = self.begin_load();
        let fetched = source.list(&self.collection).await;
        self.complete_load(ticket, fetched)
    }

    /// Same as [`FleetStore::load`] for a store shared with other tasks.
    /// The lock is not held while the fetch is in flight.
    pub async fn load_shared(
        store: &RwLock<FleetStore>,
        source: &dyn DocumentSource,
    ) -> Result<LoadOutcome, FetchError> {
        let (ticket, collection) = {
            let mut guard = store.write().await;
            (guard.begin_load(), guard.collection.clone())
        };

        let fetched = source.list(&collection).await;

        store.write().await.complete_load(ticket, fetched)
    }

    pub fn list(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_id(&self, id: u64) -> Option<&TelemetryRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn contains(&self, id: u64) -> bool {
        self.by_id(id).is_some()
    }

    pub fn filter_status(&self, status: BinStatus) -> Vec<&TelemetryRecord> {
        self.records
            .iter()
            .filter(|r| r.status() == status)
            .collect()
    }

    /// Records that can be plotted on a map.
    pub fn mappable(&self) -> impl Iterator<Item = &TelemetryRecord> {
        self.records.iter().filter(|r| r.is_mappable())
    }

    pub fn status_summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for record in &self.records {
            match record.status() {
                BinStatus::Low => summary.low += 1,
                BinStatus::Medium => summary.medium += 1,
                BinStatus::High => summary.high += 1,
            }
        }
        summary
    }

    /// Update one bin from a live reading. Unknown ids are ignored.
    pub fn apply_reading(&mut self, id: u64, fullness: f64, weight: f64) -> bool {
        match self.records.binary_search_by_key(&id, |r| r.id) {
            Ok(idx) => {
                self.records[idx].apply_reading(fullness, weight);
                true
            }
            Err(_) => false,
        }
    }
}
