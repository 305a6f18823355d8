//! Detail-view selection state.

use crate::core::fleet_store::FleetStore;
use crate::models::status::{BinStatus, as_percent};
use crate::models::telemetry::TelemetryRecord;
use serde::Serialize;

/// At most one selected bin, always present in the snapshot it was chosen from.
#[derive(Debug, Clone, Default)]
pub struct DetailSelection {
    selected: Option<u64>,
}

impl DetailSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` if it exists in `store`; otherwise the selection is unset.
    pub fn select(&mut self, id: u64, store: &FleetStore) -> bool {
        self.selected = store.contains(id).then_some(id);
        self.selected.is_some()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn current<'a>(&self, store: &'a FleetStore) -> Option<&'a TelemetryRecord> {
        self.selected.and_then(|id| store.by_id(id))
    }

    /// Drop the selection when its bin left the snapshot (e.g. after a reload).
    pub fn reconcile(&mut self, store: &FleetStore) {
        if let Some(id) = self.selected
            && !store.contains(id)
        {
            self.selected = None;
        }
    }
}

/// One point of the history chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub label: String,
    pub percent: f64,
}

/// Everything the detail screen shows for a bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: u64,
    pub name: String,
    pub fill_percent: f64,
    pub status: BinStatus,
    pub color: &'static str,
    pub weight_kg: f64,
    pub last_emptied: String,
    pub time_left: String,
    pub predicted_fill_time: String,
    pub location: String,
    pub history: Vec<HistoryPoint>,
}

impl DetailView {
    pub fn from_record(record: &TelemetryRecord) -> Self {
        let status = record.status();
        let location = match (&record.address, record.location) {
            (Some(addr), _) => addr.clone(),
            (None, Some(p)) => format!("{:.4}, {:.4}", p.latitude, p.longitude),
            (None, None) => "--".to_string(),
        };

        Self {
            id: record.id,
            name: record.name.clone(),
            fill_percent: record.fill_percent(),
            status,
            color: status.hex(),
            weight_kg: record.weight,
            last_emptied: record.last_collection_time.clone(),
            time_left: record.time_left.clone(),
            predicted_fill_time: record.predicted_fill_time.clone(),
            location,
            history: history_points(&record.history),
        }
    }
}

/// Labels run `D1..Dn-1` and the newest sample is `Today`.
fn history_points(samples: &[f64]) -> Vec<HistoryPoint> {
    let last = samples.len().saturating_sub(1);
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| HistoryPoint {
            label: if i == last {
                "Today".to_string()
            } else {
                format!("D{}", i + 1)
            },
            percent: as_percent(*s),
        })
        .collect()
}
