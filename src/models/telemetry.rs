use super::status::{BinStatus, as_percent, clamp_fullness};
use serde::Serialize;

/// Number of history samples kept per bin (oldest first).
pub const HISTORY_WINDOW: usize = 7;

/// Geographic position in numeric degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// Canonical state of one bin after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub id: u64,
    pub name: String,
    pub fullness: f64,               // ratio in [0, 1]
    pub weight: f64,                 // kg, >= 0
    pub location: Option<GeoPoint>,  // None → list only, never plotted
    pub address: Option<String>,     // free-text location label
    pub last_collection_time: String,
    pub predicted_fill_time: String,
    pub time_left: String,
    pub history: Vec<f64>,           // ratios, oldest first
}

impl TelemetryRecord {
    /// Minimal record; optional fields start empty.
    pub fn new(id: u64, name: impl Into<String>, fullness: f64) -> Self {
        Self {
            id,
            name: name.into(),
            fullness: clamp_fullness(fullness),
            weight: 0.0,
            location: None,
            address: None,
            last_collection_time: String::new(),
            predicted_fill_time: String::new(),
            time_left: String::new(),
            history: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    pub fn with_history(mut self, history: Vec<f64>) -> Self {
        let skip = history.len().saturating_sub(HISTORY_WINDOW);
        self.history = history.into_iter().skip(skip).map(clamp_fullness).collect();
        self
    }

    pub fn status(&self) -> BinStatus {
        BinStatus::classify(self.fullness)
    }

    pub fn fill_percent(&self) -> f64 {
        as_percent(self.fullness)
    }

    pub fn is_mappable(&self) -> bool {
        self.location.is_some()
    }

    /// Apply a live reading; values are clamped into their domains.
    pub fn apply_reading(&mut self, fullness: f64, weight: f64) {
        self.fullness = clamp_fullness(fullness);
        if weight.is_finite() {
            self.weight = weight.max(0.0);
        }
    }
}
