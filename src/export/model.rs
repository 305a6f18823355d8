use crate::models::telemetry::TelemetryRecord;
use serde::Serialize;

/// Flat row for CSV / JSON export.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BinExport {
    pub id: u64,
    pub name: String,
    pub fill_percent: f64,
    pub status: &'static str,
    pub weight_kg: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub last_collection_time: String,
    pub predicted_fill_time: String,
    pub time_left: String,
}

impl From<&TelemetryRecord> for BinExport {
    fn from(r: &TelemetryRecord) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            fill_percent: (r.fill_percent() * 10.0).round() / 10.0,
            status: r.status().as_str(),
            weight_kg: r.weight,
            latitude: r.location.map(|p| p.latitude),
            longitude: r.location.map(|p| p.longitude),
            address: r.address.clone(),
            last_collection_time: r.last_collection_time.clone(),
            predicted_fill_time: r.predicted_fill_time.clone(),
            time_left: r.time_left.clone(),
        }
    }
}
