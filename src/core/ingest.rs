//! Ingestion boundary: loosely typed bin documents → `TelemetryRecord`.
//!
//! Every document is validated on its own. A document that cannot become a
//! record is dropped with a reason; it never aborts the batch.

use crate::models::document::Document;
use crate::models::status::clamp_fullness;
use crate::models::telemetry::{GeoPoint, HISTORY_WINDOW, TelemetryRecord};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    NotAnObject,
    MissingId,
    InvalidId(String),
    DuplicateId(u64),
    MissingFullness,
    InvalidFullness(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NotAnObject => write!(f, "body is not an object"),
            DropReason::MissingId => write!(f, "missing id"),
            DropReason::InvalidId(raw) => write!(f, "invalid id '{raw}'"),
            DropReason::DuplicateId(id) => write!(f, "duplicate id {id}"),
            DropReason::MissingFullness => write!(f, "missing fullness"),
            DropReason::InvalidFullness(raw) => write!(f, "invalid fullness '{raw}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedDocument {
    pub doc_id: String,
    pub reason: DropReason,
}

/// Records accepted from one batch (sorted by id) plus what was dropped.
#[derive(Debug, Clone, Default)]
pub struct IngestBatch {
    pub records: Vec<TelemetryRecord>,
    pub dropped: Vec<DroppedDocument>,
}

/// Normalize a whole batch: validate, de-duplicate (first wins), sort by id.
pub fn normalize_all(documents: &[Document]) -> IngestBatch {
    let mut batch = IngestBatch::default();
    let mut seen = HashSet::new();

    for doc in documents {
        match normalize_document(doc) {
            Ok(record) if !seen.insert(record.id) => batch.dropped.push(DroppedDocument {
                doc_id: doc.id.clone(),
                reason: DropReason::DuplicateId(record.id),
            }),
            Ok(record) => batch.records.push(record),
            Err(reason) => batch.dropped.push(DroppedDocument {
                doc_id: doc.id.clone(),
                reason,
            }),
        }
    }

    batch.records.sort_by_key(|r| r.id);
    batch
}

pub fn normalize_document(doc: &Document) -> Result<TelemetryRecord, DropReason> {
    if doc.fields().is_none() {
        return Err(DropReason::NotAnObject);
    }

    let id = parse_id(doc)?;
    let fullness = parse_fullness(doc)?;

    let name = doc.text("name").unwrap_or_else(|| format!("Bin {id}"));
    let (location, address) = parse_location(doc);

    let mut record = TelemetryRecord::new(id, name, fullness);
    record.weight = doc
        .field("weight")
        .and_then(number)
        .filter(|w| w.is_finite())
        .map(|w| w.max(0.0))
        .unwrap_or(0.0);
    record.location = location;
    record.address = address;
    record.last_collection_time = doc
        .text("lastCollectionTime")
        .or_else(|| doc.text("lastEmptied"))
        .unwrap_or_default();
    record.predicted_fill_time = doc.text("predictedFillTime").unwrap_or_default();
    record.time_left = doc.text("timeLeft").unwrap_or_default();
    record.history = parse_history(doc.field("historyData"));

    Ok(record)
}

const MAX_EXACT_FLOAT_ID: f64 = 9_007_199_254_740_992.0;

/// Body `id` first, then the document key, both as non-negative integers.
fn parse_id(doc: &Document) -> Result<u64, DropReason> {
    let raw = match doc.field("id") {
        Some(v) => v.clone(),
        None if !doc.id.trim().is_empty() => Value::String(doc.id.clone()),
        None => return Err(DropReason::MissingId),
    };

    let exact = match &raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    // Integral floats such as `3.0` only below 2^53, where f64 is exact.
    let integral = || {
        number(&raw)
            .filter(|n| *n >= 0.0 && *n < MAX_EXACT_FLOAT_ID && n.fract() == 0.0)
            .map(|n| n as u64)
    };

    exact
        .or_else(integral)
        .ok_or_else(|| DropReason::InvalidId(raw.to_string()))
}

/// `fullness` is a ratio; `fillLevel` is a percentage. `fullness` wins.
fn parse_fullness(doc: &Document) -> Result<f64, DropReason> {
    let (raw, scale) = match (doc.field("fullness"), doc.field("fillLevel")) {
        (Some(v), _) => (v, 1.0),
        (None, Some(v)) => (v, 100.0),
        (None, None) => return Err(DropReason::MissingFullness),
    };

    match number(raw).filter(|n| !n.is_nan()) {
        Some(n) => Ok(clamp_fullness(n / scale)),
        None => Err(DropReason::InvalidFullness(raw.to_string())),
    }
}

/// Structured `location` object, or separate `latitude`/`longitude` fields.
/// A plain-string `location` is kept as an address label.
fn parse_location(doc: &Document) -> (Option<GeoPoint>, Option<String>) {
    let mut address = None;

    let nested = match doc.field("location") {
        Some(Value::Object(map)) => {
            let lat = map.get("latitude").and_then(number);
            let lon = map.get("longitude").and_then(number);
            lat.zip(lon).and_then(|(lat, lon)| GeoPoint::new(lat, lon))
        }
        Some(Value::String(s)) if !s.trim().is_empty() => {
            address = Some(s.trim().to_string());
            None
        }
        _ => None,
    };

    let point = nested.or_else(|| {
        let lat = doc.field("latitude").and_then(number)?;
        let lon = doc.field("longitude").and_then(number)?;
        GeoPoint::new(lat, lon)
    });

    (point, address)
}

/// History samples, oldest first, last `HISTORY_WINDOW` kept.
/// The series is read as percentages when any sample exceeds 1.
fn parse_history(raw: Option<&Value>) -> Vec<f64> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };

    let samples: Vec<f64> = items
        .iter()
        .filter_map(number)
        .filter(|n| n.is_finite())
        .collect();

    let scale = if samples.iter().any(|s| *s > 1.0) {
        100.0
    } else {
        1.0
    };

    let skip = samples.len().saturating_sub(HISTORY_WINDOW);
    samples
        .into_iter()
        .skip(skip)
        .map(|s| clamp_fullness(s / scale))
        .collect()
}

/// Numbers, or strings holding a number.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
