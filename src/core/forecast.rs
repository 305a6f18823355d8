//! Fill-rate forecast and collection priority.
//!
//! A lightweight stand-in for the offline forecasting models: the fill trend
//! of a bin is the least-squares slope of its history samples, and bins are
//! ranked 1-5 by how steep that slope is relative to the rest of the fleet.

use crate::models::telemetry::TelemetryRecord;
use serde::Serialize;

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;
/// Priority given to every bin when all slopes are equal.
pub const NEUTRAL_PRIORITY: u8 = 3;

/// Ordinary least-squares slope of `samples` against their index.
/// `None` with fewer than two samples.
pub fn fill_slope(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }

    let n = samples.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = samples.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in samples.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }

    Some(num / den)
}

/// Samples (history steps) left until the bin is full at the current trend.
pub fn samples_until_full(record: &TelemetryRecord) -> Option<f64> {
    let slope = fill_slope(&record.history)?;
    if slope <= 0.0 {
        return None;
    }
    Some((1.0 - record.fullness) / slope)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinPriority {
    pub id: u64,
    pub name: String,
    pub slope: f64,
    pub priority: u8,
}

/// Rank bins with a usable history; highest priority first, then by id.
pub fn collection_priorities(records: &[TelemetryRecord]) -> Vec<BinPriority> {
    let slopes: Vec<(&TelemetryRecord, f64)> = records
        .iter()
        .filter_map(|r| fill_slope(&r.history).map(|s| (r, s)))
        .collect();

    if slopes.is_empty() {
        return Vec::new();
    }

    let min = slopes.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let max = slopes
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let mut out: Vec<BinPriority> = slopes
        .into_iter()
        .map(|(record, slope)| BinPriority {
            id: record.id,
            name: record.name.clone(),
            slope,
            priority: priority_for(slope, min, range),
        })
        .collect();

    out.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
    out
}

fn priority_for(slope: f64, min: f64, range: f64) -> u8 {
    if range <= f64::EPSILON {
        return NEUTRAL_PRIORITY;
    }
    let normalized = (slope - min) / range;
    let raw = (normalized * 4.0 + 1.0).ceil();
    (raw as u8).clamp(MIN_PRIORITY, MAX_PRIORITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_a_straight_line() {
        let slope = fill_slope(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert!((slope - 0.1).abs() < 1e-12);
        assert_eq!(fill_slope(&[0.5]), None);
    }

    #[test]
    fn time_to_full_needs_a_rising_trend() {
        let rising = TelemetryRecord::new(1, "a", 0.6).with_history(vec![0.4, 0.5, 0.6]);
        let flat = TelemetryRecord::new(2, "b", 0.6).with_history(vec![0.6, 0.6, 0.6]);

        let steps = samples_until_full(&rising).unwrap();
        assert!((steps - 4.0).abs() < 1e-9);
        assert_eq!(samples_until_full(&flat), None);
    }

    #[test]
    fn priorities_span_one_to_five() {
        let bins = vec![
            TelemetryRecord::new(1, "slow", 0.2).with_history(vec![0.0, 0.0, 0.0]),
            TelemetryRecord::new(2, "fast", 1.0).with_history(vec![0.0, 0.5, 1.0]),
            TelemetryRecord::new(3, "mid", 0.5).with_history(vec![0.0, 0.25, 0.5]),
            TelemetryRecord::new(4, "no history", 0.5),
        ];

        let ranked = collection_priorities(&bins);
        let pairs: Vec<_> = ranked.iter().map(|p| (p.id, p.priority)).collect();
        assert_eq!(pairs, vec![(2, 5), (3, 3), (1, 1)]);
    }

    #[test]
    fn equal_slopes_get_the_neutral_priority() {
        let bins = vec![
            TelemetryRecord::new(7, "a", 0.25).with_history(vec![0.0, 0.25]),
            TelemetryRecord::new(3, "b", 0.75).with_history(vec![0.5, 0.75]),
        ];

        let ranked = collection_priorities(&bins);
        assert!(ranked.iter().all(|p| p.priority == NEUTRAL_PRIORITY));
        assert_eq!(ranked[0].id, 3);
    }
}
