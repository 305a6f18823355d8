//! Bin id search used by the dashboard search box.

use crate::models::telemetry::TelemetryRecord;

/// Records whose decimal id contains `query`, in source order.
/// An empty (or blank) query matches everything.
pub fn filter<'a>(query: &str, source: &'a [TelemetryRecord]) -> Vec<&'a TelemetryRecord> {
    let needle = query.trim();
    source
        .iter()
        .filter(|r| needle.is_empty() || r.id.to_string().contains(needle))
        .collect()
}

/// Current search box content; recomputed against the full list on each edit.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    query: String,
}

impl SearchIndex {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn backspace(&mut self) {
        self.query.pop();
    }

    pub fn apply<'a>(&self, source: &'a [TelemetryRecord]) -> Vec<&'a TelemetryRecord> {
        filter(&self.query, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet(ids: &[u64]) -> Vec<TelemetryRecord> {
        ids.iter()
            .map(|id| TelemetryRecord::new(*id, format!("Bin {id}"), 0.1))
            .collect()
    }

    fn ids(records: &[&TelemetryRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn substring_match_not_numeric_containment() {
        let bins = fleet(&[1, 2, 12, 21, 120]);
        assert_eq!(ids(&filter("12", &bins)), vec![12, 120]);
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let bins = fleet(&[1, 2, 12, 21, 120]);
        assert_eq!(ids(&filter("", &bins)), vec![1, 2, 12, 21, 120]);
        assert_eq!(ids(&filter("  ", &bins)), vec![1, 2, 12, 21, 120]);
    }

    #[test]
    fn keystrokes_narrow_and_widen_the_result() {
        let bins = fleet(&[1, 2, 12, 21, 120]);
        let mut index = SearchIndex::default();

        index.push('2');
        assert_eq!(ids(&index.apply(&bins)), vec![2, 12, 21, 120]);
        index.push('1');
        assert_eq!(ids(&index.apply(&bins)), vec![21]);
        index.backspace();
        index.backspace();
        assert_eq!(index.apply(&bins).len(), 5);
        index.set_query("9");
        assert!(index.apply(&bins).is_empty());
    }
}
