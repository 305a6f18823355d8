use async_trait::async_trait;
use envirosage::core::fleet_store::{FleetStore, LoadOutcome};
use envirosage::core::ingest::DropReason;
use envirosage::core::search::filter;
use envirosage::core::selection::DetailSelection;
use envirosage::db::initialize::init_db;
use envirosage::db::pool::DbPool;
use envirosage::db::SqliteDocumentSource;
use envirosage::errors::FetchError;
use envirosage::models::document::Document;
use envirosage::models::status::BinStatus;
use envirosage::ports::DocumentSource;
use serde_json::json;
use std::sync::Mutex;
use tokio::sync::RwLock;

async fn sqlite_source(bodies: Vec<serde_json::Value>) -> SqliteDocumentSource {
    let pool = DbPool::in_memory().unwrap();
    init_db(&pool.conn).unwrap();
    let source = SqliteDocumentSource::new(pool.into_shared());

    for (i, body) in bodies.into_iter().enumerate() {
        source
            .put("bins", &Document::new(format!("doc{i}"), body))
            .await
            .unwrap();
    }
    source
}

/// Serves a fixed result, then fails once switched off.
struct ScriptedSource {
    docs: Vec<Document>,
    up: Mutex<bool>,
}

#[async_trait]
impl DocumentSource for ScriptedSource {
    async fn list(&self, _collection: &str) -> Result<Vec<Document>, FetchError> {
        if *self.up.lock().unwrap() {
            Ok(self.docs.clone())
        } else {
            Err(FetchError::Unavailable("network down".into()))
        }
    }

    async fn get(&self, _c: &str, _id: &str) -> Result<Option<Document>, FetchError> {
        Ok(None)
    }

    async fn find_eq(&self, _c: &str, _f: &str, _v: &str) -> Result<Vec<Document>, FetchError> {
        Ok(Vec::new())
    }

    async fn put(&self, _c: &str, _d: &Document) -> Result<(), FetchError> {
        Ok(())
    }
}

#[tokio::test]
async fn load_sorts_and_drops_malformed_documents() {
    let source = sqlite_source(vec![
        json!({"id": 120, "fullness": 0.9}),
        json!({"id": 1, "fullness": 0.1}),
        json!({"id": 21, "fillLevel": 50}),
        json!({"id": 12, "fullness": 0.4}),
        json!({"id": 2, "name": "no fullness"}),
        json!({"id": 1, "fullness": 0.99}),
    ])
    .await;

    let mut store = FleetStore::default();
    let outcome = store.load(&source).await.unwrap();
    let report = outcome.report().unwrap();

    let ids: Vec<u64> = store.list().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 12, 21, 120]);
    assert_eq!(report.loaded, 4);
    assert_eq!(report.dropped_count(), 2);
    assert!(
        report
            .dropped
            .iter()
            .any(|d| d.reason == DropReason::MissingFullness)
    );
    assert!(
        report
            .dropped
            .iter()
            .any(|d| d.reason == DropReason::DuplicateId(1))
    );

    assert_eq!(store.by_id(21).unwrap().status(), BinStatus::Medium);
    assert!(store.by_id(7).is_none());

    let summary = store.status_summary();
    assert_eq!((summary.low, summary.medium, summary.high), (1, 2, 1));
}

#[tokio::test]
async fn failed_load_keeps_previous_snapshot() {
    let source = ScriptedSource {
        docs: vec![
            Document::new("a", json!({"id": 5, "fullness": 0.5})),
            Document::new("b", json!({"id": 3, "fullness": 0.8})),
        ],
        up: Mutex::new(true),
    };

    let mut store = FleetStore::default();
    store.load(&source).await.unwrap();
    assert_eq!(store.len(), 2);

    *source.up.lock().unwrap() = false;
    let err = store.load(&source).await.unwrap_err();
    assert!(err.is_retriable());

    let ids: Vec<u64> = store.list().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 5]);
}

#[test]
fn stale_completion_is_discarded() {
    let mut store = FleetStore::default();

    let first = store.begin_load();
    let second = store.begin_load();

    let late = store
        .complete_load(
            first,
            Ok(vec![Document::new("x", json!({"id": 99, "fullness": 0.1}))]),
        )
        .unwrap();
    assert!(matches!(late, LoadOutcome::Superseded(t) if t == first));
    assert!(store.is_empty());

    let stale_error = store.complete_load(first, Err(FetchError::Unavailable("late".into())));
    assert!(matches!(stale_error, Ok(LoadOutcome::Superseded(_))));

    let current = store
        .complete_load(
            second,
            Ok(vec![Document::new("y", json!({"id": 4, "fullness": 0.75}))]),
        )
        .unwrap();
    assert!(matches!(current, LoadOutcome::Applied(_)));
    assert_eq!(store.list()[0].id, 4);
}

#[tokio::test]
async fn search_and_selection_follow_the_snapshot() {
    let source = sqlite_source(
        [1u64, 2, 12, 21, 120]
            .iter()
            .map(|id| json!({"id": id, "fullness": 0.3}))
            .collect(),
    )
    .await;

    let mut store = FleetStore::default();
    store.load(&source).await.unwrap();

    let hits: Vec<u64> = filter("12", store.list()).iter().map(|r| r.id).collect();
    assert_eq!(hits, vec![12, 120]);
    assert_eq!(filter("", store.list()).len(), 5);
    assert!(filter("7", store.list()).is_empty());

    let mut selection = DetailSelection::new();
    assert!(selection.select(21, &store));
    assert_eq!(selection.current(&store).map(|r| r.id), Some(21));

    assert!(!selection.select(404, &store));
    assert_eq!(selection.selected_id(), None);
}

#[tokio::test]
async fn mappable_excludes_bins_without_coordinates() {
    let source = sqlite_source(vec![
        json!({"id": 1, "fullness": 0.1, "location": {"latitude": 45.0, "longitude": 9.0}}),
        json!({"id": 2, "fullness": 0.1, "latitude": "45.1", "longitude": "9.1"}),
        json!({"id": 3, "fullness": 0.1, "location": "Depot"}),
        json!({"id": 4, "fullness": 0.1, "latitude": 123.0, "longitude": 9.0}),
    ])
    .await;

    let mut store = FleetStore::default();
    store.load(&source).await.unwrap();

    let mapped: Vec<u64> = store.mappable().map(|r| r.id).collect();
    assert_eq!(mapped, vec![1, 2]);
    assert_eq!(store.by_id(3).unwrap().address.as_deref(), Some("Depot"));
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn shared_reload_drops_selection_of_removed_bins() {
    let before = ScriptedSource {
        docs: vec![
            Document::new("a", json!({"id": 5, "fullness": 0.5})),
            Document::new("b", json!({"id": 3, "fullness": 0.8})),
        ],
        up: Mutex::new(true),
    };
    let after = ScriptedSource {
        docs: vec![Document::new("b", json!({"id": 3, "fullness": 0.85}))],
        up: Mutex::new(true),
    };

    let store = RwLock::new(FleetStore::default());
    FleetStore::load_shared(&store, &before).await.unwrap();

    let mut selection = DetailSelection::new();
    assert!(selection.select(5, &*store.read().await));
    assert_eq!(store.read().await.filter_status(BinStatus::High).len(), 1);

    let outcome = FleetStore::load_shared(&store, &after).await.unwrap();
    assert!(matches!(outcome, LoadOutcome::Applied(_)));

    let guard = store.read().await;
    selection.reconcile(&guard);
    assert_eq!(selection.selected_id(), None);
    assert!(guard.filter_status(BinStatus::Medium).is_empty());
    assert_eq!(guard.filter_status(BinStatus::High)[0].id, 3);
}
