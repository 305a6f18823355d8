//! Document store on top of the `documents` table.
//!
//! Bodies are stored as JSON text. A body that is not valid JSON is handed
//! over as `null` so ingestion can drop it like any other malformed document.

use crate::db::pool::SharedPool;
use crate::errors::FetchError;
use crate::models::document::Document;
use crate::ports::DocumentSource;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, Row, params};
use serde_json::Value;

fn map_document(row: &Row) -> rusqlite::Result<Document> {
    let id: String = row.get(0)?;
    let body: String = row.get(1)?;
    Ok(Document::new(
        id,
        serde_json::from_str(&body).unwrap_or(Value::Null),
    ))
}

pub fn list_documents(conn: &Connection, collection: &str) -> rusqlite::Result<Vec<Document>> {
    let mut stmt = conn.prepare_cached(
        "SELECT doc_id, body FROM documents
         WHERE collection = ?1
         ORDER BY doc_id",
    )?;
    let rows = stmt.query_map([collection], map_document)?;
    rows.collect()
}

pub fn get_document(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> rusqlite::Result<Option<Document>> {
    let mut stmt = conn.prepare_cached(
        "SELECT doc_id, body FROM documents
         WHERE collection = ?1 AND doc_id = ?2",
    )?;
    let mut rows = stmt.query_map([collection, id], map_document)?;
    rows.next().transpose()
}

pub fn find_documents(
    conn: &Connection,
    collection: &str,
    field: &str,
    value: &str,
) -> rusqlite::Result<Vec<Document>> {
    let mut stmt = conn.prepare_cached(
        "SELECT doc_id, body FROM documents
         WHERE collection = ?1
           AND CASE WHEN json_valid(body)
                    THEN CAST(json_extract(body, '$.' || ?2) AS TEXT)
               END = ?3
         ORDER BY doc_id",
    )?;
    let rows = stmt.query_map([collection, field, value], map_document)?;
    rows.collect()
}

/// Insert or replace.
pub fn put_document(conn: &Connection, collection: &str, doc: &Document) -> rusqlite::Result<()> {
    let body = doc.body.to_string();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO documents (collection, doc_id, body, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(collection, doc_id)
         DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
        params![collection, doc.id, body, now],
    )?;
    Ok(())
}

pub fn count_documents(conn: &Connection, collection: &str) -> rusqlite::Result<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        [collection],
        |r| r.get(0),
    )?;
    Ok(n as usize)
}

/// `DocumentSource` backed by the local database.
#[derive(Clone)]
pub struct SqliteDocumentSource {
    pool: SharedPool,
}

impl SqliteDocumentSource {
    pub fn new(pool: SharedPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentSource for SqliteDocumentSource {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, FetchError> {
        let pool = self.pool.lock().await;
        Ok(list_documents(&pool.conn, collection)?)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, FetchError> {
        let pool = self.pool.lock().await;
        Ok(get_document(&pool.conn, collection, id)?)
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, FetchError> {
        let pool = self.pool.lock().await;
        Ok(find_documents(&pool.conn, collection, field, value)?)
    }

    async fn put(&self, collection: &str, document: &Document) -> Result<(), FetchError> {
        let pool = self.pool.lock().await;
        Ok(put_document(&pool.conn, collection, document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::run_pending_migrations;
    use serde_json::json;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn put_replaces_and_find_compares_as_text() {
        let conn = conn();
        put_document(&conn, "users", &Document::new("u1", json!({"employeeId": "E1"}))).unwrap();
        put_document(&conn, "users", &Document::new("u2", json!({"employeeId": 42}))).unwrap();
        put_document(&conn, "users", &Document::new("u1", json!({"employeeId": "E9"}))).unwrap();

        assert_eq!(count_documents(&conn, "users").unwrap(), 2);
        assert!(find_documents(&conn, "users", "employeeId", "E1").unwrap().is_empty());

        let hits = find_documents(&conn, "users", "employeeId", "42").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "u2");
    }

    #[test]
    fn invalid_json_body_becomes_null() {
        let conn = conn();
        conn.execute(
            "INSERT INTO documents (collection, doc_id, body, updated_at)
             VALUES ('bins', 'broken', '{not json', '')",
            [],
        )
        .unwrap();

        let docs = list_documents(&conn, "bins").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].body, Value::Null);
        assert!(find_documents(&conn, "bins", "id", "1").unwrap().is_empty());
        assert_eq!(get_document(&conn, "bins", "missing").unwrap(), None);
    }
}
