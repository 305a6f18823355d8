//! Bulk import of fixture documents.
//!
//! Seed file layout:
//! ```json
//! { "bins": [ {...} ], "users": [ {...} ], "all_users": [ {...} ] }
//! ```
//! A user entry carrying a `password` also gets a local account; the
//! password itself is never stored in the profile document.

use crate::db::accounts::insert_account;
use crate::db::documents::put_document;
use crate::errors::{AppError, AppResult};
use crate::models::document::Document;
use rusqlite::Connection;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Target collection for each section of the seed file.
#[derive(Debug, Clone)]
pub struct SeedCollections {
    pub bins: String,
    pub users: String,
    pub roster: String,
}

impl Default for SeedCollections {
    fn default() -> Self {
        Self {
            bins: "bins".to_string(),
            users: "users".to_string(),
            roster: "all_users".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub bins: usize,
    pub users: usize,
    pub roster: usize,
    pub accounts: usize,
}

fn section<'a>(root: &'a Map<String, Value>, key: &str) -> AppResult<&'a [Value]> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(AppError::InvalidSeed(format!("'{key}' must be an array"))),
    }
}

/// First usable key among `candidates`, else a fresh uuid.
fn document_id(body: &Value, candidates: &[&str]) -> String {
    candidates
        .iter()
        .find_map(|key| match body.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

pub fn import_seed(
    conn: &Connection,
    content: &str,
    collections: &SeedCollections,
) -> AppResult<SeedReport> {
    let root: Value =
        serde_json::from_str(content).map_err(|e| AppError::InvalidSeed(e.to_string()))?;
    let root = root
        .as_object()
        .ok_or_else(|| AppError::InvalidSeed("top level must be an object".to_string()))?;

    let bins = section(root, "bins")?;
    let users = section(root, "users")?;
    let roster = section(root, "all_users")?;

    let tx = conn.unchecked_transaction()?;
    let mut report = SeedReport::default();

    for body in bins {
        let id = document_id(body, &["_id", "id"]);
        put_document(&tx, &collections.bins, &Document::new(id, body.clone()))?;
        report.bins += 1;
    }

    for body in roster {
        let id = document_id(body, &["_id", "email"]);
        put_document(&tx, &collections.roster, &Document::new(id, body.clone()))?;
        report.roster += 1;
    }

    for body in users {
        let mut body = body.clone();
        let password = body
            .as_object_mut()
            .and_then(|obj| obj.remove("password"))
            .and_then(|p| p.as_str().map(str::to_string));

        let email = body.get("email").and_then(Value::as_str).map(str::to_string);

        let id = match (password, email) {
            (Some(password), Some(email)) => {
                let identity = insert_account(&tx, &email, &password)?;
                report.accounts += 1;
                if let Some(obj) = body.as_object_mut() {
                    obj.insert("uid".to_string(), Value::String(identity.uid.clone()));
                }
                identity.uid
            }
            _ => document_id(&body, &["_id", "uid"]),
        };

        put_document(&tx, &collections.users, &Document::new(id, body))?;
        report.users += 1;
    }

    tx.commit()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::documents::{count_documents, find_documents};
    use crate::db::migrate::run_pending_migrations;

    #[test]
    fn imports_all_sections_and_strips_passwords() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();

        let seed = r#"{
            "bins": [{"id": 1, "fullness": 0.2}, {"_id": "b2", "id": 2, "fullness": 0.9}],
            "users": [{"email": "ann@example.com", "employeeId": "E100", "role": "admin", "password": "secret1"}],
            "all_users": [{"email": "bob@example.com", "role": "driver"}]
        }"#;

        let report = import_seed(&conn, seed, &SeedCollections::default()).unwrap();
        assert_eq!(
            report,
            SeedReport {
                bins: 2,
                users: 1,
                roster: 1,
                accounts: 1
            }
        );
        assert_eq!(count_documents(&conn, "bins").unwrap(), 2);

        let users = find_documents(&conn, "users", "employeeId", "E100").unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].field("password").is_none());
        assert_eq!(users[0].text("uid").as_deref(), Some(users[0].id.as_str()));
    }

    #[test]
    fn rejects_non_array_sections() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();

        let err = import_seed(&conn, r#"{"bins": {}}"#, &SeedCollections::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidSeed(_)));
    }
}
