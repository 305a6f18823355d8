//! Local identity provider: email/password accounts with salted SHA-256 hashes.

use crate::db::pool::SharedPool;
use crate::errors::{AuthError, FetchError};
use crate::ports::{Identity, IdentityProvider};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use tracing::debug;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(&mut out, "{byte:02x}");
    }
    out
}

struct AccountRow {
    uid: String,
    email: String,
    salt: String,
    password_hash: String,
}

fn find_account(conn: &Connection, email: &str) -> rusqlite::Result<Option<AccountRow>> {
    conn.query_row(
        "SELECT uid, email, salt, password_hash FROM accounts WHERE email = ?1",
        [email],
        |row| {
            Ok(AccountRow {
                uid: row.get(0)?,
                email: row.get(1)?,
                salt: row.get(2)?,
                password_hash: row.get(3)?,
            })
        },
    )
    .optional()
}

fn storage_failure(e: rusqlite::Error) -> AuthError {
    AuthError::Fetch(FetchError::from(e))
}

pub struct SqliteIdentityProvider {
    pool: SharedPool,
}

impl SqliteIdentityProvider {
    pub fn new(pool: SharedPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for SqliteIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let pool = self.pool.lock().await;
        let account = find_account(&pool.conn, email.trim())
            .map_err(storage_failure)?
            .ok_or(AuthError::InvalidCredentials)?;

        if hash_password(&account.salt, password) != account.password_hash {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Identity {
            uid: account.uid,
            email: account.email,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        debug!("local identity provider keeps no sign-in state");
        Ok(())
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let pool = self.pool.lock().await;
        let identity = insert_account(&pool.conn, email, password)?;
        debug!(uid = %identity.uid, "account created");
        Ok(identity)
    }
}

/// Create an account row. Shared by the provider and the seed importer.
pub fn insert_account(conn: &Connection, email: &str, password: &str) -> Result<Identity, AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
    }

    let email = email.trim();
    if find_account(conn, email).map_err(storage_failure)?.is_some() {
        return Err(AuthError::EmailInUse(email.to_string()));
    }

    let uid = Uuid::new_v4().simple().to_string();
    let salt = Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, password);

    conn.execute(
        "INSERT INTO accounts (uid, email, salt, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![uid, email, salt, hash, Utc::now().to_rfc3339()],
    )
    .map_err(storage_failure)?;

    Ok(Identity {
        uid,
        email: email.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::run_pending_migrations;
    use crate::db::pool::DbPool;

    fn provider() -> SqliteIdentityProvider {
        let pool = DbPool::in_memory().unwrap();
        run_pending_migrations(&pool.conn).unwrap();
        SqliteIdentityProvider::new(pool.into_shared())
    }

    #[test]
    fn hash_is_hex_and_salted() {
        let a = hash_password("s1", "secret");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_password("s2", "secret"));
    }

    #[tokio::test]
    async fn create_then_sign_in() {
        let idp = provider();
        let created = idp.create_account("ann@example.com", "secret1").await.unwrap();

        let signed = idp.sign_in("ann@example.com", "secret1").await.unwrap();
        assert_eq!(signed, created);

        assert!(matches!(
            idp.sign_in("ann@example.com", "wrong!!").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            idp.sign_in("nobody@example.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn rejects_weak_and_duplicate() {
        let idp = provider();
        assert!(matches!(
            idp.create_account("a@x.io", "12345").await,
            Err(AuthError::WeakPassword(MIN_PASSWORD_LEN))
        ));

        idp.create_account("a@x.io", "123456").await.unwrap();
        assert!(matches!(
            idp.create_account("A@x.io", "abcdef").await,
            Err(AuthError::EmailInUse(_))
        ));
    }
}
