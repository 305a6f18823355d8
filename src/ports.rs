//! Capabilities the fleet core needs from the outside world.
//!
//! The core only talks to these traits; `db` and `storage` provide local
//! implementations, and any backend exposing an equivalent document store
//! can be plugged in instead.

use crate::errors::{AuthError, FetchError, StorageError};
use crate::models::document::Document;
use async_trait::async_trait;

/// Key under which the serialized session lives in session storage.
pub const USER_SESSION_KEY: &str = "user";

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Every document of `collection`.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, FetchError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, FetchError>;

    /// Documents whose top-level `field` equals `value` (compared as text).
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, FetchError>;

    /// Insert or replace a document.
    async fn put(&self, collection: &str, document: &Document) -> Result<(), FetchError>;
}

/// Authenticated identity handed back by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}

/// Durable local key/value storage for the session blob.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, blob: &str) -> Result<(), StorageError>;

    /// Remove every key, not only the session one.
    async fn clear(&self) -> Result<(), StorageError>;
}
