use super::role::Role;
use serde::{Deserialize, Serialize};

/// The persisted record of the signed-in user.
///
/// Stored as a single JSON blob `{"uid": "...", "role": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub role: Role,
}

impl Session {
    pub fn new(uid: impl Into<String>, role: Role) -> Self {
        Self {
            uid: uid.into(),
            role,
        }
    }

    pub fn to_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a stored blob. Unknown roles and malformed blobs yield `None`.
    pub fn from_blob(blob: &str) -> Option<Self> {
        serde_json::from_str(blob).ok()
    }
}
