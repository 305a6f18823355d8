use super::document::Document;
use super::role::Role;
use serde::Serialize;
use serde_json::json;

/// Profile document kept in the `users` collection, keyed by uid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub employee_id: String,
    pub role: Role,
    pub created_at: String,
}

impl UserProfile {
    pub fn to_document(&self) -> Document {
        Document::new(
            self.uid.clone(),
            json!({
                "uid": self.uid,
                "email": self.email,
                "employeeId": self.employee_id,
                "role": self.role.as_str(),
                "createdAt": self.created_at,
            }),
        )
    }
}

/// Role assigned to a profile document; missing role → `Bmc`.
pub fn role_of(doc: &Document) -> Role {
    Role::from_profile(doc.text("role").as_deref())
}

/// Entry of the registration roster (`all_users`).
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub email: String,
    pub role: Role,
}

impl RosterEntry {
    /// Roster entries must carry an email and a recognized role.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let email = doc.text("email")?;
        let role = Role::from_db_str(&doc.text("role")?.to_lowercase())?;
        Some(Self { email, role })
    }
}
