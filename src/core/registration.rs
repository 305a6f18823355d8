//! Account registration gated by the administrator roster.

use crate::errors::AuthError;
use crate::models::profile::{RosterEntry, UserProfile};
use crate::ports::{DocumentSource, IdentityProvider};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub employee_id: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct Registration {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentSource>,
    users_collection: String,
    roster_collection: String,
}

impl Registration {
    pub fn new(identity: Arc<dyn IdentityProvider>, documents: Arc<dyn DocumentSource>) -> Self {
        Self {
            identity,
            documents,
            users_collection: "users".to_string(),
            roster_collection: "all_users".to_string(),
        }
    }

    pub fn with_collections(
        mut self,
        users: impl Into<String>,
        roster: impl Into<String>,
    ) -> Self {
        self.users_collection = users.into();
        self.roster_collection = roster.into();
        self
    }

    /// Create the account and its profile. The role comes from the roster;
    /// emails missing from the roster cannot register.
    pub async fn register(&self, form: &RegistrationForm) -> Result<UserProfile, AuthError> {
        let email = form.email.trim();
        let employee_id = form.employee_id.trim();

        if email.is_empty()
            || employee_id.is_empty()
            || form.password.is_empty()
            || form.confirm_password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }

        if form.password != form.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let roster = self
            .documents
            .find_eq(&self.roster_collection, "email", email)
            .await?;

        let entry = roster
            .iter()
            .find_map(RosterEntry::from_document)
            .ok_or_else(|| AuthError::NotInRoster(email.to_string()))?;

        let taken = self
            .documents
            .find_eq(&self.users_collection, "employeeId", employee_id)
            .await?;
        if !taken.is_empty() {
            return Err(AuthError::EmployeeIdInUse(employee_id.to_string()));
        }

        let identity = self.identity.create_account(email, &form.password).await?;

        let profile = UserProfile {
            uid: identity.uid,
            email: entry.email,
            employee_id: employee_id.to_string(),
            role: entry.role,
            created_at: Utc::now().to_rfc3339(),
        };

        self.documents
            .put(&self.users_collection, &profile.to_document())
            .await?;

        info!(uid = %profile.uid, role = profile.role.as_str(), "account registered");
        Ok(profile)
    }
}
