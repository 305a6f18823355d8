//! Session gate: who is signed in, where they land, what they may open.
//!
//! The gate owns the current `Session`. Persistence is touched by exactly
//! two transitions: a successful login (clear, then write) and logout
//! (clear).

use crate::errors::{AuthError, AuthorizationError};
use crate::models::profile::role_of;
use crate::models::role::Role;
use crate::models::screen::Screen;
use crate::models::session::Session;
use crate::ports::{DocumentSource, Identity, IdentityProvider, SessionStorage, USER_SESSION_KEY};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message shown to roles without a landing screen.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access. Please contact admin.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    Authenticating,
    Authenticated(Session),
    LoggedOut,
}

/// Where the user ends up after restore or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing {
    Screen(Screen),
    /// Terminal message instead of a route.
    Unauthorized(&'static str),
}

pub fn landing_for(role: Role) -> Landing {
    match role {
        Role::Admin => Landing::Screen(Screen::FleetDashboard),
        Role::Driver => Landing::Screen(Screen::DriverConsole),
        Role::Bmc => Landing::Unauthorized(UNAUTHORIZED_MESSAGE),
    }
}

/// Screens each role may open.
pub fn role_allows(role: Role, screen: Screen) -> bool {
    match (role, screen) {
        (_, Screen::Login) => true,
        (Role::Admin, Screen::FleetDashboard | Screen::BinDetail) => true,
        (Role::Driver, Screen::DriverConsole) => true,
        _ => false,
    }
}

pub struct SessionGate {
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentSource>,
    storage: Arc<dyn SessionStorage>,
    users_collection: String,
    state: GateState,
}

impl SessionGate {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentSource>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            identity,
            documents,
            storage,
            users_collection: "users".to_string(),
            state: GateState::Unauthenticated,
        }
    }

    pub fn with_users_collection(mut self, collection: impl Into<String>) -> Self {
        self.users_collection = collection.into();
        self
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            GateState::Authenticated(s) => Some(s),
            _ => None,
        }
    }

    fn transition(&mut self, next: GateState) {
        debug!(from = ?self.state, to = ?next, "session gate transition");
        self.state = next;
    }

    /// App start: route straight to the landing screen of a persisted
    /// admin/driver session, otherwise stay on the login screen.
    pub async fn restore(&mut self) -> Result<Landing, AuthError> {
        let blob = match self.storage.get(USER_SESSION_KEY).await {
            Ok(b) => b,
            Err(e) => {
                self.transition(GateState::Unauthenticated);
                return Err(e.into());
            }
        };

        match blob.as_deref().and_then(Session::from_blob) {
            Some(session) if session.role.has_landing() => {
                info!(uid = %session.uid, role = session.role.as_str(), "session restored");
                let landing = landing_for(session.role);
                self.transition(GateState::Authenticated(session));
                Ok(landing)
            }
            other => {
                if blob.is_some() {
                    debug!(parsed = other.is_some(), "persisted session not restorable");
                }
                self.transition(GateState::Unauthenticated);
                Ok(Landing::Screen(Screen::Login))
            }
        }
    }

    /// Submit credentials. `identifier` is an email, or an employee id when
    /// it contains no `@`.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<Landing, AuthError> {
        if matches!(self.state, GateState::Authenticated(_)) {
            return Err(AuthError::SessionActive);
        }

        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        self.transition(GateState::Authenticating);

        match self.authenticate(identifier, password).await {
            Ok(session) => {
                let landing = landing_for(session.role);
                info!(uid = %session.uid, role = session.role.as_str(), "login succeeded");
                self.transition(GateState::Authenticated(session));
                Ok(landing)
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                self.transition(GateState::Unauthenticated);
                Err(e)
            }
        }
    }

    async fn authenticate(&self, identifier: &str, password: &str) -> Result<Session, AuthError> {
        let email = self.resolve_login_handle(identifier).await?;
        let identity = self.identity.sign_in(&email, password).await?;

        match self.open_session(identity).await {
            Ok(session) => Ok(session),
            Err(e) => {
                // Signed in with the provider but no usable session here.
                if let Err(out) = self.identity.sign_out().await {
                    warn!(error = %out, "identity provider sign-out failed");
                }
                Err(e)
            }
        }
    }

    async fn open_session(&self, identity: Identity) -> Result<Session, AuthError> {
        let profile = self
            .documents
            .get(&self.users_collection, &identity.uid)
            .await?
            .ok_or_else(|| AuthError::ProfileMissing(identity.email.clone()))?;

        let session = Session::new(identity.uid, role_of(&profile));
        self.persist(&session).await?;
        Ok(session)
    }

    /// Employee ids are looked up in the user profiles to find the email.
    pub async fn resolve_login_handle(&self, identifier: &str) -> Result<String, AuthError> {
        if identifier.contains('@') {
            return Ok(identifier.to_string());
        }

        let matches = self
            .documents
            .find_eq(&self.users_collection, "employeeId", identifier)
            .await?;

        match matches.as_slice() {
            [doc] => doc
                .text("email")
                .ok_or_else(|| AuthError::UnknownIdentifier(identifier.to_string())),
            [] => Err(AuthError::UnknownIdentifier(identifier.to_string())),
            _ => Err(AuthError::AmbiguousIdentifier(identifier.to_string())),
        }
    }

    /// Full clear, then write: nothing from a previous account survives.
    async fn persist(&self, session: &Session) -> Result<(), AuthError> {
        let blob = session
            .to_blob()
            .map_err(|e| AuthError::Provider(format!("cannot serialize session: {e}")))?;

        self.storage.clear().await?;
        self.storage.set(USER_SESSION_KEY, &blob).await?;
        Ok(())
    }

    /// Clear persisted state, sign out of the provider, back to the login screen.
    ///
    /// If clearing storage fails the state is left untouched. A provider
    /// sign-out failure is returned after the gate reached `Unauthenticated`.
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        self.storage.clear().await?;
        self.transition(GateState::LoggedOut);

        let signed_out = self.identity.sign_out().await;
        if let Err(e) = &signed_out {
            warn!(error = %e, "identity provider sign-out failed");
        }

        self.transition(GateState::Unauthenticated);
        info!("logged out");
        signed_out
    }

    /// Role gate for a navigation attempt.
    pub fn authorize(&self, screen: Screen) -> Result<&Session, AuthorizationError> {
        let session = self.session().ok_or(AuthorizationError::NotAuthenticated)?;

        if role_allows(session.role, screen) {
            Ok(session)
        } else {
            Err(AuthorizationError::Forbidden {
                role: session.role,
                screen,
            })
        }
    }
}
