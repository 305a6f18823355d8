//! Unified application error types.
//! The fleet core distinguishes three failure classes (fetch, authentication,
//! authorization); adapters and the CLI fold everything into AppError.

use crate::models::role::Role;
use crate::models::screen::Screen;
use std::io;
use thiserror::Error;

/// Document source unreachable or returning an unusable payload.
/// Always retriable by issuing a new load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Document source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed payload in collection '{collection}': {reason}")]
    Malformed { collection: String, reason: String },
}

impl FetchError {
    pub fn is_retriable(&self) -> bool {
        true
    }
}

impl From<rusqlite::Error> for FetchError {
    fn from(e: rusqlite::Error) -> Self {
        FetchError::Unavailable(e.to_string())
    }
}

/// Durable session storage failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Session storage is corrupted: {0}")]
    Corrupted(String),
}

/// Login / registration failures. Surfaced to the user as a message.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("No account found with this Employee ID: {0}")]
    UnknownIdentifier(String),

    #[error("Login failed. Check your credentials and try again.")]
    InvalidCredentials,

    #[error("No user data found for {0}. Please contact support.")]
    ProfileMissing(String),

    #[error("Email not found in the system: {0}. Contact admin.")]
    NotInRoster(String),

    #[error("An account already exists for {0}")]
    EmailInUse(String),

    #[error("Employee ID {0} is already registered. Contact admin.")]
    EmployeeIdInUse(String),

    #[error("Employee ID {0} matches more than one account. Log in with your email.")]
    AmbiguousIdentifier(String),

    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),

    #[error("A session is already active; log out first")]
    SessionActive,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A valid (or missing) session asking for a screen its role may not reach.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Not logged in. Run `envirosage login` first.")]
    NotAuthenticated,

    #[error("Unauthorized access. Please contact admin. (role '{}' cannot open {})", role.as_str(), screen.label())]
    Forbidden { role: Role, screen: Screen },
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Fleet core
    // ---------------------------
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Signed in, but the role has no screen to land on.
    #[error("{0}")]
    Unauthorized(String),

    #[error("Bin {0} not found")]
    BinNotFound(u64),

    #[error("Invalid status filter: {0}")]
    InvalidStatus(String),

    #[error("Invalid seed file: {0}")]
    InvalidSeed(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
