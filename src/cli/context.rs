//! Wiring shared by the commands: database, adapters and the session gate.

use crate::config::Config;
use crate::core::fleet_store::{FleetStore, LoadOutcome, LoadReport};
use crate::core::registration::Registration;
use crate::core::session_gate::SessionGate;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::{DbPool, SharedPool};
use crate::db::{SqliteDocumentSource, SqliteIdentityProvider};
use crate::errors::{AppError, AppResult};
use crate::models::screen::Screen;
use crate::models::session::Session;
use crate::storage::FileSessionStorage;
use crate::ui::messages::warning;
use std::sync::Arc;
use tracing::debug;

pub struct AppContext {
    pub cfg: Config,
    pub pool: SharedPool,
    pub documents: Arc<SqliteDocumentSource>,
    pub identity: Arc<SqliteIdentityProvider>,
    pub storage: Arc<FileSessionStorage>,
}

impl AppContext {
    /// Open the configured database (pending migrations are applied).
    pub fn open(cfg: Config) -> AppResult<Self> {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;
        debug!(database = %cfg.database, "database opened");

        let pool = pool.into_shared();
        Ok(Self {
            documents: Arc::new(SqliteDocumentSource::new(pool.clone())),
            identity: Arc::new(SqliteIdentityProvider::new(pool.clone())),
            storage: Arc::new(FileSessionStorage::new(&cfg.session_file)),
            pool,
            cfg,
        })
    }

    pub fn gate(&self) -> SessionGate {
        SessionGate::new(
            self.identity.clone(),
            self.documents.clone(),
            self.storage.clone(),
        )
        .with_users_collection(self.cfg.users_collection.clone())
    }

    pub fn registration(&self) -> Registration {
        Registration::new(self.identity.clone(), self.documents.clone())
            .with_collections(
                self.cfg.users_collection.clone(),
                self.cfg.roster_collection.clone(),
            )
    }

    /// Restore the stored session and check it may open `screen`.
    pub async fn require(&self, screen: Screen) -> AppResult<Session> {
        let mut gate = self.gate();
        gate.restore().await?;
        let session = gate.authorize(screen)?;
        Ok(session.clone())
    }

    /// Fresh fleet snapshot from the bins collection.
    pub async fn load_fleet(&self) -> AppResult<(FleetStore, LoadReport)> {
        let mut store = FleetStore::new(self.cfg.bins_collection.clone());
        match store.load(self.documents.as_ref()).await? {
            LoadOutcome::Applied(report) => {
                if report.dropped_count() > 0 {
                    warning(format!(
                        "{} malformed bin document(s) skipped",
                        report.dropped_count()
                    ));
                }
                Ok((store, report))
            }
            LoadOutcome::Superseded(ticket) => Err(AppError::Other(format!(
                "load {} was superseded",
                ticket.value()
            ))),
        }
    }

    /// Audit line in the internal log. Failures only warn.
    pub async fn audit(&self, operation: &str, target: &str, message: &str) {
        let pool = self.pool.lock().await;
        if let Err(e) = ttlog(&pool.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {e}"));
        }
    }
}
