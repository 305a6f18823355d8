//! SQLite connection wrapper (one connection, CLI-sized).

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Connection shared by the async adapters.
pub type SharedPool = Arc<Mutex<DbPool>>;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn into_shared(self) -> SharedPool {
        Arc::new(Mutex::new(self))
    }
}
