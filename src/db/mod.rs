pub mod accounts;
pub mod documents;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod seed;

pub use accounts::SqliteIdentityProvider;
pub use documents::SqliteDocumentSource;
pub use pool::{DbPool, SharedPool};
