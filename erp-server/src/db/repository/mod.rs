//! Repository Module
//!
//! CRUD operations over the SQLite tables. Mutating operations fire
//! lifecycle events on the registered listeners inside the same
//! transaction as the write itself.

pub mod client;
pub mod supplier;
pub mod user;

// Re-exports
pub use client::ClientRepository;
pub use supplier::SupplierRepository;
pub use user::UserRepository;

use sqlx::{SqliteConnection, SqlitePool};

use super::events::{EntityEvent, Listeners};

/// Repository error
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    NotFound(String),

    /// Audit entry could not be persisted; the surrounding
    /// transaction rolls back with it.
    #[error("Audit log write failed: {0}")]
    Audit(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Shared base for entity repositories: pool + registered lifecycle
/// listeners. Listeners are wired once at process start.
#[derive(Clone)]
pub struct EntityStore {
    pool: SqlitePool,
    listeners: Listeners,
}

impl EntityStore {
    pub fn new(pool: SqlitePool, listeners: Listeners) -> Self {
        Self { pool, listeners }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Notify listeners that an entity was inserted or updated.
    /// Runs on the open transaction; the first error aborts it.
    pub(crate) async fn notify_saved(
        &self,
        conn: &mut SqliteConnection,
        event: &EntityEvent,
        created: bool,
    ) -> RepoResult<()> {
        for listener in self.listeners.iter() {
            listener.entity_saved(conn, event, created).await?;
        }
        Ok(())
    }

    /// Notify listeners that an entity is about to be deleted.
    pub(crate) async fn notify_deleting(
        &self,
        conn: &mut SqliteConnection,
        event: &EntityEvent,
    ) -> RepoResult<()> {
        for listener in self.listeners.iter() {
            listener.entity_deleting(conn, event).await?;
        }
        Ok(())
    }
}
