//! Entity lifecycle events
//!
//! Repositories notify registered listeners synchronously when a tracked
//! entity is created, updated, or about to be deleted. Listeners are
//! registered explicitly at process start; there is no global dispatch
//! table. The callback runs on the same transaction connection as the
//! triggering write, so a listener error rolls the whole mutation back.

use async_trait::async_trait;
use sqlx::SqliteConnection;
use std::sync::Arc;

use super::repository::RepoResult;

/// A snapshot of the entity an event refers to.
///
/// `subject_id` is None for entities that have not been assigned an id
/// yet; `subject_repr` is the entity's display string at event time.
#[derive(Debug, Clone)]
pub struct EntityEvent {
    /// Owning module, e.g. "clients", "suppliers", "accounts"
    pub module: &'static str,
    /// Entity type discriminator, e.g. "client"
    pub subject_type: &'static str,
    /// Stringified identifier
    pub subject_id: Option<String>,
    /// Human-readable snapshot
    pub subject_repr: String,
}

/// Lifecycle listener contract.
///
/// `entity_saved` fires after an insert or update has been applied,
/// `entity_deleting` fires before the row is removed (identifier and
/// fields are still readable). Both run inside the caller's
/// transaction and must not be retried on failure.
#[async_trait]
pub trait EntityListener: Send + Sync {
    async fn entity_saved(
        &self,
        conn: &mut SqliteConnection,
        event: &EntityEvent,
        created: bool,
    ) -> RepoResult<()>;

    async fn entity_deleting(
        &self,
        conn: &mut SqliteConnection,
        event: &EntityEvent,
    ) -> RepoResult<()>;
}

/// The set of listeners registered with the entity store.
pub type Listeners = Arc<Vec<Arc<dyn EntityListener>>>;
