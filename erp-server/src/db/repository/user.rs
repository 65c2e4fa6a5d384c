//! User Repository
//!
//! Users fire lifecycle events like any other entity, but under the
//! "accounts" module, which the audit recorder does not track.

use sqlx::SqliteConnection;

use super::{EntityStore, RepoError, RepoResult};
use crate::db::events::EntityEvent;
use crate::db::models::{User, UserCreate};
use crate::utils::now_millis;

pub const MODULE: &str = "accounts";
const SUBJECT_TYPE: &str = "user";

const SELECT: &str =
    "SELECT id, username, display_name, hash_pass, is_active, created_at FROM user";

#[derive(Clone)]
pub struct UserRepository {
    store: EntityStore,
}

impl UserRepository {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    fn event(user: &User) -> EntityEvent {
        EntityEvent {
            module: MODULE,
            subject_type: SUBJECT_TYPE,
            subject_id: Some(user.id.to_string()),
            subject_repr: user.to_string(),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let mut conn = self.store.pool().acquire().await?;
        Self::fetch_by_id(conn.as_mut(), id).await
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let sql = format!("{SELECT} WHERE username = ? LIMIT 1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(self.store.pool())
            .await?;
        Ok(user)
    }

    async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<User>> {
        let sql = format!("{SELECT} WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(user)
    }

    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let display_name = data
            .display_name
            .unwrap_or_else(|| data.username.clone());
        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

        let mut tx = self.store.pool().begin().await?;
        let result = sqlx::query(
            "INSERT INTO user (username, display_name, hash_pass, is_active, created_at) \
             VALUES (?1, ?2, ?3, 1, ?4)",
        )
        .bind(&data.username)
        .bind(&display_name)
        .bind(&hash_pass)
        .bind(now_millis())
        .execute(tx.as_mut())
        .await?;

        let id = result.last_insert_rowid();
        let user = Self::fetch_by_id(tx.as_mut(), id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create user".into()))?;

        self.store
            .notify_saved(tx.as_mut(), &Self::event(&user), true)
            .await?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.store.pool().begin().await?;

        let user = Self::fetch_by_id(tx.as_mut(), id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;

        self.store
            .notify_deleting(tx.as_mut(), &Self::event(&user))
            .await?;

        sqlx::query("DELETE FROM user WHERE id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
