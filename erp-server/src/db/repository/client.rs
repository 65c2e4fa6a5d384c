//! Client Repository

use sqlx::SqliteConnection;

use super::{EntityStore, RepoError, RepoResult};
use crate::db::events::EntityEvent;
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use crate::utils::now_millis;

/// Owning module for lifecycle events (audit tracks this module)
pub const MODULE: &str = "clients";
const SUBJECT_TYPE: &str = "client";

const SELECT: &str = "SELECT id, company_name, name, email, phone, address, tax_id, \
    is_active, notes, created_at, updated_at FROM client";

#[derive(Clone)]
pub struct ClientRepository {
    store: EntityStore,
}

impl ClientRepository {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    fn event(client: &Client) -> EntityEvent {
        EntityEvent {
            module: MODULE,
            subject_type: SUBJECT_TYPE,
            subject_id: Some(client.id.to_string()),
            subject_repr: client.to_string(),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Client>> {
        let sql = format!("{SELECT} ORDER BY company_name, name");
        let clients = sqlx::query_as::<_, Client>(&sql)
            .fetch_all(self.store.pool())
            .await?;
        Ok(clients)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Client>> {
        let mut conn = self.store.pool().acquire().await?;
        Self::fetch_by_id(conn.as_mut(), id).await
    }

    async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Client>> {
        let sql = format!("{SELECT} WHERE id = ?");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(client)
    }

    /// Insert a client and fire `entity_saved(created = true)` inside
    /// the same transaction.
    pub async fn create(&self, data: ClientCreate) -> RepoResult<Client> {
        let now = now_millis();
        let mut tx = self.store.pool().begin().await?;

        let result = sqlx::query(
            "INSERT INTO client (company_name, name, email, phone, address, tax_id, is_active, notes, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        )
        .bind(&data.contact.company_name)
        .bind(&data.contact.name)
        .bind(&data.contact.email)
        .bind(&data.contact.phone)
        .bind(&data.contact.address)
        .bind(&data.contact.tax_id)
        .bind(data.contact.is_active)
        .bind(&data.notes)
        .bind(now)
        .execute(tx.as_mut())
        .await?;

        let id = result.last_insert_rowid();
        let client = Self::fetch_by_id(tx.as_mut(), id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create client".into()))?;

        self.store
            .notify_saved(tx.as_mut(), &Self::event(&client), true)
            .await?;
        tx.commit().await?;
        Ok(client)
    }

    /// Update a client and fire `entity_saved(created = false)`.
    /// Fires on every save call, whether or not any field changed.
    pub async fn update(&self, id: i64, data: ClientUpdate) -> RepoResult<Client> {
        let now = now_millis();
        let mut tx = self.store.pool().begin().await?;

        let rows = sqlx::query(
            "UPDATE client SET company_name = COALESCE(?1, company_name), name = COALESCE(?2, name), \
             email = COALESCE(?3, email), phone = COALESCE(?4, phone), address = COALESCE(?5, address), \
             tax_id = COALESCE(?6, tax_id), is_active = COALESCE(?7, is_active), \
             notes = COALESCE(?8, notes), updated_at = ?9 WHERE id = ?10",
        )
        .bind(&data.company_name)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.tax_id)
        .bind(data.is_active)
        .bind(&data.notes)
        .bind(now)
        .bind(id)
        .execute(tx.as_mut())
        .await?;

        if rows.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Client {id} not found")));
        }

        let client = Self::fetch_by_id(tx.as_mut(), id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Client {id} not found")))?;

        self.store
            .notify_saved(tx.as_mut(), &Self::event(&client), false)
            .await?;
        tx.commit().await?;
        Ok(client)
    }

    /// Delete a client. `entity_deleting` fires before the row is
    /// removed, while id and fields are still readable.
    pub async fn delete(&self, id: i64) -> RepoResult<()> {
        let mut tx = self.store.pool().begin().await?;

        let client = Self::fetch_by_id(tx.as_mut(), id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Client {id} not found")))?;

        self.store
            .notify_deleting(tx.as_mut(), &Self::event(&client))
            .await?;

        sqlx::query("DELETE FROM client WHERE id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
