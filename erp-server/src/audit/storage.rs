//! 审计日志 SQLite 存储层
//!
//! Append-only 设计，没有任何删除/更新接口，
//! schema 层触发器同样拒绝 UPDATE/DELETE。

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use thiserror::Error;

use super::types::{AuditListResponse, AuditLogEntry, AuditQuery, NewAuditEntry};
use crate::utils::now_millis;

/// 存储错误
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for AuditStorageError {
    fn from(err: sqlx::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

const INSERT_SQL: &str = "INSERT INTO audit_log \
    (created_at, actor_id, action, subject_type, subject_id, subject_repr, \
     changes, ip_address, request_path, user_agent, integrity_hash) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8, ?9, NULL)";

const SELECT_COLUMNS: &str = "SELECT id, created_at, actor_id, action, subject_type, \
    subject_id, subject_repr, changes, ip_address, request_path, user_agent, integrity_hash \
    FROM audit_log";

/// 审计日志存储
///
/// 仅提供 `append` 和查询方法：
/// - 实体事件在触发事务的连接上写入 ([`append_on`])
/// - 认证事件无外层事务，直接在连接池上写入 ([`append`])
#[derive(Clone)]
pub struct AuditStorage {
    pool: SqlitePool,
}

impl AuditStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 追加一条审计日志（连接池路径，认证事件使用）
    pub async fn append(&self, entry: &NewAuditEntry) -> AuditStorageResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::insert(conn.as_mut(), entry).await
    }

    /// 在指定连接上追加一条审计日志
    ///
    /// 实体生命周期事件使用：与触发写入共用同一事务，
    /// 实体变更和审计条目同时提交或同时回滚。
    pub async fn append_on(
        &self,
        conn: &mut SqliteConnection,
        entry: &NewAuditEntry,
    ) -> AuditStorageResult<i64> {
        Self::insert(conn, entry).await
    }

    async fn insert(conn: &mut SqliteConnection, entry: &NewAuditEntry) -> AuditStorageResult<i64> {
        let actor_id = Self::resolve_actor(&mut *conn, entry.actor_id).await?;
        let result = sqlx::query(INSERT_SQL)
            .bind(now_millis())
            .bind(actor_id)
            .bind(entry.action.as_str())
            .bind(&entry.subject_type)
            .bind(&entry.subject_id)
            .bind(&entry.subject_repr)
            .bind(&entry.ip_address)
            .bind(&entry.request_path)
            .bind(&entry.user_agent)
            .execute(conn)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// JWT 是无状态的：令牌可能比用户行活得更久。
    /// 用户行已不存在时 actor 降级为 NULL，写入照常进行。
    async fn resolve_actor(
        conn: &mut SqliteConnection,
        actor_id: Option<i64>,
    ) -> AuditStorageResult<Option<i64>> {
        let Some(id) = actor_id else {
            return Ok(None);
        };
        let exists = sqlx::query("SELECT id FROM user WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(exists.map(|_| id))
    }

    /// 查询审计日志（最新在前，action/subject_type/actor 可选过滤）
    pub async fn query(&self, q: &AuditQuery) -> AuditStorageResult<AuditListResponse> {
        let mut where_clauses: Vec<&str> = Vec::new();
        if q.action.is_some() {
            where_clauses.push("action = ?");
        }
        if q.subject_type.is_some() {
            where_clauses.push("subject_type = ?");
        }
        if q.actor_id.is_some() {
            where_clauses.push("actor_id = ?");
        }
        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clauses.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) as total FROM audit_log{where_sql}");
        let mut count_query = sqlx::query(&count_sql);
        if let Some(action) = &q.action {
            count_query = count_query.bind(action);
        }
        if let Some(subject_type) = &q.subject_type {
            count_query = count_query.bind(subject_type);
        }
        if let Some(actor_id) = q.actor_id {
            count_query = count_query.bind(actor_id);
        }
        let total: i64 = count_query
            .map(|row: SqliteRow| row.get("total"))
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!("{SELECT_COLUMNS}{where_sql} ORDER BY id DESC LIMIT ? OFFSET ?");
        let mut list_query = sqlx::query_as::<_, AuditLogEntry>(&list_sql);
        if let Some(action) = &q.action {
            list_query = list_query.bind(action);
        }
        if let Some(subject_type) = &q.subject_type {
            list_query = list_query.bind(subject_type);
        }
        if let Some(actor_id) = q.actor_id {
            list_query = list_query.bind(actor_id);
        }
        let items = list_query
            .bind(q.limit.clamp(1, 500))
            .bind(q.offset.max(0))
            .fetch_all(&self.pool)
            .await?;

        Ok(AuditListResponse { items, total })
    }

    /// 条目总数（测试和运维用）
    pub async fn count(&self) -> AuditStorageResult<i64> {
        let total: i64 = sqlx::query("SELECT COUNT(*) as total FROM audit_log")
            .map(|row: SqliteRow| row.get("total"))
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
