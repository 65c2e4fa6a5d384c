//! 审计记录器
//!
//! 订阅实体生命周期事件和认证事件，把每个事件转换为恰好一条
//! [`AuditLogEntry`](super::types::AuditLogEntry)：
//!
//! - 实体事件：过滤非跟踪模块，防止审计自身递归，
//!   在触发事务的连接上同步写入（同事务提交或回滚）。
//! - 认证事件：无外层事务，直接在连接池上写入。
//!
//! 记录器不做本地恢复、不重试、不吞掉持久化错误 —— 审计完整性
//! 是正确性属性，失败必须传播给触发操作的调用方。

use async_trait::async_trait;
use sqlx::SqliteConnection;

use super::context::{self, RequestScope};
use super::storage::{AuditStorage, AuditStorageError};
use super::types::{AuditAction, MAX_REPR_LEN, NewAuditEntry, truncate_chars};
use crate::auth::{AuthListener, CurrentUser};
use crate::db::events::{EntityEvent, EntityListener};
use crate::db::models::User;
use crate::db::repository::{RepoError, RepoResult, client, supplier};

/// 生成审计条目的实体模块；其余模块的事件被忽略
const TRACKED_MODULES: [&str; 2] = [client::MODULE, supplier::MODULE];

/// 审计日志自身的类型标识 — 递归保护
const AUDIT_SUBJECT_TYPE: &str = "audit_log";

pub struct AuditRecorder {
    storage: AuditStorage,
}

impl AuditRecorder {
    pub fn new(storage: AuditStorage) -> Self {
        Self { storage }
    }

    /// 事件是否应写入审计日志
    fn is_tracked(event: &EntityEvent) -> bool {
        if event.subject_type == AUDIT_SUBJECT_TYPE {
            return false;
        }
        TRACKED_MODULES.contains(&event.module)
    }

    /// 从生命周期事件和当前请求上下文组装审计条目
    fn entity_entry(event: &EntityEvent, action: AuditAction) -> NewAuditEntry {
        let scope = context::current();
        NewAuditEntry {
            actor_id: context::current_user().map(|u| u.id),
            action,
            subject_type: Some(event.subject_type.to_string()),
            subject_id: event.subject_id.clone(),
            subject_repr: Some(truncate_chars(&event.subject_repr, MAX_REPR_LEN)),
            ip_address: scope.as_ref().and_then(|s| s.ip.clone()),
            request_path: scope.as_ref().map(|s| s.path.clone()),
            user_agent: scope.as_ref().and_then(|s| s.user_agent.clone()),
        }
    }

    /// 认证事件条目：subject_type/subject_id 为空，请求元数据来自显式传入的 scope
    fn auth_entry(
        action: AuditAction,
        actor_id: Option<i64>,
        repr: Option<String>,
        scope: Option<&RequestScope>,
    ) -> NewAuditEntry {
        NewAuditEntry {
            actor_id,
            action,
            subject_type: None,
            subject_id: None,
            subject_repr: repr.map(|r| truncate_chars(&r, MAX_REPR_LEN)),
            ip_address: scope.and_then(|s| s.ip.clone()),
            request_path: scope.map(|s| s.path.clone()),
            user_agent: scope.and_then(|s| s.user_agent.clone()),
        }
    }
}

#[async_trait]
impl EntityListener for AuditRecorder {
    async fn entity_saved(
        &self,
        conn: &mut SqliteConnection,
        event: &EntityEvent,
        created: bool,
    ) -> RepoResult<()> {
        if !Self::is_tracked(event) {
            return Ok(());
        }
        let action = if created {
            AuditAction::Create
        } else {
            AuditAction::Update
        };
        self.storage
            .append_on(conn, &Self::entity_entry(event, action))
            .await
            .map_err(|e| RepoError::Audit(e.to_string()))?;
        Ok(())
    }

    async fn entity_deleting(
        &self,
        conn: &mut SqliteConnection,
        event: &EntityEvent,
    ) -> RepoResult<()> {
        if !Self::is_tracked(event) {
            return Ok(());
        }
        self.storage
            .append_on(conn, &Self::entity_entry(event, AuditAction::Delete))
            .await
            .map_err(|e| RepoError::Audit(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl AuthListener for AuditRecorder {
    async fn login_succeeded(
        &self,
        user: &User,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError> {
        let entry = Self::auth_entry(
            AuditAction::Login,
            Some(user.id),
            Some(user.to_string()),
            scope,
        );
        self.storage.append(&entry).await?;
        Ok(())
    }

    async fn login_failed(
        &self,
        credentials_repr: &str,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError> {
        // 身份未确立：actor 为空，提交的凭据原样截断记录。
        // 可能包含敏感输入，这是沿袭的已知设计风险。
        let entry = Self::auth_entry(
            AuditAction::LoginFailed,
            None,
            Some(credentials_repr.to_string()),
            scope,
        );
        self.storage.append(&entry).await?;
        Ok(())
    }

    async fn logged_out(
        &self,
        user: Option<&CurrentUser>,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError> {
        let entry = Self::auth_entry(
            AuditAction::Logout,
            user.map(|u| u.id),
            user.map(|u| u.username.clone()),
            scope,
        );
        self.storage.append(&entry).await?;
        Ok(())
    }
}
