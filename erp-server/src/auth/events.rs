//! 认证事件订阅契约
//!
//! 登录/登出处理器通过 [`AuthEvents`] 通知已注册的监听器。
//! 监听器在进程启动时显式注册 (无全局信号分发)，
//! 通知同步执行，持久化失败向调用方传播。

use async_trait::async_trait;
use std::sync::Arc;

use crate::audit::{AuditStorageError, RequestScope};
use crate::auth::CurrentUser;
use crate::db::models::User;

/// 认证事件监听器
#[async_trait]
pub trait AuthListener: Send + Sync {
    /// 登录成功（actor = user）
    async fn login_succeeded(
        &self,
        user: &User,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError>;

    /// 登录失败（身份未确立，记录提交的凭据字符串）
    async fn login_failed(
        &self,
        credentials_repr: &str,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError>;

    /// 登出
    async fn logged_out(
        &self,
        user: Option<&CurrentUser>,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError>;
}

/// 认证事件注册表 — 同步逐个通知监听器
#[derive(Clone, Default)]
pub struct AuthEvents {
    listeners: Vec<Arc<dyn AuthListener>>,
}

impl AuthEvents {
    pub fn new(listeners: Vec<Arc<dyn AuthListener>>) -> Self {
        Self { listeners }
    }

    pub async fn login_succeeded(
        &self,
        user: &User,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError> {
        for listener in &self.listeners {
            listener.login_succeeded(user, scope).await?;
        }
        Ok(())
    }

    pub async fn login_failed(
        &self,
        credentials_repr: &str,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError> {
        for listener in &self.listeners {
            listener.login_failed(credentials_repr, scope).await?;
        }
        Ok(())
    }

    pub async fn logged_out(
        &self,
        user: Option<&CurrentUser>,
        scope: Option<&RequestScope>,
    ) -> Result<(), AuditStorageError> {
        for listener in &self.listeners {
            listener.logged_out(user, scope).await?;
        }
        Ok(())
    }
}
