//! 审计日志模块
//!
//! 横切的审计子系统：
//! - [`context`] - 请求上下文存储 (task-local)
//! - [`recorder`] - 审计记录器 (生命周期/认证事件 → 审计条目)
//! - [`storage`] - append-only 存储层
//! - [`types`] - 条目、操作类型、查询参数
//!
//! 条目一经写入不可修改、不可删除；记录器绝不审计审计日志自身。

pub mod context;
pub mod recorder;
pub mod storage;
pub mod types;

pub use context::{RequestScope, bind_request_scope, current, current_user};
pub use recorder::AuditRecorder;
pub use storage::{AuditStorage, AuditStorageError, AuditStorageResult};
pub use types::{
    AuditAction, AuditListResponse, AuditLogEntry, AuditQuery, MAX_REPR_LEN, MAX_USER_AGENT_LEN,
    NewAuditEntry,
};
