//! Audit Log API Handlers
//!
//! 只读枚举：条目不能通过任何接口创建、编辑或删除。

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::{AuditAction, AuditListResponse, AuditQuery};
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// GET /api/audit-log — 查询审计日志 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AppResponse<AuditListResponse>>> {
    if let Some(action) = &query.action
        && AuditAction::parse(action).is_none()
    {
        return Err(AppError::validation(format!("unknown action: {action}")));
    }
    let response = state.audit_storage.query(&query).await?;
    Ok(ok(response))
}
