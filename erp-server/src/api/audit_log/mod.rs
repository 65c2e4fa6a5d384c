//! Audit Log API 模块 (审计日志查询，只读)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/audit-log", get(handler::list))
}
