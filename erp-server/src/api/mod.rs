//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (登录/登出)
//! - [`clients`] - 客户管理接口
//! - [`suppliers`] - 供应商管理接口
//! - [`audit_log`] - 审计日志查询接口 (只读)

pub mod audit_log;
pub mod auth;
pub mod clients;
pub mod health;
pub mod suppliers;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::audit::bind_request_scope;
use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Auth API - login is public, logout requires auth
        .merge(auth::router())
        // Entity CRUD - authentication required
        .merge(clients::router())
        .merge(suppliers::router())
        // Audit log - read-only listing
        .merge(audit_log::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
///
/// 中间件从外到内：Trace → CORS → 认证 → 请求上下文绑定。
/// 认证先运行，上下文绑定才能从 extensions 读到 CurrentUser。
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(axum_middleware::from_fn(bind_request_scope))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
