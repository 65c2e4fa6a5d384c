//! Auth API 模块 (登录/登出)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::{LoginRequest, LoginResponse, UserInfo};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/logout", post(handler::logout))
}
