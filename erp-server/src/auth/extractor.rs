//! CurrentUser extractor
//!
//! 认证中间件验证令牌后把 [`CurrentUser`] 注入请求扩展，
//! handler 通过本 extractor 取用。扩展缺失说明路由没有经过
//! 认证中间件，按未认证处理。

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}
