//! Authentication Handlers
//!
//! Handles login and logout; both notify the registered auth listeners.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::audit::context;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token.
/// Success and failure both produce exactly one audit entry via the
/// registered auth listeners; a listener failure fails the request.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AppResponse<LoginResponse>>, AppError> {
    let scope = context::current();

    let user = state
        .users
        .find_by_username(&req.username)
        .await
        .map_err(AppError::from)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // 身份未确立时记录提交的凭据字符串 (沿袭的已知设计风险)
    let credentials_repr =
        serde_json::to_string(&req).unwrap_or_else(|_| format!("username={}", req.username));

    // Check authentication result - unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            // User found - check active status
            if !u.is_active {
                state
                    .auth_events
                    .login_failed(&credentials_repr, scope.as_ref())
                    .await?;
                tracing::warn!(username = %req.username, "Login failed - account disabled");
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            // Verify password
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                state
                    .auth_events
                    .login_failed(&credentials_repr, scope.as_ref())
                    .await?;
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            state
                .auth_events
                .login_failed(&credentials_repr, scope.as_ref())
                .await?;
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Generate JWT token
    let token = state
        .jwt_service
        .generate_token(user.id, &user.username, &user.display_name)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    state
        .auth_events
        .login_succeeded(&user, scope.as_ref())
        .await?;

    Ok(ok(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
        },
    }))
}

/// Logout handler — notifies listeners, the token itself stays valid
/// until it expires (stateless JWT).
pub async fn logout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<AppResponse<()>>, AppError> {
    let scope = context::current();
    state
        .auth_events
        .logged_out(Some(&user), scope.as_ref())
        .await?;
    Ok(ok(()))
}
