//! 认证授权模块
//!
//! 提供 JWT 认证、认证事件和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`AuthEvents`] - 认证事件注册表

pub mod events;
pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use events::{AuthEvents, AuthListener};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
