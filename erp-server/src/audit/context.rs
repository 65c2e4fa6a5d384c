//! 请求上下文存储
//!
//! 将当前请求的元数据（路径、IP、User-Agent、已认证用户）绑定到处理该
//! 请求的 tokio task，使生命周期事件回调等不直接接收 request 的代码
//! 也能取到操作人和请求信息。
//!
//! 绑定严格限定在本 task 及其子 future 内：并发请求互不可见，
//! 且作用域随请求 future 结束而消失，不存在复用 worker 残留旧绑定
//! 的问题。后台任务、启动代码和测试中未绑定上下文是正常状态，
//! `current()` 返回 `None` 而非报错。

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use super::types::{MAX_USER_AGENT_LEN, truncate_chars};
use crate::auth::CurrentUser;

tokio::task_local! {
    static REQUEST_SCOPE: RequestScope;
}

/// 一次请求的上下文快照
#[derive(Debug, Clone)]
pub struct RequestScope {
    /// 请求路径
    pub path: String,
    /// 来源 IP (x-forwarded-for 优先，否则对端地址)
    pub ip: Option<String>,
    /// User-Agent (截断至 512 字符)
    pub user_agent: Option<String>,
    /// 已认证用户 (认证中间件注入)
    pub user: Option<CurrentUser>,
}

/// 当前 task 绑定的请求上下文，未绑定时返回 None
pub fn current() -> Option<RequestScope> {
    REQUEST_SCOPE.try_with(|scope| scope.clone()).ok()
}

/// 当前请求的已认证用户，未绑定或未认证时返回 None
pub fn current_user() -> Option<CurrentUser> {
    REQUEST_SCOPE
        .try_with(|scope| scope.user.clone())
        .ok()
        .flatten()
}

/// 在给定上下文内运行 future (测试和后台代码可直接使用)
pub async fn scope<F>(request_scope: RequestScope, f: F) -> F::Output
where
    F: Future,
{
    REQUEST_SCOPE.scope(request_scope, f).await
}

/// 从请求头提取来源 IP
///
/// `x-forwarded-for` 优先（取第一个地址），否则使用对端地址。
/// 两者都不可用时返回 None。
pub fn extract_ip(req: &Request) -> Option<String> {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// 从请求头提取 User-Agent，截断至 512 字符
pub fn extract_user_agent(req: &Request) -> Option<String> {
    req.headers()
        .get(http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| truncate_chars(ua, MAX_USER_AGENT_LEN))
}

/// 请求上下文绑定中间件
///
/// 每个请求开始时重新构建 [`RequestScope`] 并包裹内层 handler，
/// 认证中间件先于本中间件运行，CurrentUser 从 request extensions 读取。
pub async fn bind_request_scope(req: Request, next: Next) -> Response {
    let request_scope = RequestScope {
        path: req.uri().path().to_string(),
        ip: extract_ip(&req),
        user_agent: extract_user_agent(&req),
        user: req.extensions().get::<CurrentUser>().cloned(),
    };
    scope(request_scope, next.run(req)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn test_scope(path: &str, user: Option<CurrentUser>) -> RequestScope {
        RequestScope {
            path: path.to_string(),
            ip: Some("10.0.0.1".to_string()),
            user_agent: Some("test-agent".to_string()),
            user,
        }
    }

    #[tokio::test]
    async fn test_unbound_context_is_none() {
        assert!(current().is_none());
        assert!(current_user().is_none());
    }

    #[tokio::test]
    async fn test_scope_visible_inside_only() {
        scope(test_scope("/api/clients", None), async {
            let ctx = current().expect("scope must be bound");
            assert_eq!(ctx.path, "/api/clients");
            assert!(current_user().is_none());
        })
        .await;
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_tasks_are_isolated() {
        let a = tokio::spawn(scope(test_scope("/a", None), async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            current().map(|s| s.path)
        }));
        let b = tokio::spawn(scope(test_scope("/b", None), async {
            current().map(|s| s.path)
        }));
        let c = tokio::spawn(async { current().map(|s| s.path) });

        assert_eq!(a.await.unwrap(), Some("/a".to_string()));
        assert_eq!(b.await.unwrap(), Some("/b".to_string()));
        assert_eq!(c.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_current_user_requires_authenticated_scope() {
        let user = CurrentUser {
            id: 7,
            username: "tester".to_string(),
            display_name: "Tester".to_string(),
        };
        scope(test_scope("/api/clients", Some(user)), async {
            assert_eq!(current_user().map(|u| u.id), Some(7));
        })
        .await;
    }

    #[test]
    fn test_extract_ip_prefers_forwarded_for() {
        let req = Request::builder()
            .uri("/api/clients")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&req), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn test_extract_ip_absent_without_peer() {
        let req = Request::builder()
            .uri("/api/clients")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&req), None);
    }

    #[test]
    fn test_extract_user_agent_truncates() {
        let long_ua = "M".repeat(MAX_USER_AGENT_LEN + 100);
        let req = Request::builder()
            .uri("/")
            .header(http::header::USER_AGENT, long_ua)
            .body(Body::empty())
            .unwrap();
        let ua = extract_user_agent(&req).unwrap();
        assert_eq!(ua.chars().count(), MAX_USER_AGENT_LEN);
    }
}
