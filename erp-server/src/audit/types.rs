//! 审计日志类型定义
//!
//! 审计日志的核心数据结构。
//! 所有条目一经写入不可变、不可删除 (append-only)。
//! `changes` / `integrity_hash` 为预留字段，当前始终为空。

use serde::{Deserialize, Serialize};

/// `subject_repr` 的最大长度 (字符数)
pub const MAX_REPR_LEN: usize = 255;

/// `user_agent` 的最大长度 (字符数)
pub const MAX_USER_AGENT_LEN: usize = 512;

/// 审计操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ 实体生命周期 ═══
    /// 实体创建
    Create,
    /// 实体更新
    Update,
    /// 实体删除
    Delete,

    // ═══ 认证 ═══
    /// 登录成功
    Login,
    /// 登出
    Logout,
    /// 登录失败
    LoginFailed,
}

impl AuditAction {
    /// 数据库中的字符串形式
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::LoginFailed => "login_failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(AuditAction::Create),
            "update" => Some(AuditAction::Update),
            "delete" => Some(AuditAction::Delete),
            "login" => Some(AuditAction::Login),
            "logout" => Some(AuditAction::Logout),
            "login_failed" => Some(AuditAction::LoginFailed),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 审计日志条目（不可变）
///
/// - `actor_id`: 触发事件的用户；未认证或用户已删除时为 None
/// - `changes`: 预留给字段级 diff，当前始终为 None
/// - `integrity_hash`: 预留给防篡改哈希链，当前始终为 None
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLogEntry {
    /// 自增序列号（插入顺序即排序键）
    pub id: i64,
    /// 时间戳 (Unix 毫秒，服务端赋值)
    pub created_at: i64,
    /// 操作人 ID（认证事件失败或匿名操作为 None）
    pub actor_id: Option<i64>,
    /// 操作类型
    pub action: String,
    /// 受影响实体的类型（认证事件为 None）
    pub subject_type: Option<String>,
    /// 受影响实体的 ID（字符串形式）
    pub subject_id: Option<String>,
    /// 实体在事件发生时的简短快照（截断至 255 字符）
    pub subject_repr: Option<String>,
    /// 预留：字段级变更 (JSON)
    pub changes: Option<String>,
    /// 请求来源 IP
    pub ip_address: Option<String>,
    /// 请求路径
    pub request_path: Option<String>,
    /// User-Agent（截断至 512 字符）
    pub user_agent: Option<String>,
    /// 预留：防篡改哈希
    pub integrity_hash: Option<String>,
}

/// 待写入的审计条目 (id/created_at 由存储层赋值)
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub actor_id: Option<i64>,
    pub action: AuditAction,
    pub subject_type: Option<String>,
    pub subject_id: Option<String>,
    pub subject_repr: Option<String>,
    pub ip_address: Option<String>,
    pub request_path: Option<String>,
    pub user_agent: Option<String>,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// 操作类型过滤
    pub action: Option<String>,
    /// 实体类型过滤
    pub subject_type: Option<String>,
    /// 操作人过滤
    pub actor_id: Option<i64>,
    /// 分页偏移
    #[serde(default)]
    pub offset: i64,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            action: None,
            subject_type: None,
            actor_id: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// 审计日志列表响应
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditLogEntry>,
    pub total: i64,
}

/// 按字符数截断，保持 UTF-8 边界
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrip() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Login,
            AuditAction::Logout,
            AuditAction::LoginFailed,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("drop_table"), None);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let s = "código".repeat(100);
        let out = truncate_chars(&s, MAX_REPR_LEN);
        assert_eq!(out.chars().count(), MAX_REPR_LEN);
        // multibyte ó must not be split
        assert!(out.is_char_boundary(out.len()));
    }

    #[test]
    fn test_truncate_short_input_unchanged() {
        assert_eq!(truncate_chars("abc", MAX_REPR_LEN), "abc");
    }
}
