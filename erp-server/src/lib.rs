//! Gestion ERP Server - 商业记录管理服务
//!
//! # 架构概述
//!
//! 本模块是 ERP 服务端的主入口，提供以下核心功能：
//!
//! - **审计日志** (`audit`): 实体变更与登录事件的不可变审计链路
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx, WAL)
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口 (客户/供应商 CRUD)
//!
//! # 模块结构
//!
//! ```text
//! erp-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、认证事件
//! ├── audit/         # 请求上下文、审计记录器、审计存储
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层 (模型、仓储、生命周期事件)
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use audit::{AuditAction, AuditLogEntry, AuditStorage, RequestScope};
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______          __  _
  / ____/__  _____/ /_(_)___  ____
 / / __/ _ \/ ___/ __/ / __ \/ __ \
/ /_/ /  __(__  ) /_/ / /_/ / / / /
\____/\___/____/\__/_/\____/_/ /_/
    "#
    );
}
