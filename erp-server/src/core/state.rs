use std::sync::Arc;

use sqlx::SqlitePool;

use crate::audit::{AuditRecorder, AuditStorage};
use crate::auth::{AuthEvents, JwtService};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{ClientRepository, EntityStore, SupplierRepository, UserRepository};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是服务端的核心数据结构，使用 Arc 实现浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | clients | ClientRepository | 客户仓储 |
/// | suppliers | SupplierRepository | 供应商仓储 |
/// | users | UserRepository | 用户仓储 |
/// | audit_storage | AuditStorage | 审计日志存储 (只读查询) |
/// | auth_events | AuthEvents | 认证事件注册表 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 客户仓储
    pub clients: ClientRepository,
    /// 供应商仓储
    pub suppliers: SupplierRepository,
    /// 用户仓储
    pub users: UserRepository,
    /// 审计日志存储 (查询用；写入只经由记录器)
    pub audit_storage: AuditStorage,
    /// 认证事件注册表
    pub auth_events: AuthEvents,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/gestion.db)
    /// 3. 审计记录器，并注册为实体生命周期和认证事件的监听器
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("gestion.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize database: {e}"))?;

        Ok(Self::with_pool(config.clone(), db_service.pool))
    }

    /// 基于现有连接池构建状态 (测试使用内存库)
    ///
    /// 审计监听器的注册发生在这里 —— 进程内唯一一次。
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let audit_storage = AuditStorage::new(pool.clone());
        let recorder = Arc::new(AuditRecorder::new(audit_storage.clone()));

        // 显式注册：实体生命周期 + 认证事件
        let entity_listeners: Vec<Arc<dyn crate::db::events::EntityListener>> =
            vec![recorder.clone()];
        let auth_listeners: Vec<Arc<dyn crate::auth::AuthListener>> = vec![recorder];
        let store = EntityStore::new(pool.clone(), Arc::new(entity_listeners));
        let auth_events = AuthEvents::new(auth_listeners);

        let clients = ClientRepository::new(store.clone());
        let suppliers = SupplierRepository::new(store.clone());
        let users = UserRepository::new(store);

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            pool,
            clients,
            suppliers,
            users,
            audit_storage,
            auth_events,
            jwt_service,
        }
    }
}
