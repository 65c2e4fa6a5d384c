//! Service-level audit properties: every tracked mutation and auth
//! event yields exactly one immutable audit entry.

use erp_server::audit::{AuditQuery, NewAuditEntry, context};
use erp_server::auth::{CurrentUser, JwtConfig};
use erp_server::db::DbService;
use erp_server::db::models::{ClientCreate, ClientUpdate, ContactProfile, UserCreate};
use erp_server::{AuditAction, Config, ServerState};

fn test_config() -> Config {
    Config {
        work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "erp-server".to_string(),
            audience: "erp-clients".to_string(),
        },
        environment: "test".to_string(),
    }
}

async fn test_state() -> ServerState {
    let db = DbService::new_in_memory()
        .await
        .expect("in-memory database");
    ServerState::with_pool(test_config(), db.pool)
}

fn contact(company_name: &str, name: &str) -> ContactProfile {
    ContactProfile {
        company_name: company_name.to_string(),
        name: name.to_string(),
        email: None,
        phone: None,
        address: None,
        tax_id: None,
        is_active: true,
    }
}

fn client_create(company_name: &str, name: &str) -> ClientCreate {
    ClientCreate {
        contact: contact(company_name, name),
        notes: None,
    }
}

fn scope_as(user: Option<CurrentUser>) -> context::RequestScope {
    context::RequestScope {
        path: "/api/clients".to_string(),
        ip: Some("203.0.113.9".to_string()),
        user_agent: Some("audit-tests/1.0".to_string()),
        user,
    }
}

async fn entries(state: &ServerState, action: &str) -> Vec<erp_server::AuditLogEntry> {
    state
        .audit_storage
        .query(&AuditQuery {
            action: Some(action.to_string()),
            ..Default::default()
        })
        .await
        .expect("audit query")
        .items
}

#[tokio::test]
async fn test_create_writes_exactly_one_create_entry() {
    let state = test_state().await;

    let client = state
        .clients
        .create(client_create("Audit Co", "Audit Contact"))
        .await
        .unwrap();

    let created = entries(&state, "create").await;
    assert_eq!(created.len(), 1);
    let entry = &created[0];
    assert_eq!(entry.subject_type.as_deref(), Some("client"));
    assert_eq!(entry.subject_id.as_deref(), Some(client.id.to_string().as_str()));
    assert_eq!(
        entry.subject_repr.as_deref(),
        Some("Audit Co (Audit Contact)")
    );
    // reserved columns stay empty
    assert!(entry.changes.is_none());
    assert!(entry.integrity_hash.is_none());
    // no request bound: metadata degrades to None rather than failing
    assert!(entry.ip_address.is_none());
    assert!(entry.actor_id.is_none());
}

#[tokio::test]
async fn test_update_writes_entry_even_without_field_changes() {
    let state = test_state().await;
    let client = state
        .clients
        .create(client_create("Acme SA", "Jane"))
        .await
        .unwrap();

    // two saves, no actual field change in the second
    state
        .clients
        .update(client.id, ClientUpdate {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    state
        .clients
        .update(client.id, ClientUpdate::default())
        .await
        .unwrap();

    let updated = entries(&state, "update").await;
    assert_eq!(updated.len(), 2);
}

#[tokio::test]
async fn test_delete_entry_holds_pre_removal_identifier() {
    let state = test_state().await;
    let client = state
        .clients
        .create(client_create("ToDelete", "X"))
        .await
        .unwrap();
    let id = client.id;

    state.clients.delete(id).await.unwrap();

    assert!(state.clients.find_by_id(id).await.unwrap().is_none());
    let deleted = entries(&state, "delete").await;
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].subject_id.as_deref(), Some(id.to_string().as_str()));
    assert_eq!(deleted[0].subject_repr.as_deref(), Some("ToDelete (X)"));
}

#[tokio::test]
async fn test_actor_and_request_metadata_from_bound_scope() {
    let state = test_state().await;
    let user = state
        .users
        .create(UserCreate {
            username: "tester".to_string(),
            password: "pass".to_string(),
            display_name: None,
        })
        .await
        .unwrap();

    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        display_name: user.display_name.clone(),
    };
    context::scope(scope_as(Some(current)), async {
        state
            .clients
            .create(client_create("Scoped Co", "S"))
            .await
            .unwrap();
    })
    .await;

    let created = entries(&state, "create").await;
    assert_eq!(created.len(), 1);
    let entry = &created[0];
    assert_eq!(entry.actor_id, Some(user.id));
    assert_eq!(entry.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(entry.request_path.as_deref(), Some("/api/clients"));
    assert_eq!(entry.user_agent.as_deref(), Some("audit-tests/1.0"));
}

#[tokio::test]
async fn test_untracked_module_produces_no_entries() {
    let state = test_state().await;

    state
        .users
        .create(UserCreate {
            username: "nobody".to_string(),
            password: "pass".to_string(),
            display_name: None,
        })
        .await
        .unwrap();

    assert_eq!(state.audit_storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_writing_audit_entries_never_recurses() {
    let state = test_state().await;

    // appending directly must add exactly one row each time, with no
    // cascade, however often it is repeated
    for expected in 1..=5i64 {
        state
            .audit_storage
            .append(&NewAuditEntry {
                actor_id: None,
                action: AuditAction::Login,
                subject_type: None,
                subject_id: None,
                subject_repr: Some("tester".to_string()),
                ip_address: None,
                request_path: None,
                user_agent: None,
            })
            .await
            .unwrap();
        assert_eq!(state.audit_storage.count().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_login_events_record_actor_presence() {
    let state = test_state().await;
    let user = state
        .users
        .create(UserCreate {
            username: "tester".to_string(),
            password: "pass".to_string(),
            display_name: None,
        })
        .await
        .unwrap();

    let scope = scope_as(None);
    state
        .auth_events
        .login_succeeded(&user, Some(&scope))
        .await
        .unwrap();
    state
        .auth_events
        .login_failed("{\"username\": \"tester\", \"password\": \"nope\"}", Some(&scope))
        .await
        .unwrap();

    let logins = entries(&state, "login").await;
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].actor_id, Some(user.id));
    assert_eq!(logins[0].subject_repr.as_deref(), Some("tester"));
    assert!(logins[0].subject_type.is_none());

    let failures = entries(&state, "login_failed").await;
    assert_eq!(failures.len(), 1);
    assert!(failures[0].actor_id.is_none());
    // submitted credentials are recorded verbatim
    assert!(failures[0].subject_repr.as_deref().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_audit_log_rejects_update_and_delete() {
    let state = test_state().await;
    state
        .clients
        .create(client_create("Immutable Co", "I"))
        .await
        .unwrap();

    let update = sqlx::query("UPDATE audit_log SET action = 'update' WHERE action = 'create'")
        .execute(&state.pool)
        .await;
    assert!(update.is_err());

    let delete = sqlx::query("DELETE FROM audit_log")
        .execute(&state.pool)
        .await;
    assert!(delete.is_err());

    assert_eq!(state.audit_storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleting_actor_degrades_entry_to_null() {
    let state = test_state().await;
    let user = state
        .users
        .create(UserCreate {
            username: "leaver".to_string(),
            password: "pass".to_string(),
            display_name: None,
        })
        .await
        .unwrap();

    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        display_name: user.display_name.clone(),
    };
    context::scope(scope_as(Some(current)), async {
        state
            .clients
            .create(client_create("Orphan Co", "O"))
            .await
            .unwrap();
    })
    .await;

    state.users.delete(user.id).await.unwrap();

    let created = entries(&state, "create").await;
    assert_eq!(created.len(), 1);
    // entry survives, actor reference degrades to null
    assert!(created[0].actor_id.is_none());
}

#[tokio::test]
async fn test_stale_token_actor_degrades_to_null_at_write() {
    let state = test_state().await;
    let user = state
        .users
        .create(UserCreate {
            username: "ghost".to_string(),
            password: "pass".to_string(),
            display_name: None,
        })
        .await
        .unwrap();
    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        display_name: user.display_name.clone(),
    };

    // the JWT outlives the user row
    state.users.delete(user.id).await.unwrap();

    // entity write still succeeds, actor lands as NULL
    context::scope(scope_as(Some(current.clone())), async {
        state
            .clients
            .create(client_create("Ghost Co", "G"))
            .await
            .unwrap();
    })
    .await;

    let created = entries(&state, "create").await;
    assert_eq!(created.len(), 1);
    assert!(created[0].actor_id.is_none());
    assert_eq!(created[0].subject_repr.as_deref(), Some("Ghost Co (G)"));

    // logout with the same stale identity
    state
        .auth_events
        .logged_out(Some(&current), Some(&scope_as(None)))
        .await
        .unwrap();
    let logouts = entries(&state, "logout").await;
    assert_eq!(logouts.len(), 1);
    assert!(logouts[0].actor_id.is_none());
    assert_eq!(logouts[0].subject_repr.as_deref(), Some("ghost"));
}

#[tokio::test]
async fn test_actor_nulling_cannot_rewrite_other_columns() {
    let state = test_state().await;
    let user = state
        .users
        .create(UserCreate {
            username: "writer".to_string(),
            password: "pass".to_string(),
            display_name: None,
        })
        .await
        .unwrap();
    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        display_name: user.display_name.clone(),
    };
    context::scope(scope_as(Some(current)), async {
        state
            .clients
            .create(client_create("Guarded Co", "G"))
            .await
            .unwrap();
    })
    .await;

    // the actor -> NULL carve-out does not license touching anything else
    let result = sqlx::query(
        "UPDATE audit_log SET actor_id = NULL, action = 'update' WHERE action = 'create'",
    )
    .execute(&state.pool)
    .await;
    assert!(result.is_err());

    let created = entries(&state, "create").await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].actor_id, Some(user.id));
}

#[tokio::test]
async fn test_repeated_reads_return_identical_content() {
    let state = test_state().await;
    state
        .clients
        .create(client_create("Read Co", "R"))
        .await
        .unwrap();

    let first = state
        .audit_storage
        .query(&AuditQuery::default())
        .await
        .unwrap();
    let second = state
        .audit_storage
        .query(&AuditQuery::default())
        .await
        .unwrap();

    assert_eq!(first.total, second.total);
    let ids: Vec<i64> = first.items.iter().map(|e| e.id).collect();
    let ids2: Vec<i64> = second.items.iter().map(|e| e.id).collect();
    assert_eq!(ids, ids2);
    assert_eq!(
        serde_json::to_string(&first.items).unwrap(),
        serde_json::to_string(&second.items).unwrap()
    );
}

#[tokio::test]
async fn test_file_backed_database_persists_entries_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("gestion.db");
    let db_path = db_path.to_string_lossy();

    {
        let db = DbService::new(&db_path).await.unwrap();
        let state = ServerState::with_pool(test_config(), db.pool);
        state
            .clients
            .create(client_create("Persisted Co", "P"))
            .await
            .unwrap();
        state.pool.close().await;
    }

    let db = DbService::new(&db_path).await.unwrap();
    let state = ServerState::with_pool(test_config(), db.pool);
    assert_eq!(state.audit_storage.count().await.unwrap(), 1);
    let clients = state.clients.find_all().await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].contact.company_name, "Persisted Co");
}

#[tokio::test]
async fn test_query_is_newest_first_and_filterable() {
    let state = test_state().await;
    let client = state
        .clients
        .create(client_create("Order Co", "O"))
        .await
        .unwrap();
    state
        .clients
        .update(client.id, ClientUpdate::default())
        .await
        .unwrap();
    state.clients.delete(client.id).await.unwrap();

    let all = state
        .audit_storage
        .query(&AuditQuery::default())
        .await
        .unwrap();
    assert_eq!(all.total, 3);
    let actions: Vec<&str> = all.items.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["delete", "update", "create"]);

    let filtered = state
        .audit_storage
        .query(&AuditQuery {
            subject_type: Some("client".to_string()),
            action: Some("delete".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.total, 1);
}
