//! Suppliers API 模块 (供应商 CRUD)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/suppliers", get(handler::list).post(handler::create))
        .route(
            "/api/suppliers/{id}",
            get(handler::get_one)
                .put(handler::update)
                .delete(handler::delete),
        )
}
