//! Clients API 模块 (客户 CRUD)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/clients", get(handler::list).post(handler::create))
        .route(
            "/api/clients/{id}",
            get(handler::get_one)
                .put(handler::update)
                .delete(handler::delete),
        )
}
