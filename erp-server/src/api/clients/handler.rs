//! Client CRUD Handlers
//!
//! Thin wrappers over the repository; audit entries are written by the
//! registered lifecycle listeners, not here.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use crate::utils::{AppError, AppResponse, ok};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<AppResponse<Vec<Client>>>, AppError> {
    let clients = state.clients.find_all().await?;
    Ok(ok(clients))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<AppResponse<Client>>, AppError> {
    let client = state
        .clients
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {id} not found")))?;
    Ok(ok(client))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ClientCreate>,
) -> Result<Json<AppResponse<Client>>, AppError> {
    data.validate()?;
    let client = state.clients.create(data).await?;
    Ok(ok(client))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<ClientUpdate>,
) -> Result<Json<AppResponse<Client>>, AppError> {
    data.validate()?;
    let client = state.clients.update(id, data).await?;
    Ok(ok(client))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<AppResponse<()>>, AppError> {
    state.clients.delete(id).await?;
    Ok(ok(()))
}
