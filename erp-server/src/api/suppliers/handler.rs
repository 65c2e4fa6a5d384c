//! Supplier CRUD Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Supplier, SupplierCreate, SupplierUpdate};
use crate::utils::{AppError, AppResponse, ok};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<AppResponse<Vec<Supplier>>>, AppError> {
    let suppliers = state.suppliers.find_all().await?;
    Ok(ok(suppliers))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<AppResponse<Supplier>>, AppError> {
    let supplier = state
        .suppliers
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Supplier {id} not found")))?;
    Ok(ok(supplier))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<SupplierCreate>,
) -> Result<Json<AppResponse<Supplier>>, AppError> {
    data.validate()?;
    let supplier = state.suppliers.create(data).await?;
    Ok(ok(supplier))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(data): Json<SupplierUpdate>,
) -> Result<Json<AppResponse<Supplier>>, AppError> {
    data.validate()?;
    let supplier = state.suppliers.update(id, data).await?;
    Ok(ok(supplier))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<AppResponse<()>>, AppError> {
    state.suppliers.delete(id).await?;
    Ok(ok(()))
}
