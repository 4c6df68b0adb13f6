//! Item handlers

use crate::error::ApiError;
use crate::extractors::ItemPayload;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use todo_core::Item;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    result: &'static str,
}

pub async fn create(
    State(state): State<AppState>,
    ItemPayload(item): ItemPayload,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let created = state.store.create_item(&item).await?;
    debug!("Created item {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.store.all_items().await?;
    Ok(Json(items))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let item = state.store.get_item(&id).await?;
    Ok(Json(item))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ItemPayload(item): ItemPayload,
) -> Result<Json<Item>, ApiError> {
    let updated = state.store.update_item(&id, &item).await?;
    debug!("Updated item {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.store.delete_item(&id).await?;
    debug!("Deleted item {}", id);
    Ok(Json(DeleteResponse { result: "success" }))
}
