// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dataset management: list, inspect, upload, activate, delete.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::routes::MessageResponse;
use crate::AppState;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Multipart field carrying the uploaded file.
const UPLOAD_FIELD: &str = "geojson";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/geojson/list", get(list_datasets))
        .route("/api/geojson/set-active", post(set_active))
        .route(
            "/api/geojson/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/geojson/delete-all", delete(delete_all))
        .route("/api/geojson/{filename}", get(get_dataset))
}

async fn list_datasets(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.library.list().await?))
}

/// Raw stored file, exactly as uploaded.
async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    let raw = state.library.read_raw(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "application/geo+json")], raw))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetActiveRequest {
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub message: String,
    pub filename: String,
    pub count: usize,
}

/// Make a stored dataset the one every viewer sees.
async fn set_active(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<DatasetResponse>> {
    let _writes = state.dataset_writes.lock().await;
    let collection = state.library.load(&body.filename).await?;
    let count = collection.len();

    state.library.set_active(&body.filename).await?;
    state.store.replace_dataset(body.filename.clone(), collection);

    Ok(Json(DatasetResponse {
        message: format!("{} is now the active dataset", body.filename),
        filename: body.filename,
        count,
    }))
}

/// Store an uploaded dataset. Uploading does not activate it.
async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DatasetResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Upload has no filename".to_string()))?;
        let contents = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Unreadable upload: {}", e)))?;

        let collection = {
            let _writes = state.dataset_writes.lock().await;
            state.library.save(&filename, &contents).await?
        };

        return Ok((
            StatusCode::CREATED,
            Json(DatasetResponse {
                message: format!("{} uploaded", filename),
                filename,
                count: collection.len(),
            }),
        ));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{}'",
        UPLOAD_FIELD
    )))
}

/// Remove every stored dataset and clear the map.
async fn delete_all(State(state): State<Arc<AppState>>) -> Result<Json<MessageResponse>> {
    let _writes = state.dataset_writes.lock().await;
    let removed = state.library.delete_all().await?;
    state.store.clear_dataset();

    Ok(Json(MessageResponse {
        message: format!("Deleted {} datasets", removed),
    }))
}
