// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin CSV exports of projects and comments.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::routes::comments::CommentsQuery;
use crate::routes::projects::{active_dataset, SelectionQuery};
use crate::services::export::{
    single_record_filename, ALL_COMMENTS_FILENAME, ALL_PROJECTS_FILENAME,
};
use crate::services::{encode_csv, filter_projects, ExportRecord};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/export/projects", get(export_projects))
        .route("/api/export/projects/{id}", get(export_project))
        .route("/api/export/comments", get(export_comments))
        .route("/api/export/comments/{id}", get(export_comment))
}

/// Encode rows and wrap them as a CSV attachment.
fn csv_attachment<R: ExportRecord>(rows: &[R], filename: &str) -> Result<Response> {
    let body = encode_csv(rows)?;
    tracing::info!(filename, rows = rows.len(), "Exported CSV");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// Export the projects visible under a selection (all of them by default).
async fn export_projects(
    State(state): State<Arc<AppState>>,
    axum_extra::extract::Query(params): axum_extra::extract::Query<SelectionQuery>,
) -> Result<Response> {
    let dataset = active_dataset(&state).map_err(|_| no_dataset())?;
    let selection = params.to_selection(&dataset.collection)?;
    let filtered = filter_projects(&dataset.collection, &selection);

    csv_attachment(&filtered.features, ALL_PROJECTS_FILENAME)
}

async fn export_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let dataset = active_dataset(&state).map_err(|_| no_dataset())?;
    let feature = dataset
        .collection
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))?;

    csv_attachment(std::slice::from_ref(feature), &single_record_filename(feature))
}

/// Export every comment, or those of one project.
async fn export_comments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CommentsQuery>,
) -> Result<Response> {
    let comments = match params.project_id.as_deref() {
        Some(project_id) => state.store.comments_for(project_id),
        None => state.store.comments().as_ref().clone(),
    };

    csv_attachment(&comments, ALL_COMMENTS_FILENAME)
}

async fn export_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let comment = state
        .store
        .comment(&id)
        .ok_or_else(|| AppError::NotFound(format!("Comment {}", id)))?;

    csv_attachment(std::slice::from_ref(&comment), &single_record_filename(&comment))
}

fn no_dataset() -> AppError {
    AppError::NoData("No active dataset to export".to_string())
}
