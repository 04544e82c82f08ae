// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public comment routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{Comment, NewComment};
use crate::routes::PageQuery;
use crate::time_utils::is_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/comments", get(list_comments).post(create_comment))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    pub project_id: Option<String>,
}

/// List comments, optionally for one project, in submission order.
async fn list_comments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CommentsQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<Vec<Comment>>> {
    let comments = match params.project_id.as_deref() {
        Some(project_id) => state.store.comments_for(project_id),
        None => state.store.comments().as_ref().clone(),
    };
    Ok(Json(paging.apply(comments)?))
}

/// Store a submitted comment and return it with its id.
async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    body.validate()?;
    if !is_rfc3339(&body.timestamp) {
        return Err(AppError::BadRequest(
            "timestamp must be RFC 3339".to_string(),
        ));
    }

    let comment = Comment::from_new(body, uuid::Uuid::new_v4().to_string());
    state.store.append_comment(comment.clone());

    tracing::info!(
        project_id = %comment.project_id,
        comment_id = comment.id.as_deref().unwrap_or_default(),
        "Comment stored"
    );

    Ok((StatusCode::CREATED, Json(comment)))
}
