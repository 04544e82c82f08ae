// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod comments;
pub mod datasets;
pub mod export;
pub mod projects;

use crate::error::{AppError, Result};
use crate::middleware::auth::require_admin;
use crate::AppState;
use axum::http::{header, Method};
use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
    pub active_dataset: Option<String>,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
        active_dataset: state.store.dataset().map(|d| d.filename.clone()),
    })
}

/// Simple `{ message }` response body shared by several handlers.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

// ─── Pagination ──────────────────────────────────────────────

/// Items per page when only `page` is given.
const DEFAULT_PER_PAGE: u32 = 5;
const MAX_PER_PAGE: u32 = 100;

/// Optional `page`/`per_page` parameters for list endpoints.
///
/// Without either parameter the whole list is returned.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed)
    pub page: Option<u32>,
    /// Items per page
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Keep only the requested page of `items`.
    pub fn apply<T>(&self, items: Vec<T>) -> Result<Vec<T>> {
        if self.page.is_none() && self.per_page.is_none() {
            return Ok(items);
        }

        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::BadRequest(
                "Invalid 'page' parameter: must be at least 1".to_string(),
            ));
        }
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if per_page < 1 {
            return Err(AppError::BadRequest(
                "Invalid 'per_page' parameter: must be at least 1".to_string(),
            ));
        }

        let limit = per_page.min(MAX_PER_PAGE) as usize;
        let start = (page as usize - 1).saturating_mul(limit);
        Ok(items.into_iter().skip(start).take(limit).collect())
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (map viewers and commenters)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(projects::routes())
        .merge(comments::routes())
        .merge(auth::routes());

    // Admin routes (session required)
    let admin_routes = Router::new()
        .merge(auth::session_routes())
        .merge(datasets::routes())
        .merge(export::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
