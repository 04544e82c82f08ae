// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin login and session routes.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use validator::Validate;

use crate::config::{SESSION_COOKIE, SESSION_TTL_SECS};
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AdminUser};
use crate::routes::MessageResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}

/// Routes that sit behind `require_admin`.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/session", get(session))
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub email: String,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

/// Check the admin credentials and issue a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    body.validate()?;

    let email_ok = body
        .email
        .trim()
        .as_bytes()
        .ct_eq(state.config.admin_email.as_bytes());
    let password_ok = body
        .password
        .as_bytes()
        .ct_eq(state.config.admin_password.as_bytes());

    if !bool::from(email_ok & password_ok) {
        tracing::warn!("Rejected admin login");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(&state.config.admin_email, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(email = %state.config.admin_email, "Admin logged in");

    Ok((
        jar.add(session_cookie(token.clone())),
        Json(LoginResponse {
            message: "Login successful!".to_string(),
            token,
        }),
    ))
}

/// Drop the session cookie. Bearer tokens simply expire.
async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

async fn session(Extension(admin): Extension<AdminUser>) -> Json<SessionResponse> {
    Json(SessionResponse { email: admin.email })
}
