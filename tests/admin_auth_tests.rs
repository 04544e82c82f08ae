// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Admin routes reject requests without a valid session
//! 2. Login issues a token and an HttpOnly session cookie
//! 3. Both the cookie and the bearer token unlock admin routes
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

mod common;

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_admin_route_without_token() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/geojson/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_route_with_invalid_token() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/geojson/list")
                .header(header::AUTHORIZATION, "Bearer invalid.token.here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_without_admin_role_rejected() {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        role: String,
        exp: usize,
        iat: usize,
    }

    let (app, state, _dir) = common::create_test_app().await;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    let token = encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: "viewer@example.com".to_string(),
            role: "viewer".to_string(),
            exp: now + 3600,
            iat: now,
        },
        &EncodingKey::from_secret(&state.config.jwt_signing_key),
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/geojson/list")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(login_request("admin@example.com", "wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie_headers(&response).is_empty());
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .clone()
        .oneshot(login_request("admin@example.com", "test_password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookie_headers(&response);
    let session = cookies
        .iter()
        .find(|c| c.starts_with("project_map_session="))
        .cloned()
        .unwrap_or_else(|| panic!("missing session cookie: {cookies:?}"));
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Path=/"));

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Login successful!");
    let token = body["token"].as_str().unwrap().to_string();

    // Cookie alone unlocks admin routes
    let cookie_pair = session.split(';').next().unwrap().to_string();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/session")
                .header(header::COOKIE, cookie_pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["email"], "admin@example.com");

    // So does the bearer token
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/geojson/list")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_removes_cookie() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(header::COOKIE, "project_map_session=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookie_headers(&response);
    let removal = cookies
        .iter()
        .find(|c| c.starts_with("project_map_session="))
        .unwrap_or_else(|| panic!("missing removal cookie: {cookies:?}"));
    assert!(removal.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/comments")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_dataset"], common::SAMPLE_FILENAME);
}
