// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Comment API tests.
//!
//! These tests verify that:
//! 1. Valid comments are stored with a server-assigned id
//! 2. Blank fields and malformed timestamps are rejected
//! 3. Listing can be narrowed to one project

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

fn post_comment(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/comments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_comment_assigns_id() {
    let (app, state, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(post_comment(json!({
            "projectId": "101",
            "name": "Kai",
            "comment": "Please add a crosswalk",
            "timestamp": "2025-03-01T10:00:00.000Z"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = common::body_json(response).await;
    let id = body["id"].as_str().expect("id assigned");
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(body["projectId"], "101");

    let stored = state.store.comments_for("101");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id.as_deref(), Some(id));
}

#[tokio::test]
async fn test_empty_name_rejected() {
    let (app, state, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(post_comment(json!({
            "projectId": "101",
            "name": "",
            "comment": "Hello",
            "timestamp": "2025-03-01T10:00:00Z"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_failed");
    assert!(state.store.comments().is_empty());
}

#[tokio::test]
async fn test_whitespace_comment_rejected() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(post_comment(json!({
            "projectId": "101",
            "name": "Kai",
            "comment": "  \n ",
            "timestamp": "2025-03-01T10:00:00Z"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_timestamp_rejected() {
    let (app, _, _dir) = common::create_test_app().await;

    let response = app
        .oneshot(post_comment(json!({
            "projectId": "101",
            "name": "Kai",
            "comment": "Hello",
            "timestamp": "yesterday"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_list_filters_by_project() {
    let (app, _, _dir) = common::create_test_app().await;

    for (project_id, name) in [("101", "Kai"), ("102", "Ana"), ("101", "Lee")] {
        let response = app
            .clone()
            .oneshot(post_comment(json!({
                "projectId": project_id,
                "name": name,
                "comment": "Comment",
                "timestamp": "2025-03-01T10:00:00Z"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/comments?projectId=101")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = common::body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Kai", "Lee"]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/comments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_comments_paginates() {
    let (app, state, _dir) = common::create_test_app().await;
    for i in 1..=7 {
        state.store.append_comment(project_map::models::Comment {
            id: Some(format!("c-{}", i)),
            project_id: "101".to_string(),
            name: format!("Commenter {}", i),
            comment: "Looks good".to_string(),
            timestamp: "2025-03-01T10:00:00.000Z".to_string(),
        });
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/comments?projectId=101&page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c-6", "c-7"]);

    // page=0 would underflow the offset
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/comments?page=0&per_page=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
