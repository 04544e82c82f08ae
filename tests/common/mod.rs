// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::response::Response;
use project_map::config::Config;
use project_map::middleware::auth::create_jwt;
use project_map::models::RoutePath;
use project_map::routes::create_router;
use project_map::AppState;
use std::sync::Arc;
use tempfile::TempDir;

pub const SAMPLE_FILENAME: &str = "projects.geojson";

/// Three projects across three types, with mixed id and year encodings.
pub const SAMPLE_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "name": "Test Projects",
  "features": [
    {
      "type": "Feature",
      "id": "tip-101",
      "properties": {
        "project_id": 101,
        "project_title": "Main St Widening",
        "project_type": "Roadway",
        "year": 2025,
        "product": "STBG",
        "cost": 1200000,
        "locality": "Kennewick"
      },
      "geometry": { "type": "Point", "coordinates": [-119.28, 46.21] }
    },
    {
      "type": "Feature",
      "properties": {
        "project_id": "102",
        "project_title": "Route 3 Frequency",
        "project_type": "Transit",
        "year": "2026",
        "product": "FTA 5307"
      },
      "geometry": {
        "type": "LineString",
        "coordinates": [[-119.30, 46.25], [-119.25, 46.27]]
      }
    },
    {
      "type": "Feature",
      "properties": {
        "project_id": "103",
        "project_title": "Canal Trail",
        "project_type": "Bike/Ped",
        "year": 2025.0,
        "product": "STBG"
      },
      "geometry": { "type": "Point", "coordinates": [-119.10, 46.10] }
    }
  ]
}"#;

/// Create a test app backed by a temporary data directory holding the
/// sample dataset, which is also active.
/// Returns the router, the shared state and the directory guard.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::test_default();
    config.data_dir = dir.path().to_path_buf();

    let state = Arc::new(AppState::new(config));
    let collection = state
        .library
        .save(SAMPLE_FILENAME, SAMPLE_GEOJSON)
        .await
        .expect("sample dataset should be valid");
    state.library.set_active(SAMPLE_FILENAME).await.unwrap();
    state.store.replace_dataset(SAMPLE_FILENAME, collection);
    state.store.set_route_paths(vec![RoutePath::from_lat_lng(
        "Transit",
        &[[46.30, -119.40], [46.28, -119.35]],
    )]);

    (create_router(state.clone()), state, dir)
}

/// Create a test app with an empty data directory and nothing active.
#[allow(dead_code)]
pub fn create_empty_app() -> (axum::Router, Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = Config::test_default();
    config.data_dir = dir.path().to_path_buf();

    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state, dir)
}

/// A valid admin session token for the test config.
#[allow(dead_code)]
pub fn admin_token(state: &AppState) -> String {
    create_jwt(&state.config.admin_email, &state.config.jwt_signing_key).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
