// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public project routes: the filtered map view and the active dataset.

use crate::db::ActiveDataset;
use crate::error::{AppError, Result};
use crate::models::{Bounds, Facet, FilterSelection, ProjectCollection, RoutePath};
use crate::routes::PageQuery;
use crate::services::filter::show_everything;
use crate::services::{compute_bounds, facet_options, filter_projects, FacetOptions};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Longest accepted selector value.
const MAX_FACET_LEN: usize = 200;
/// Most title entries accepted in one query.
const MAX_TITLES: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/projects", get(get_projects))
        .route("/api/projects/facets", get(get_facets))
        .route("/api/route-paths", get(get_route_paths))
        .route("/api/geojson/active", get(get_active_dataset))
        .route("/projects.geojson", get(get_projects_geojson))
}

// ─── Selection query ─────────────────────────────────────────

/// Filter selection as query parameters.
///
/// `type`, `year` and `funding` accept a value or `All`; `title` may repeat;
/// `layers` is comma-separated and defaults to every type in the dataset.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub year: Option<String>,
    pub funding: Option<String>,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default, deserialize_with = "present")]
    pub layers: Option<String>,
}

/// Keeps `layers=` (present but empty) distinct from an absent parameter.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

impl SelectionQuery {
    /// Build the filter selection against a collection.
    pub fn to_selection(&self, collection: &ProjectCollection) -> Result<FilterSelection> {
        let too_long = [&self.project_type, &self.year, &self.funding, &self.layers]
            .into_iter()
            .flatten()
            .chain(self.title.iter())
            .any(|v| v.len() > MAX_FACET_LEN);
        if too_long || self.title.len() > MAX_TITLES {
            return Err(AppError::BadRequest("Filter value too long".to_string()));
        }

        let mut selection = show_everything(collection);
        selection.project_type = Facet::parse(self.project_type.as_deref());
        selection.year = Facet::parse(self.year.as_deref());
        selection.funding_source = Facet::parse(self.funding.as_deref());
        selection.titles = self
            .title
            .iter()
            .map(|t| Facet::parse(Some(t)))
            .collect();

        if let Some(layers) = &self.layers {
            selection.active_layers = parse_layers(layers);
        }

        Ok(selection)
    }
}

fn parse_layers(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn active_dataset(state: &AppState) -> Result<Arc<ActiveDataset>> {
    state
        .store
        .dataset()
        .ok_or_else(|| AppError::NotFound("No active dataset".to_string()))
}

// ─── Filtered view ───────────────────────────────────────────

/// An overlay route path in `[lat, lng]` vertex order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    pub project_type: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl From<&RoutePath> for PathResponse {
    fn from(path: &RoutePath) -> Self {
        Self {
            project_type: path.project_type.clone(),
            coordinates: path.lat_lng_vertices(),
        }
    }
}

/// Filtered projects plus the viewport that frames them.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub filename: String,
    pub name: Option<String>,
    pub total: usize,
    pub visible: usize,
    /// Absent when nothing is visible; the map should not be shown yet
    pub bounds: Option<Bounds>,
    pub paths: Vec<PathResponse>,
    /// Visible features, or one page of them when `page`/`per_page` is given
    pub features: Vec<geojson::Feature>,
}

async fn get_projects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionQuery>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<ProjectsResponse>> {
    let dataset = active_dataset(&state)?;
    let selection = params.to_selection(&dataset.collection)?;

    let filtered = filter_projects(&dataset.collection, &selection);
    let paths = state.store.visible_paths(&selection.active_layers);
    let bounds = compute_bounds(&filtered.features, &paths);

    tracing::debug!(
        filename = %dataset.filename,
        total = dataset.collection.len(),
        visible = filtered.len(),
        paths = paths.len(),
        "Filtered projects"
    );

    Ok(Json(ProjectsResponse {
        filename: dataset.filename.clone(),
        name: filtered.name.clone(),
        total: dataset.collection.len(),
        visible: filtered.len(),
        bounds,
        paths: paths.iter().map(PathResponse::from).collect(),
        features: paging
            .apply(filtered.features.iter().collect::<Vec<_>>())?
            .into_iter()
            .map(|f| f.to_geojson())
            .collect(),
    }))
}

/// Every configured overlay path, regardless of layer.
async fn get_route_paths(State(state): State<Arc<AppState>>) -> Json<Vec<PathResponse>> {
    Json(
        state
            .store
            .route_paths()
            .iter()
            .map(PathResponse::from)
            .collect(),
    )
}

async fn get_facets(State(state): State<Arc<AppState>>) -> Result<Json<FacetOptions>> {
    let dataset = active_dataset(&state)?;
    Ok(Json(facet_options(&dataset.collection)))
}

// ─── Active dataset ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDatasetResponse {
    pub filename: String,
    pub geojson_data: geojson::FeatureCollection,
}

async fn get_active_dataset(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActiveDatasetResponse>> {
    let dataset = active_dataset(&state)?;
    Ok(Json(ActiveDatasetResponse {
        filename: dataset.filename.clone(),
        geojson_data: dataset.collection.to_geojson(),
    }))
}

async fn get_projects_geojson(
    State(state): State<Arc<AppState>>,
) -> Result<Json<geojson::FeatureCollection>> {
    let dataset = active_dataset(&state)?;
    Ok(Json(dataset.collection.to_geojson()))
}
