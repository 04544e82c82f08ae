// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed client for the project map API.
//!
//! Handles:
//! - Loading the active dataset, route paths and comments
//! - Comment submission
//! - Admin login and dataset management
//! - CSV downloads

pub mod cancel;
pub mod comment_form;
pub mod session;

pub use cancel::{run_cancellable, CancellationToken};
pub use comment_form::{CommentForm, CommentSink, FormStatus, SubmitError};
pub use session::{MapSession, MapView};

use crate::models::filter::ALL;
use crate::models::{Comment, Facet, FilterSelection, NewComment, ProjectCollection, RoutePath};
use crate::routes::auth::{LoginRequest, LoginResponse};
use crate::routes::datasets::{DatasetResponse, SetActiveRequest};
use crate::routes::projects::{ActiveDatasetResponse, PathResponse, ProjectsResponse};
use crate::routes::MessageResponse;
use crate::services::dataset::{convert_collection, DatasetError};
use crate::services::export::ExportError;
use crate::services::FacetOptions;
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock};

/// Errors from client calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not authorized")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid dataset: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// The active dataset as seen by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDataset {
    pub filename: String,
    pub collection: ProjectCollection,
}

/// Project map API client. Clones share the session token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current admin session token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // ─── Public API ──────────────────────────────────────────────

    /// Fetch and validate the active dataset.
    pub async fn fetch_active_dataset(&self) -> Result<RemoteDataset, ClientError> {
        let response = self.http.get(self.url("/api/geojson/active")).send().await?;
        let body: ActiveDatasetResponse = check_response_json(response).await?;

        Ok(RemoteDataset {
            filename: body.filename,
            collection: convert_collection(body.geojson_data)?,
        })
    }

    /// Fetch every overlay route path.
    pub async fn fetch_route_paths(&self) -> Result<Vec<RoutePath>, ClientError> {
        let response = self.http.get(self.url("/api/route-paths")).send().await?;
        let paths: Vec<PathResponse> = check_response_json(response).await?;

        Ok(paths
            .iter()
            .map(|p| RoutePath::from_lat_lng(p.project_type.clone(), &p.coordinates))
            .collect())
    }

    /// Ask the server to filter and frame the active dataset.
    pub async fn fetch_projects(
        &self,
        selection: &FilterSelection,
    ) -> Result<ProjectsResponse, ClientError> {
        let response = self
            .http
            .get(self.url("/api/projects"))
            .query(&selection_query(selection))
            .send()
            .await?;
        check_response_json(response).await
    }

    pub async fn fetch_facets(&self) -> Result<FacetOptions, ClientError> {
        let response = self.http.get(self.url("/api/projects/facets")).send().await?;
        check_response_json(response).await
    }

    /// List comments, optionally only those of one project.
    pub async fn list_comments(
        &self,
        project_id: Option<&str>,
    ) -> Result<Vec<Comment>, ClientError> {
        let mut request = self.http.get(self.url("/api/comments"));
        if let Some(project_id) = project_id {
            request = request.query(&[("projectId", project_id)]);
        }
        check_response_json(request.send().await?).await
    }

    /// Submit a comment and return the stored form.
    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment, ClientError> {
        let response = self
            .http
            .post(self.url("/api/comments"))
            .json(comment)
            .send()
            .await?;
        check_response_json(response).await
    }

    // ─── Admin session ───────────────────────────────────────────

    /// Log in as admin. The returned token is kept for later admin calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/login"))
            .json(&body)
            .send()
            .await?;
        let login: LoginResponse = check_response_json(response).await?;

        tracing::info!(message = %login.message, "Admin session started");
        self.set_token(Some(login.token.clone()));
        Ok(login.token)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url("/api/logout")).send().await?;
        self.set_token(None);
        let _: MessageResponse = check_response_json(response).await?;
        Ok(())
    }

    pub async fn is_session_valid(&self) -> Result<bool, ClientError> {
        if self.token().is_none() {
            return Ok(false);
        }
        let response = self
            .authorized(self.http.get(self.url("/api/session")))
            .send()
            .await?;
        match check_response(response).await {
            Ok(_) => Ok(true),
            Err(ClientError::Unauthorized) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ─── Admin datasets ──────────────────────────────────────────

    pub async fn list_datasets(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .authorized(self.http.get(self.url("/api/geojson/list")))
            .send()
            .await?;
        check_response_json(response).await
    }

    pub async fn set_active_dataset(&self, filename: &str) -> Result<DatasetResponse, ClientError> {
        let body = SetActiveRequest {
            filename: filename.to_string(),
        };
        let response = self
            .authorized(self.http.post(self.url("/api/geojson/set-active")))
            .json(&body)
            .send()
            .await?;
        check_response_json(response).await
    }

    /// Upload a dataset file under `filename`.
    pub async fn upload_dataset(
        &self,
        filename: &str,
        contents: String,
    ) -> Result<DatasetResponse, ClientError> {
        let part = reqwest::multipart::Part::text(contents)
            .file_name(filename.to_string())
            .mime_str("application/geo+json")?;
        let form = reqwest::multipart::Form::new().part("geojson", part);

        let response = self
            .authorized(self.http.post(self.url("/api/geojson/upload")))
            .multipart(form)
            .send()
            .await?;
        check_response_json(response).await
    }

    pub async fn delete_all_datasets(&self) -> Result<(), ClientError> {
        let response = self
            .authorized(self.http.delete(self.url("/api/geojson/delete-all")))
            .send()
            .await?;
        let _: MessageResponse = check_response_json(response).await?;
        Ok(())
    }

    // ─── Admin exports ───────────────────────────────────────────

    /// Download a server-side CSV export, e.g. `/api/export/comments`.
    pub async fn download_export(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .authorized(self.http.get(self.url(path)))
            .send()
            .await?;
        let response = check_response(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Query pairs for a selection, in the server's `/api/projects` format.
pub fn selection_query(selection: &FilterSelection) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    for (key, facet) in [
        ("type", &selection.project_type),
        ("year", &selection.year),
        ("funding", &selection.funding_source),
    ] {
        if let Facet::Only(value) = facet {
            query.push((key, value.clone()));
        }
    }
    for title in &selection.titles {
        let value = match title {
            Facet::Only(value) => value.clone(),
            Facet::All => ALL.to_string(),
        };
        query.push(("title", value));
    }
    let layers: Vec<&str> = selection.active_layers.iter().map(String::as_str).collect();
    query.push(("layers", layers.join(",")));
    query
}

/// Check response status and return an error if not successful.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 401 {
        return Err(ClientError::Unauthorized);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Check response and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    check_response(response)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}
