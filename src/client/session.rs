// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! A viewer's map session: the local dataset copy, the current filter
//! selection and the admin token.

use super::{run_cancellable, ApiClient, CancellationToken, ClientError, CommentForm};
use crate::db::DatasetStore;
use crate::models::{Bounds, FilterSelection, FilterUpdate, ProjectCollection, RoutePath};
use crate::services::export::{
    single_record_filename, write_csv_file, ALL_COMMENTS_FILENAME, ALL_PROJECTS_FILENAME,
};
use crate::services::filter::show_everything;
use crate::services::{compute_bounds, filter_projects};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What the map should draw for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub projects: ProjectCollection,
    pub paths: Vec<RoutePath>,
    /// `None` until something is visible
    pub bounds: Option<Bounds>,
}

struct SelectionState {
    selection: FilterSelection,
    /// Token for work started under the current selection
    refresh: CancellationToken,
}

pub struct MapSession {
    client: ApiClient,
    store: DatasetStore,
    state: Mutex<SelectionState>,
}

impl MapSession {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            store: DatasetStore::new(),
            state: Mutex::new(SelectionState {
                selection: FilterSelection::default(),
                refresh: CancellationToken::new(),
            }),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn is_admin(&self) -> bool {
        self.client.token().is_some()
    }

    // ─── Selection ───────────────────────────────────────────────

    pub fn selection(&self) -> FilterSelection {
        self.lock_state().selection.clone()
    }

    /// Apply one filter change. Work started under the old selection is
    /// cancelled.
    pub fn update_selection(&self, update: FilterUpdate) -> FilterSelection {
        let mut state = self.lock_state();
        state.selection = state.selection.apply(update);
        state.refresh.cancel();
        state.refresh = CancellationToken::new();

        tracing::debug!(selection = ?state.selection, "Filter selection changed");
        state.selection.clone()
    }

    /// Token that is cancelled by the next selection change.
    pub fn refresh_token(&self) -> CancellationToken {
        self.lock_state().refresh.clone()
    }

    /// Filter the local dataset copy and frame the result.
    pub fn visible(&self) -> MapView {
        let selection = self.selection();
        let paths = self.store.visible_paths(&selection.active_layers);

        let projects = match self.store.dataset() {
            Some(dataset) => filter_projects(&dataset.collection, &selection),
            None => ProjectCollection::default(),
        };
        let bounds = compute_bounds(&projects.features, &paths);

        MapView {
            projects,
            paths,
            bounds,
        }
    }

    // ─── Loading ─────────────────────────────────────────────────

    /// Reload the active dataset. A different dataset resets the selection
    /// to show everything.
    pub async fn refresh_dataset(&self) -> Result<(), ClientError> {
        let token = self.refresh_token();
        let remote = run_cancellable(&token, self.client.fetch_active_dataset()).await?;

        let changed = self
            .store
            .dataset()
            .is_none_or(|current| current.filename != remote.filename);
        if changed {
            let mut state = self.lock_state();
            state.selection = show_everything(&remote.collection);
        }

        self.store.replace_dataset(remote.filename, remote.collection);
        Ok(())
    }

    pub async fn refresh_route_paths(&self) -> Result<(), ClientError> {
        let token = self.refresh_token();
        let paths = run_cancellable(&token, self.client.fetch_route_paths()).await?;
        self.store.set_route_paths(paths);
        Ok(())
    }

    pub async fn refresh_comments(&self) -> Result<(), ClientError> {
        let token = self.refresh_token();
        let comments = run_cancellable(&token, self.client.list_comments(None)).await?;
        self.store.replace_comments(comments);
        Ok(())
    }

    /// Dataset, paths and comments in one go.
    pub async fn refresh_all(&self) -> Result<(), ClientError> {
        self.refresh_dataset().await?;
        self.refresh_route_paths().await?;
        self.refresh_comments().await
    }

    /// A fresh comment form for one project.
    pub fn comment_form(&self, project_id: impl Into<String>) -> CommentForm {
        CommentForm::new(project_id)
    }

    // ─── Admin ───────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        self.client.login(email, password).await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.client.logout().await
    }

    /// Switch every viewer to another stored dataset, then reload it here.
    pub async fn set_active_dataset(&self, filename: &str) -> Result<(), ClientError> {
        self.client.set_active_dataset(filename).await?;
        self.refresh_dataset().await
    }

    // ─── Export ──────────────────────────────────────────────────

    /// Write the currently visible projects to `dir/all_projects.csv`.
    pub async fn export_visible_projects(&self, dir: &Path) -> Result<PathBuf, ClientError> {
        let view = self.visible();
        Ok(write_csv_file(&view.projects.features, dir, ALL_PROJECTS_FILENAME).await?)
    }

    /// Write one project to `dir/project_<id>.csv`.
    pub async fn export_project(
        &self,
        dir: &Path,
        project_id: &str,
    ) -> Result<PathBuf, ClientError> {
        let dataset = self.store.dataset();
        let rows: Vec<_> = dataset
            .as_ref()
            .and_then(|d| d.collection.get(project_id))
            .cloned()
            .into_iter()
            .collect();
        let filename = match rows.first() {
            Some(feature) => single_record_filename(feature),
            None => format!("project_{}.csv", project_id),
        };
        Ok(write_csv_file(&rows, dir, &filename).await?)
    }

    /// Write comments to `dir/all_comments.csv`, optionally for one project.
    pub async fn export_comments(
        &self,
        dir: &Path,
        project_id: Option<&str>,
    ) -> Result<PathBuf, ClientError> {
        let comments = match project_id {
            Some(project_id) => self.store.comments_for(project_id),
            None => self.store.comments().as_ref().clone(),
        };
        Ok(write_csv_file(&comments, dir, ALL_COMMENTS_FILENAME).await?)
    }

    /// Write one comment to `dir/comment_<id>.csv`.
    pub async fn export_comment(&self, dir: &Path, id: &str) -> Result<PathBuf, ClientError> {
        let rows: Vec<_> = self.store.comment(id).into_iter().collect();
        let filename = match rows.first() {
            Some(comment) => single_record_filename(comment),
            None => format!("comment_{}.csv", id),
        };
        Ok(write_csv_file(&rows, dir, &filename).await?)
    }

    fn lock_state(&self) -> MutexGuard<'_, SelectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
