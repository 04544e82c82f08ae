// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for the active dataset and the comment list.
//!
//! Readers get `Arc` snapshots; writers swap or copy-on-write the shared
//! value, so a snapshot never changes after it has been handed out.

use crate::models::{Comment, ProjectCollection, RoutePath};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// The dataset currently shown on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDataset {
    pub filename: String,
    pub collection: ProjectCollection,
}

#[derive(Default)]
struct StoreInner {
    dataset: RwLock<Option<Arc<ActiveDataset>>>,
    comments: RwLock<Arc<Vec<Comment>>>,
    route_paths: RwLock<Arc<Vec<RoutePath>>>,
}

/// Shared handle to the dataset and comments. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct DatasetStore {
    inner: Arc<StoreInner>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Dataset ─────────────────────────────────────────────────

    /// Snapshot of the active dataset, if one is loaded.
    pub fn dataset(&self) -> Option<Arc<ActiveDataset>> {
        self.inner
            .dataset
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new active dataset wholesale.
    pub fn replace_dataset(&self, filename: impl Into<String>, collection: ProjectCollection) {
        let dataset = Arc::new(ActiveDataset {
            filename: filename.into(),
            collection,
        });
        tracing::info!(
            filename = %dataset.filename,
            count = dataset.collection.len(),
            "Active dataset replaced"
        );
        *self
            .inner
            .dataset
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(dataset);
    }

    pub fn clear_dataset(&self) {
        *self
            .inner
            .dataset
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    // ─── Comments ────────────────────────────────────────────────

    /// Snapshot of every comment, in arrival order.
    pub fn comments(&self) -> Arc<Vec<Comment>> {
        self.inner
            .comments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Comments for one project, in arrival order.
    pub fn comments_for(&self, project_id: &str) -> Vec<Comment> {
        self.comments()
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect()
    }

    /// Find a comment by its server id.
    pub fn comment(&self, id: &str) -> Option<Comment> {
        self.comments()
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .cloned()
    }

    pub fn replace_comments(&self, comments: Vec<Comment>) {
        *self
            .inner
            .comments
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(comments);
    }

    /// Append one comment. Existing snapshots are unaffected.
    pub fn append_comment(&self, comment: Comment) {
        let mut comments = self
            .inner
            .comments
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut comments).push(comment);
    }

    // ─── Route paths ─────────────────────────────────────────────

    pub fn set_route_paths(&self, paths: Vec<RoutePath>) {
        *self
            .inner
            .route_paths
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(paths);
    }

    pub fn route_paths(&self) -> Arc<Vec<RoutePath>> {
        self.inner
            .route_paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Route paths whose layer is in `layers`.
    pub fn visible_paths(&self, layers: &BTreeSet<String>) -> Vec<RoutePath> {
        self.route_paths()
            .iter()
            .filter(|p| layers.contains(&p.project_type))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, project_id: &str) -> Comment {
        Comment {
            id: Some(id.to_string()),
            project_id: project_id.to_string(),
            name: "Noa".to_string(),
            comment: "Please add lighting".to_string(),
            timestamp: "2025-05-01T08:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_snapshot_unaffected_by_append() {
        let store = DatasetStore::new();
        store.append_comment(comment("1", "P-1"));

        let snapshot = store.comments();
        store.append_comment(comment("2", "P-2"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.comments().len(), 2);
    }

    #[test]
    fn test_comments_for_project() {
        let store = DatasetStore::new();
        store.replace_comments(vec![
            comment("1", "P-1"),
            comment("2", "P-2"),
            comment("3", "P-1"),
        ]);

        let ids: Vec<_> = store
            .comments_for("P-1")
            .into_iter()
            .filter_map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(store.comment("2").map(|c| c.project_id).as_deref(), Some("P-2"));
        assert!(store.comment("9").is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = DatasetStore::new();
        let other = store.clone();

        other.replace_dataset("projects.geojson", ProjectCollection::default());
        assert_eq!(
            store.dataset().map(|d| d.filename.clone()).as_deref(),
            Some("projects.geojson")
        );

        store.clear_dataset();
        assert!(other.dataset().is_none());
    }

    #[test]
    fn test_visible_paths() {
        let store = DatasetStore::new();
        store.set_route_paths(vec![
            RoutePath::from_lat_lng("Roadway", &[[21.4, -158.1]]),
            RoutePath::from_lat_lng("Transit", &[[21.3, -157.9]]),
        ]);

        let layers: BTreeSet<String> = ["Transit".to_string()].into();
        let visible = store.visible_paths(&layers);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].project_type, "Transit");
    }
}
