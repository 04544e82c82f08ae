// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Comment submission flow for one project's comment form.
//!
//! A form moves `Editing -> Submitting -> Editing`. A successful submit
//! clears the draft and appends the stored comment to the local store; a
//! failed one keeps the draft so the user can retry by hand.

use super::{ApiClient, ClientError};
use crate::db::DatasetStore;
use crate::models::{Comment, CommentDraft, NewComment};
use crate::time_utils::now_rfc3339;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use validator::Validate;

/// Where submitted comments go.
pub trait CommentSink {
    fn post_comment(
        &self,
        comment: &NewComment,
    ) -> impl Future<Output = Result<Comment, ClientError>> + Send;
}

impl CommentSink for ApiClient {
    fn post_comment(
        &self,
        comment: &NewComment,
    ) -> impl Future<Output = Result<Comment, ClientError>> + Send {
        self.create_comment(comment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Editing,
    Submitting,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Comment is incomplete: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Submission failed: {0}")]
    Failed(#[from] ClientError),
}

/// Draft state plus the one-submission-at-a-time guard.
#[derive(Debug)]
pub struct CommentForm {
    draft: Mutex<CommentDraft>,
    busy: AtomicBool,
}

/// Clears the busy flag however the submission ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CommentForm {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            draft: Mutex::new(CommentDraft {
                project_id: project_id.into(),
                ..CommentDraft::default()
            }),
            busy: AtomicBool::new(false),
        }
    }

    pub fn draft(&self) -> CommentDraft {
        self.lock_draft().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.lock_draft().name = name.into();
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        self.lock_draft().comment = comment.into();
    }

    pub fn status(&self) -> FormStatus {
        if self.busy.load(Ordering::Acquire) {
            FormStatus::Submitting
        } else {
            FormStatus::Editing
        }
    }

    /// Validate, stamp and send the draft.
    ///
    /// Validation happens before anything is sent. A second call while one
    /// is in flight is refused with `SubmitError::InFlight`.
    pub async fn submit<S: CommentSink>(
        &self,
        sink: &S,
        store: &DatasetStore,
    ) -> Result<Comment, SubmitError> {
        let draft = self.draft();
        draft.validate()?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::InFlight);
        }
        let _guard = BusyGuard(&self.busy);

        let new_comment = draft.stamp(now_rfc3339());
        match sink.post_comment(&new_comment).await {
            Ok(comment) => {
                store.append_comment(comment.clone());
                self.clear_if_unchanged(&draft);
                tracing::info!(project_id = %comment.project_id, "Comment submitted");
                Ok(comment)
            }
            Err(e) => {
                tracing::warn!(
                    project_id = %draft.project_id,
                    error = %e,
                    "Comment submission failed"
                );
                Err(SubmitError::Failed(e))
            }
        }
    }

    /// Clear name and comment unless the user edited them mid-flight.
    fn clear_if_unchanged(&self, submitted: &CommentDraft) {
        let mut draft = self.lock_draft();
        if *draft == *submitted {
            draft.name.clear();
            draft.comment.clear();
        }
    }

    fn lock_draft(&self) -> std::sync::MutexGuard<'_, CommentDraft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
