// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Citizen comments on planning projects.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// A stored comment. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Comment {
    /// Server-assigned id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    pub name: String,
    pub comment: String,
    /// Client clock at submission (RFC 3339)
    pub timestamp: String,
}

impl Comment {
    /// Create the stored form of a submitted comment.
    pub fn from_new(new: NewComment, id: String) -> Self {
        Self {
            id: Some(id),
            project_id: new.project_id,
            name: new.name,
            comment: new.comment,
            timestamp: new.timestamp,
        }
    }
}

/// Rejects empty and whitespace-only text.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// What a user has typed into a comment form.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct CommentDraft {
    #[validate(length(min = 1, message = "project id is required"))]
    pub project_id: String,
    #[validate(
        length(max = 200, message = "name is too long"),
        custom(function = "not_blank", message = "name is required")
    )]
    pub name: String,
    #[validate(
        length(max = 5000, message = "comment is too long"),
        custom(function = "not_blank", message = "comment is required")
    )]
    pub comment: String,
}

impl CommentDraft {
    /// Attach the submission timestamp, producing the wire body.
    pub fn stamp(&self, timestamp: String) -> NewComment {
        NewComment {
            project_id: self.project_id.clone(),
            name: self.name.clone(),
            comment: self.comment.clone(),
            timestamp,
        }
    }
}

/// Body of `POST /api/comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[validate(length(min = 1, message = "project id is required"))]
    pub project_id: String,
    #[validate(
        length(max = 200, message = "name is too long"),
        custom(function = "not_blank", message = "name is required")
    )]
    pub name: String,
    #[validate(
        length(max = 5000, message = "comment is too long"),
        custom(function = "not_blank", message = "comment is required")
    )]
    pub comment: String,
    #[validate(length(min = 1, message = "timestamp is required"))]
    pub timestamp: String,
}
