// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod bounds;
pub mod comment;
pub mod filter;
pub mod project;

pub use bounds::Bounds;
pub use comment::{Comment, CommentDraft, NewComment};
pub use filter::{Facet, FilterSelection, FilterUpdate};
pub use project::{ProjectCollection, ProjectFeature, RoutePath, SourceMembers};
