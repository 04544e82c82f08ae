// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod bounds;
pub mod dataset;
pub mod export;
pub mod filter;

pub use bounds::compute_bounds;
pub use dataset::{DatasetError, DatasetLibrary};
pub use export::{encode_csv, ExportError, ExportRecord};
pub use filter::{facet_options, filter_projects, FacetOptions};
