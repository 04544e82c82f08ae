// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV export of projects and comments.

use crate::models::{Comment, ProjectFeature};
use geojson::JsonObject;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const ALL_PROJECTS_FILENAME: &str = "all_projects.csv";
pub const ALL_COMMENTS_FILENAME: &str = "all_comments.csv";

/// Anything that can be written as one CSV row.
pub trait ExportRecord {
    /// Column name to value, in column order.
    fn record(&self) -> JsonObject;

    /// Identifier used to name a single-record export.
    fn identifier(&self) -> Option<String>;

    /// Filename prefix for single-record exports (`project`, `comment`).
    fn kind(&self) -> &'static str;
}

impl ExportRecord for ProjectFeature {
    fn record(&self) -> JsonObject {
        self.properties.clone()
    }

    fn identifier(&self) -> Option<String> {
        Some(self.project_id.clone()).filter(|id| !id.is_empty())
    }

    fn kind(&self) -> &'static str {
        "project"
    }
}

impl ExportRecord for Comment {
    fn record(&self) -> JsonObject {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => JsonObject::new(),
        }
    }

    fn identifier(&self) -> Option<String> {
        self.id.clone().filter(|id| !id.is_empty())
    }

    fn kind(&self) -> &'static str {
        "comment"
    }
}

/// Encode rows as CSV. Headers come from the first row's keys.
///
/// Every cell is quoted. Keys missing from later rows become empty cells.
pub fn encode_csv<R: ExportRecord>(rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let first = rows.first().ok_or(ExportError::NoData)?;
    let headers: Vec<String> = first.record().keys().cloned().collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for row in rows {
        let record = row.record();
        writer.write_record(
            headers
                .iter()
                .map(|h| record.get(h).map(cell_text).unwrap_or_default()),
        )?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// String form of a JSON value as it appears in a cell.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Filename for a single-record export, e.g. `comment_42.csv`.
///
/// Falls back to the current Unix time in milliseconds when the record has
/// no identifier.
pub fn single_record_filename<R: ExportRecord>(record: &R) -> String {
    let id = record
        .identifier()
        .map(|id| sanitize_filename_part(&id))
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().to_string());
    format!("{}_{}.csv", record.kind(), id)
}

fn sanitize_filename_part(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Encode `rows` and write them to `dir/filename`.
///
/// Returns the written path. Nothing is written when `rows` is empty.
pub async fn write_csv_file<R: ExportRecord>(
    rows: &[R],
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let bytes = encode_csv(rows)?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote CSV export");
    Ok(path)
}

/// Errors from export operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No data to export")]
    NoData,

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
