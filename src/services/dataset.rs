// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project dataset loading and the on-disk GeoJSON library.

use crate::models::{ProjectCollection, ProjectFeature, RoutePath, SourceMembers};
use geo::{CoordsIter, Geometry};
use geojson::{GeoJson, JsonObject};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Marker file recording which dataset is active across restarts.
const ACTIVE_MARKER: &str = ".active";
const GEOJSON_EXTENSION: &str = "geojson";

/// Parse a GeoJSON FeatureCollection into project features.
pub fn parse_collection(json_data: &str) -> Result<ProjectCollection, DatasetError> {
    let geojson: GeoJson = json_data
        .parse()
        .map_err(|e: geojson::Error| DatasetError::ParseError(e.to_string()))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(DatasetError::NotFeatureCollection);
    };

    convert_collection(collection)
}

/// Convert an already-parsed FeatureCollection into project features.
pub fn convert_collection(
    collection: geojson::FeatureCollection,
) -> Result<ProjectCollection, DatasetError> {
    let name = collection
        .foreign_members
        .as_ref()
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .map(String::from);

    let features = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| convert_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = features.len(), name = ?name, "Parsed project collection");
    Ok(ProjectCollection {
        name,
        features,
        bbox: collection.bbox,
        foreign_members: collection.foreign_members,
    })
}

fn convert_feature(
    index: usize,
    feature: geojson::Feature,
) -> Result<ProjectFeature, DatasetError> {
    let properties = feature.properties.unwrap_or_default();

    let project_id = properties
        .get("project_id")
        .and_then(scalar_text)
        .ok_or(DatasetError::MissingProjectId(index))?;

    let source_geometry = feature
        .geometry
        .ok_or_else(|| DatasetError::MissingGeometry(project_id.clone()))?;
    let geometry: Geometry<f64> = source_geometry
        .value
        .clone()
        .try_into()
        .map_err(|_| DatasetError::UnsupportedGeometry(project_id.clone()))?;

    if geometry.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(DatasetError::InvalidCoordinate(project_id));
    }

    Ok(ProjectFeature {
        title: text_property(&properties, "project_title").unwrap_or_default(),
        project_type: text_property(&properties, "project_type").unwrap_or_default(),
        product: text_property(&properties, "product"),
        year: properties.get("year").and_then(year_text),
        project_id,
        geometry,
        properties,
        source: SourceMembers {
            id: feature.id,
            bbox: feature.bbox,
            geometry: Some(source_geometry),
            foreign_members: feature.foreign_members,
        },
    })
}

fn text_property(properties: &JsonObject, key: &str) -> Option<String> {
    properties.get(key).and_then(scalar_text)
}

/// Strings pass through; numbers and booleans are stringified; null is absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A year renders the way a display would print it: strings as-is, whole
/// numbers without a fraction (`2025.0` is `"2025"`), other numbers in full.
fn year_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        }),
        other => scalar_text(other),
    }
}

/// Parse overlay route paths from `{ "<type>": [[[lat, lng], ...], ...] }`.
pub fn parse_route_paths(json_data: &str) -> Result<Vec<RoutePath>, DatasetError> {
    let by_type: BTreeMap<String, Vec<Vec<[f64; 2]>>> = serde_json::from_str(json_data)
        .map_err(|e| DatasetError::ParseError(e.to_string()))?;

    let paths: Vec<RoutePath> = by_type
        .iter()
        .flat_map(|(project_type, paths)| {
            paths
                .iter()
                .map(move |vertices| RoutePath::from_lat_lng(project_type.clone(), vertices))
        })
        .collect();

    if paths
        .iter()
        .flat_map(|p| p.line.coords())
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(DatasetError::ParseError(
            "route path contains a non-finite coordinate".to_string(),
        ));
    }

    Ok(paths)
}

/// Load overlay route paths from a file.
pub fn load_route_paths<P: AsRef<Path>>(path: P) -> Result<Vec<RoutePath>, DatasetError> {
    let json_data = std::fs::read_to_string(path.as_ref())
        .map_err(|e| DatasetError::IoError(e.to_string()))?;
    parse_route_paths(&json_data)
}

/// A directory of uploaded GeoJSON datasets.
#[derive(Debug, Clone)]
pub struct DatasetLibrary {
    dir: PathBuf,
}

impl DatasetLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the library directory if needed.
    pub async fn ensure_dir(&self) -> Result<(), DatasetError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DatasetError::IoError(e.to_string()))
    }

    /// Dataset filenames, sorted.
    pub async fn list(&self) -> Result<Vec<String>, DatasetError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(DatasetError::IoError(e.to_string())),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DatasetError::IoError(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if validate_filename(&name).is_ok() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read and parse one dataset.
    pub async fn load(&self, filename: &str) -> Result<ProjectCollection, DatasetError> {
        let json_data = self.read_raw(filename).await?;
        parse_collection(&json_data)
    }

    /// Raw file contents of one dataset.
    pub async fn read_raw(&self, filename: &str) -> Result<String, DatasetError> {
        let path = self.path_for(filename)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DatasetError::NotFound(filename.to_string()))
            }
            Err(e) => Err(DatasetError::IoError(e.to_string())),
        }
    }

    /// Validate and store an uploaded dataset, replacing any file of the same name.
    pub async fn save(
        &self,
        filename: &str,
        contents: &str,
    ) -> Result<ProjectCollection, DatasetError> {
        let path = self.path_for(filename)?;
        let collection = parse_collection(contents)?;

        self.ensure_dir().await?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| DatasetError::IoError(e.to_string()))?;

        tracing::info!(filename, count = collection.len(), "Stored dataset");
        Ok(collection)
    }

    /// Delete every dataset and the active marker. Returns how many were removed.
    pub async fn delete_all(&self) -> Result<usize, DatasetError> {
        let names = self.list().await?;
        for name in &names {
            tokio::fs::remove_file(self.dir.join(name))
                .await
                .map_err(|e| DatasetError::IoError(e.to_string()))?;
        }
        self.clear_active().await?;

        tracing::info!(count = names.len(), "Deleted all datasets");
        Ok(names.len())
    }

    /// Filename recorded as active, if any.
    pub async fn active(&self) -> Option<String> {
        let marker = tokio::fs::read_to_string(self.dir.join(ACTIVE_MARKER))
            .await
            .ok()?;
        let name = marker.trim().to_string();
        validate_filename(&name).ok().map(|_| name)
    }

    /// Record the active dataset.
    pub async fn set_active(&self, filename: &str) -> Result<(), DatasetError> {
        validate_filename(filename)?;
        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(ACTIVE_MARKER), filename)
            .await
            .map_err(|e| DatasetError::IoError(e.to_string()))
    }

    async fn clear_active(&self) -> Result<(), DatasetError> {
        match tokio::fs::remove_file(self.dir.join(ACTIVE_MARKER)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DatasetError::IoError(e.to_string())),
        }
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, DatasetError> {
        validate_filename(filename)?;
        Ok(self.dir.join(filename))
    }
}

/// Dataset filenames are a single `*.geojson` path component.
pub fn validate_filename(filename: &str) -> Result<(), DatasetError> {
    let path = Path::new(filename);
    let is_plain = path.file_name().and_then(|n| n.to_str()) == Some(filename)
        && !filename.starts_with('.');
    let has_extension = path.extension().and_then(|e| e.to_str()) == Some(GEOJSON_EXTENSION);

    if is_plain && has_extension {
        Ok(())
    } else {
        Err(DatasetError::InvalidFilename(filename.to_string()))
    }
}

/// Errors from dataset operations.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("Feature {0} has no project_id")]
    MissingProjectId(usize),

    #[error("Project {0} has no geometry")]
    MissingGeometry(String),

    #[error("Project {0} has an unsupported geometry")]
    UnsupportedGeometry(String),

    #[error("Project {0} has a non-finite coordinate")]
    InvalidCoordinate(String),

    #[error("Invalid dataset filename: {0}")]
    InvalidFilename(String),

    #[error("Dataset not found: {0}")]
    NotFound(String),
}
