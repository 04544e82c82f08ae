// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Planning project features and overlay route paths.
//!
//! All geometry is held in one canonical coordinate order: `x` is longitude
//! and `y` is latitude. GeoJSON input is already `[lng, lat]`; route path
//! input is `[lat, lng]` and is swapped when the path is built.

use geo::{Coord, Geometry, LineString};
use geojson::JsonObject;
use serde_json::Value;

/// A single transportation planning project on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFeature {
    /// Stable key, also the join key for comments
    pub project_id: String,
    /// Display title (not guaranteed unique)
    pub title: String,
    /// Roadway, Transit, Bike/Ped, ...
    pub project_type: String,
    /// Funding source
    pub product: Option<String>,
    /// Year programmed, in the string form the source value renders to
    pub year: Option<String>,
    /// Point or path geometry, lng/lat
    pub geometry: Geometry<f64>,
    /// Full property bag in source order (used for export and re-serialization)
    pub properties: JsonObject,
    /// GeoJSON members carried through unchanged
    pub source: SourceMembers,
}

/// Parts of a source GeoJSON feature that are written back as they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMembers {
    pub id: Option<geojson::feature::Id>,
    pub bbox: Option<geojson::Bbox>,
    /// Geometry as parsed, including any altitude or foreign members
    pub geometry: Option<geojson::Geometry>,
    pub foreign_members: Option<JsonObject>,
}

impl ProjectFeature {
    /// Look up an arbitrary property (`cost`, `improvement`, `locality`, ...).
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// The year as the selector shows it, or `None` when absent, empty or zero.
    pub fn year_label(&self) -> Option<&str> {
        self.year
            .as_deref()
            .filter(|y| !y.is_empty() && *y != "0")
    }

    pub fn cost(&self) -> Option<&Value> {
        self.property("cost")
    }

    pub fn improvement(&self) -> Option<&str> {
        self.property("improvement").and_then(Value::as_str)
    }

    pub fn locality(&self) -> Option<&str> {
        self.property("locality").and_then(Value::as_str)
    }

    /// Convert back into a GeoJSON feature.
    pub fn to_geojson(&self) -> geojson::Feature {
        let geometry = self
            .source
            .geometry
            .clone()
            .unwrap_or_else(|| geojson::Geometry::new(geojson::Value::from(&self.geometry)));

        geojson::Feature {
            bbox: self.source.bbox.clone(),
            geometry: Some(geometry),
            id: self.source.id.clone(),
            properties: Some(self.properties.clone()),
            foreign_members: self.source.foreign_members.clone(),
        }
    }
}

/// An ordered set of project features with a collection-level name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectCollection {
    pub name: Option<String>,
    pub features: Vec<ProjectFeature>,
    pub bbox: Option<geojson::Bbox>,
    /// Collection-level members other than `type` and `features`, `name` included
    pub foreign_members: Option<JsonObject>,
}

impl ProjectCollection {
    pub fn new(name: Option<String>, features: Vec<ProjectFeature>) -> Self {
        Self {
            name,
            features,
            bbox: None,
            foreign_members: None,
        }
    }

    /// Same collection-level members, different features.
    pub fn with_features(&self, features: Vec<ProjectFeature>) -> Self {
        Self {
            name: self.name.clone(),
            features,
            bbox: self.bbox.clone(),
            foreign_members: self.foreign_members.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Find a project by id.
    pub fn get(&self, project_id: &str) -> Option<&ProjectFeature> {
        self.features.iter().find(|f| f.project_id == project_id)
    }

    /// Convert back into a GeoJSON feature collection, keeping the name and
    /// every other collection-level member.
    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        let mut foreign_members = self.foreign_members.clone();
        if let Some(name) = &self.name {
            foreign_members
                .get_or_insert_with(JsonObject::new)
                .insert("name".to_string(), Value::String(name.clone()));
        }

        geojson::FeatureCollection {
            bbox: self.bbox.clone(),
            features: self.features.iter().map(ProjectFeature::to_geojson).collect(),
            foreign_members,
        }
    }
}

/// Overlay polyline drawn for a project type layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    /// Layer (project type) this path belongs to
    pub project_type: String,
    /// Vertices, lng/lat
    pub line: LineString<f64>,
}

impl RoutePath {
    /// Build a path from `[latitude, longitude]` vertex pairs.
    pub fn from_lat_lng(project_type: impl Into<String>, vertices: &[[f64; 2]]) -> Self {
        let coords: Vec<Coord<f64>> = vertices
            .iter()
            .map(|[lat, lng]| Coord { x: *lng, y: *lat })
            .collect();
        Self {
            project_type: project_type.into(),
            line: LineString::new(coords),
        }
    }

    /// Vertices as `[latitude, longitude]` pairs, the order map renderers expect.
    pub fn lat_lng_vertices(&self) -> Vec<[f64; 2]> {
        self.line.coords().map(|c| [c.y, c.x]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_route_path_swaps_to_lng_lat() {
        let path = RoutePath::from_lat_lng("Transit", &[[21.4, -157.9], [21.3, -157.8]]);

        let first = path.line.0[0];
        assert_eq!(first.x, -157.9);
        assert_eq!(first.y, 21.4);
        assert_eq!(
            path.lat_lng_vertices(),
            vec![[21.4, -157.9], [21.3, -157.8]]
        );
    }

    #[test]
    fn test_year_label_skips_zero() {
        let mut feature = ProjectFeature {
            project_id: "1".to_string(),
            title: "Widen Kam Hwy".to_string(),
            project_type: "Roadway".to_string(),
            product: None,
            year: Some("0".to_string()),
            geometry: Geometry::Point(Point::new(-157.9, 21.4)),
            properties: JsonObject::new(),
            source: SourceMembers::default(),
        };
        assert_eq!(feature.year_label(), None);

        feature.year = Some(String::new());
        assert_eq!(feature.year_label(), None);

        feature.year = Some("2021".to_string());
        assert_eq!(feature.year_label(), Some("2021"));

        feature.year = Some("FY25".to_string());
        assert_eq!(feature.year_label(), Some("FY25"));
    }

    #[test]
    fn test_to_geojson_keeps_source_members() {
        let mut extra = JsonObject::new();
        extra.insert("style".to_string(), Value::String("dashed".to_string()));
        let feature = ProjectFeature {
            project_id: "1".to_string(),
            title: String::new(),
            project_type: "Roadway".to_string(),
            product: None,
            year: None,
            geometry: Geometry::Point(Point::new(-157.9, 21.4)),
            properties: JsonObject::new(),
            source: SourceMembers {
                id: Some(geojson::feature::Id::String("f-1".to_string())),
                bbox: Some(vec![-157.9, 21.4, -157.9, 21.4]),
                geometry: None,
                foreign_members: Some(extra),
            },
        };

        let out = serde_json::to_value(feature.to_geojson()).unwrap();
        assert_eq!(out["id"], "f-1");
        assert_eq!(out["style"], "dashed");
        assert_eq!(out["bbox"][0], -157.9);
        assert_eq!(out["geometry"]["coordinates"][0], -157.9);
    }
}
