// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Viewport bounds over visible features and route paths.

use crate::models::{Bounds, ProjectFeature, RoutePath};
use geo::{BoundingRect, CoordsIter, MultiPoint, Point};

/// Bounding box of every feature coordinate and path vertex.
///
/// Returns `None` when there is nothing to frame; callers must not render a
/// map for that case. No padding is added.
pub fn compute_bounds(features: &[ProjectFeature], paths: &[RoutePath]) -> Option<Bounds> {
    let feature_coords = features.iter().flat_map(|f| f.geometry.coords_iter());
    let path_coords = paths.iter().flat_map(|p| p.line.coords().copied());

    let points: MultiPoint<f64> = feature_coords.chain(path_coords).map(Point::from).collect();

    points.bounding_rect().map(Bounds::from)
}
