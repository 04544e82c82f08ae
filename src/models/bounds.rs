// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geographic bounding box used to frame the map viewport.

use geo::Rect;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Corner pairs in the `[[south, west], [north, east]]` form map widgets take.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lng], [self.max_lat, self.max_lng]]
    }

    /// True when the box has no area (a single distinct point).
    pub fn is_degenerate(&self) -> bool {
        self.min_lat == self.max_lat && self.min_lng == self.max_lng
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_lat: rect.min().y,
            min_lng: rect.min().x,
            max_lat: rect.max().y,
            max_lng: rect.max().x,
        }
    }
}
