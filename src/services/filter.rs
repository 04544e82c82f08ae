// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Multi-facet filtering of project features.
//!
//! Filtering is a pure function of the collection and the selection: the
//! output is always an order-preserving subsequence of the input.

use crate::models::{Facet, FilterSelection, ProjectCollection, ProjectFeature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Return the features visible under `selection`, in input order.
pub fn filter_projects(
    collection: &ProjectCollection,
    selection: &FilterSelection,
) -> ProjectCollection {
    let features = collection
        .features
        .iter()
        .filter(|f| is_visible(f, selection))
        .cloned()
        .collect();

    collection.with_features(features)
}

/// True when every facet accepts the feature and its layer is shown.
pub fn is_visible(feature: &ProjectFeature, selection: &FilterSelection) -> bool {
    selection.is_layer_active(&feature.project_type)
        && selection.project_type.matches(Some(&feature.project_type))
        && selection.year.matches(feature.year.as_deref())
        && selection.funding_source.matches(feature.product.as_deref())
        && matches_titles(feature, &selection.titles)
}

fn matches_titles(feature: &ProjectFeature, titles: &[Facet]) -> bool {
    titles.is_empty() || titles.iter().any(|t| t.matches(Some(&feature.title)))
}

/// Distinct values used to populate the filter selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FacetOptions {
    pub project_types: Vec<String>,
    /// Numeric years ascending, then any other labels; absent, empty and
    /// zero years are left out
    pub years: Vec<String>,
    pub funding_sources: Vec<String>,
    pub titles: Vec<String>,
}

/// Enumerate selector values for a collection.
pub fn facet_options(collection: &ProjectCollection) -> FacetOptions {
    let mut project_types = BTreeSet::new();
    let mut years = BTreeSet::new();
    let mut funding_sources = BTreeSet::new();
    let mut titles = BTreeSet::new();

    for feature in &collection.features {
        project_types.insert(feature.project_type.clone());
        if let Some(year) = feature.year_label() {
            years.insert(year.to_string());
        }
        if let Some(product) = feature.product.as_ref().filter(|p| !p.is_empty()) {
            funding_sources.insert(product.clone());
        }
        if !feature.title.is_empty() {
            titles.insert(feature.title.clone());
        }
    }

    let mut years: Vec<String> = years.into_iter().collect();
    years.sort_by(|a, b| year_order(a).cmp(&year_order(b)));

    FacetOptions {
        project_types: project_types.into_iter().collect(),
        years,
        funding_sources: funding_sources.into_iter().collect(),
        titles: titles.into_iter().collect(),
    }
}

/// Integer years sort numerically ahead of labels like `FY25`.
fn year_order(label: &str) -> (bool, i64, &str) {
    match label.trim().parse::<i64>() {
        Ok(year) => (false, year, label),
        Err(_) => (true, 0, label),
    }
}

/// Selection with every facet open and every layer in the collection shown.
pub fn show_everything(collection: &ProjectCollection) -> FilterSelection {
    FilterSelection::with_layers(facet_options(collection).project_types)
}
