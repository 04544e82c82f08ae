// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Filter selection state for the project map.

use std::collections::BTreeSet;

/// Sentinel value the selectors use for "no constraint".
pub const ALL: &str = "All";

/// One selector value: either the wildcard or a concrete value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    /// Parse a selector value, treating a missing value or `"All"` as the wildcard.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some(ALL) => Facet::All,
            Some(v) => Facet::Only(v.to_string()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }

    /// True when this facet accepts `value`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

/// The complete filter state: five independent facets.
///
/// A feature is visible iff every facet accepts it and its project type is
/// in `active_layers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub project_type: Facet,
    pub year: Facet,
    pub funding_source: Facet,
    /// Multi-select; empty means no constraint
    pub titles: Vec<Facet>,
    pub active_layers: BTreeSet<String>,
}

/// A single change to the filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    ProjectType(Facet),
    Year(Facet),
    FundingSource(Facet),
    Titles(Vec<Facet>),
    /// Show or hide one layer
    ToggleLayer(String),
    Layers(BTreeSet<String>),
    /// Back to all wildcards, keeping the layer set
    ClearFacets,
}

impl FilterSelection {
    /// All wildcards with the given layers visible.
    pub fn with_layers<I, S>(layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active_layers: layers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Apply one update, producing the next selection.
    pub fn apply(&self, update: FilterUpdate) -> Self {
        let mut next = self.clone();
        match update {
            FilterUpdate::ProjectType(facet) => next.project_type = facet,
            FilterUpdate::Year(facet) => next.year = facet,
            FilterUpdate::FundingSource(facet) => next.funding_source = facet,
            FilterUpdate::Titles(titles) => next.titles = titles,
            FilterUpdate::ToggleLayer(layer) => {
                if !next.active_layers.remove(&layer) {
                    next.active_layers.insert(layer);
                }
            }
            FilterUpdate::Layers(layers) => next.active_layers = layers,
            FilterUpdate::ClearFacets => {
                next = Self {
                    active_layers: next.active_layers,
                    ..Self::default()
                };
            }
        }
        next
    }

    pub fn is_layer_active(&self, project_type: &str) -> bool {
        self.active_layers.contains(project_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_parse() {
        assert_eq!(Facet::parse(None), Facet::All);
        assert_eq!(Facet::parse(Some("All")), Facet::All);
        assert_eq!(
            Facet::parse(Some("Transit")),
            Facet::Only("Transit".to_string())
        );
    }

    #[test]
    fn test_facet_matches_missing_value_only_for_all() {
        assert!(Facet::All.matches(None));
        assert!(!Facet::Only("STP".to_string()).matches(None));
    }

    #[test]
    fn test_apply_does_not_mutate_original() {
        let selection = FilterSelection::with_layers(["Roadway", "Transit"]);
        let next = selection.apply(FilterUpdate::ProjectType(Facet::Only(
            "Roadway".to_string(),
        )));

        assert_eq!(selection.project_type, Facet::All);
        assert_eq!(next.project_type, Facet::Only("Roadway".to_string()));
        assert_eq!(next.active_layers, selection.active_layers);
    }

    #[test]
    fn test_toggle_layer() {
        let selection = FilterSelection::with_layers(["Roadway", "Transit"]);

        let hidden = selection.apply(FilterUpdate::ToggleLayer("Transit".to_string()));
        assert!(!hidden.is_layer_active("Transit"));
        assert!(hidden.is_layer_active("Roadway"));

        let shown = hidden.apply(FilterUpdate::ToggleLayer("Transit".to_string()));
        assert_eq!(shown, selection);
    }

    #[test]
    fn test_clear_facets_keeps_layers() {
        let selection = FilterSelection::with_layers(["Roadway"])
            .apply(FilterUpdate::Year(Facet::Only("2020".to_string())))
            .apply(FilterUpdate::Titles(vec![Facet::Only("A".to_string())]));

        let cleared = selection.apply(FilterUpdate::ClearFacets);
        assert_eq!(cleared, FilterSelection::with_layers(["Roadway"]));
    }
}
