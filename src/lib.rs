// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project Map: browse transportation planning projects and collect comments.
//!
//! This crate provides the project filtering and viewport bounds core, the
//! HTTP API serving datasets and comments, and a typed client for that API.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DatasetStore;
use services::DatasetLibrary;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: DatasetStore,
    pub library: DatasetLibrary,
    /// Held across library writes and the store update that follows them,
    /// so the `.active` marker and the served dataset move together.
    pub dataset_writes: tokio::sync::Mutex<()>,
}

impl AppState {
    /// Build state with an empty store and the library at `config.data_dir`.
    pub fn new(config: Config) -> Self {
        let library = DatasetLibrary::new(config.data_dir.clone());
        Self {
            config,
            store: DatasetStore::new(),
            library,
            dataset_writes: tokio::sync::Mutex::new(()),
        }
    }
}
