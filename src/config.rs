// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Name of the session cookie carrying the admin JWT.
pub const SESSION_COOKIE: &str = "project_map_session";

/// How long an admin session token stays valid.
pub const SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory holding uploaded GeoJSON datasets
    pub data_dir: PathBuf,
    /// Dataset activated at startup when none is recorded as active
    pub default_dataset: String,
    /// Optional JSON file of overlay route paths per project type
    pub route_paths_file: Option<PathBuf>,

    // --- Secrets ---
    /// Admin login email
    pub admin_email: String,
    /// Admin login password
    pub admin_password: String,
    /// JWT signing key for admin session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            default_dataset: "projects.geojson".to_string(),
            route_paths_file: None,
            admin_email: "admin@example.com".to_string(),
            admin_password: "test_password".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            default_dataset: env::var("DEFAULT_DATASET")
                .unwrap_or_else(|_| "projects.geojson".to_string()),
            route_paths_file: env::var("ROUTE_PATHS_FILE").ok().map(PathBuf::from),

            admin_email: env::var("ADMIN_EMAIL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ADMIN_EMAIL"))?,
            admin_password: env::var("ADMIN_PASSWORD")
                .map_err(|_| ConfigError::Missing("ADMIN_PASSWORD"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
