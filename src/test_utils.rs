//! Shared test utilities.
//!
//! Helpers for building configuration snapshots, temporary env files and
//! request-handler state without a running Postgres server.

use crate::{
    app::{AppState, service::AppService},
    config::ConfigService,
};
use sea_orm::DatabaseConnection;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")), // Default to TRACE for tests if RUST_LOG is not set
        )
        .with_test_writer()
        .try_init(); // Use try_init to avoid panic if already initialized
}

/// The minimal environment the connection factory accepts (`DB_PORT` unset).
#[must_use]
pub fn base_db_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("DB_HOST", "db"),
        ("DB_USERNAME", "u"),
        ("DB_PASSWORD", "p"),
        ("DB_NAME", "app"),
    ]
}

/// [`base_db_env`] with `overrides` applied on top.
#[must_use]
pub fn config_with(overrides: &[(&'static str, &'static str)]) -> ConfigService {
    ConfigService::from_pairs(base_db_env().into_iter().chain(overrides.iter().copied()))
}

/// Handler state over the given connection.
#[must_use]
pub fn test_state(database: DatabaseConnection) -> AppState {
    AppState {
        service: Arc::new(AppService::new()),
        database,
    }
}

/// Writes `contents` to a temporary env file, deleted when the handle drops.
#[allow(clippy::expect_used)]
pub fn temp_env_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp env file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp env file");
    file
}
