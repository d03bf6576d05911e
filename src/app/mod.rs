//! Composition root - assembles the application object graph at startup.
//!
//! [`AppModule::initialize`] loads configuration once, builds the connection
//! descriptor from it, opens the Postgres pool and wires the controller and
//! service together. Any failure along the way is returned to the caller and
//! is fatal to bootstrap.

/// HTTP routes for the root controller
pub mod controller;
/// Application service used by the controller
pub mod service;

use crate::{
    config::{ConfigOptions, ConfigService, connection_factory},
    db::{self, RetryPolicy},
    errors::Result,
};
use axum::Router;
use sea_orm::DatabaseConnection;
use service::AppService;
use std::sync::Arc;
use tracing::{info, instrument};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Service answering the root route
    pub service: Arc<AppService>,
    /// Pooled connection, pinged by `/health`
    pub database: DatabaseConnection,
}

/// The composed application: configuration, database pool and service.
pub struct AppModule {
    config: Arc<ConfigService>,
    database: DatabaseConnection,
    service: Arc<AppService>,
}

impl AppModule {
    /// Loads configuration, connects to the database and wires the service.
    ///
    /// # Errors
    /// Returns an error if the env file is malformed, a required `DB_*` key is
    /// missing, `DB_PORT` is not a port number, or the database stays
    /// unreachable after every retry.
    #[instrument(skip(options))]
    pub async fn initialize(options: ConfigOptions) -> Result<Self> {
        let config = Arc::new(ConfigService::load(&options)?);
        let descriptor = connection_factory(&config)?;
        info!(
            "Connecting to {} at {}:{}/{}",
            descriptor.kind, descriptor.host, descriptor.port, descriptor.database
        );

        let database = db::connect(&descriptor, &RetryPolicy::default()).await?;
        Ok(Self::from_parts(config, database))
    }

    /// Composes the module from an existing configuration and connection.
    #[must_use]
    pub fn from_parts(config: Arc<ConfigService>, database: DatabaseConnection) -> Self {
        Self {
            config,
            database,
            service: Arc::new(AppService::new()),
        }
    }

    /// Configuration loaded at startup.
    #[must_use]
    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    /// Handler state sharing this module's service and connection.
    #[must_use]
    pub fn state(&self) -> AppState {
        AppState {
            service: Arc::clone(&self.service),
            database: self.database.clone(),
        }
    }

    /// Request dispatcher for the registered controller.
    #[must_use]
    pub fn router(&self) -> Router {
        controller::router(self.state())
    }

    /// Closes the connection pool.
    pub async fn shutdown(self) -> Result<()> {
        info!("Closing database connection pool");
        self.database.close().await?;
        Ok(())
    }
}
