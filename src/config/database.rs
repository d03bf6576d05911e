//! Database connection settings.
//!
//! This module turns the environment-derived [`ConfigService`] into a
//! [`ConnectionDescriptor`], the complete set of parameters needed to open the
//! Postgres pool. The factory is a plain function of the configuration object.
//! Required keys are validated here, when the application is composed, so a
//! missing host fails startup instead of surfacing later as a connect error.

use crate::config::env::ConfigService;
use crate::errors::{Error, Result};
use std::fmt;

/// Database server host.
pub const DB_HOST: &str = "DB_HOST";
/// Database server port; optional.
pub const DB_PORT: &str = "DB_PORT";
/// Login role.
pub const DB_USERNAME: &str = "DB_USERNAME";
/// Login password.
pub const DB_PASSWORD: &str = "DB_PASSWORD";
/// Database to connect to.
pub const DB_NAME: &str = "DB_NAME";

/// Port used when `DB_PORT` is not set.
pub const DEFAULT_DB_PORT: &str = "5432";

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    /// PostgreSQL
    Postgres,
}

impl DatabaseKind {
    /// Lowercase backend name, e.g. `"postgres"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved parameters for opening the database connection pool.
///
/// Built once at startup by [`connection_factory`] and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Backend kind
    pub kind: DatabaseKind,
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Login role
    pub username: String,
    /// Login password, never logged
    pub password: String,
    /// Database name
    pub database: String,
    /// Entity tables registered with the connection. None are wired here.
    pub entities: Vec<String>,
    /// Whether the schema is created from the entities on connect. Always off.
    pub synchronize: bool,
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("entities", &self.entities)
            .field("synchronize", &self.synchronize)
            .finish()
    }
}

/// Builds the Postgres [`ConnectionDescriptor`] from configuration.
///
/// Reads `DB_HOST`, `DB_PORT`, `DB_USERNAME`, `DB_PASSWORD` and `DB_NAME`.
/// `DB_PORT` falls back to `5432`.
///
/// # Errors
/// - [`Error::MissingEnv`] if any key other than `DB_PORT` is absent
/// - [`Error::InvalidPort`] if `DB_PORT` is not a base-10 port number
pub fn connection_factory(config: &ConfigService) -> Result<ConnectionDescriptor> {
    Ok(ConnectionDescriptor {
        kind: DatabaseKind::Postgres,
        host: config.require(DB_HOST)?.to_string(),
        port: parse_port(DB_PORT, config.get_or(DB_PORT, DEFAULT_DB_PORT))?,
        username: config.require(DB_USERNAME)?.to_string(),
        password: config.require(DB_PASSWORD)?.to_string(),
        database: config.require(DB_NAME)?.to_string(),
        entities: Vec::new(),
        synchronize: false,
    })
}

/// Parses a port number in base 10, ignoring surrounding whitespace.
///
/// `key` only labels the error.
pub fn parse_port(key: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|source| Error::InvalidPort {
            key: key.to_string(),
            value: value.to_string(),
            source,
        })
}
