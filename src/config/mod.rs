/// Postgres connection descriptor and the factory that builds it from settings
pub mod database;

/// Environment-backed configuration provider (`.env` file plus process environment)
pub mod env;

pub use database::{ConnectionDescriptor, DatabaseKind, connection_factory};
pub use env::{ConfigOptions, ConfigService};
