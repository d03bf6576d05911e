use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while composing and starting the application.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration key is absent
    #[error("Missing required environment variable: {key}")]
    MissingEnv {
        /// Name of the missing key
        key: String,
    },

    /// A port setting is not a base-10 `u16`
    #[error("Invalid port in {key}: {value:?} ({source})")]
    InvalidPort {
        /// Configuration key that held the value
        key: String,
        /// Raw value as configured
        value: String,
        /// Parse failure
        #[source]
        source: ParseIntError,
    },

    /// The env file exists but could not be read or parsed
    #[error("Failed to read env file {path:?}: {source}")]
    EnvFile {
        /// Env file that failed
        path: PathBuf,
        /// Read or parse failure
        #[source]
        source: dotenvy::Error,
    },

    /// Connecting to or talking to the database failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Binding or serving the HTTP listener failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
