//! Postgres connection pool setup.

use crate::config::database::ConnectionDescriptor;
use crate::errors::{Error, Result};
use sea_orm::sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sea_orm::sqlx::{ConnectOptions as _, Connection as _};
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr, SqlxPostgresConnector};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Upper bound on pooled connections.
pub const MAX_CONNECTIONS: u32 = 10;

/// How many times to try opening the pool at startup, and how long to wait
/// between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `attempts` counts the first try; zero is treated as one.
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: if attempts == 0 { 1 } else { attempts },
            delay,
        }
    }

    /// Total tries, including the first.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Wait between consecutive tries.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    /// One initial try plus nine retries, three seconds apart.
    fn default() -> Self {
        Self::new(10, Duration::from_secs(3))
    }
}

/// Maps the descriptor onto sqlx connect options.
///
/// Credentials are passed as discrete fields, so they need no URL escaping.
#[must_use]
pub fn connect_options(descriptor: &ConnectionDescriptor) -> PgConnectOptions {
    PgConnectOptions::new_without_pgpass()
        .host(&descriptor.host)
        .port(descriptor.port)
        .username(&descriptor.username)
        .password(&descriptor.password)
        .database(&descriptor.database)
}

/// Opens the Postgres pool described by `descriptor`, retrying per `policy`.
///
/// Each attempt opens a single connection first, so an unreachable server
/// fails immediately with its real cause instead of waiting out the pool's
/// acquire timeout. Returns the last connection error once every attempt has
/// failed.
#[instrument(
    skip(descriptor, policy),
    fields(
        kind = %descriptor.kind,
        host = %descriptor.host,
        port = descriptor.port,
        database = %descriptor.database,
    )
)]
pub async fn connect(
    descriptor: &ConnectionDescriptor,
    policy: &RetryPolicy,
) -> Result<DatabaseConnection> {
    debug!(
        synchronize = descriptor.synchronize,
        entities = descriptor.entities.len(),
        "Schema synchronization is not performed"
    );

    let options = connect_options(descriptor);
    let mut attempt = 1;

    loop {
        match try_connect(&options).await {
            Ok(database) => {
                info!(attempt, "Database connection established");
                return Ok(database);
            }
            Err(e) if attempt < policy.attempts() => {
                warn!(
                    attempt,
                    max_attempts = policy.attempts(),
                    "Unable to connect to the database, retrying in {:?}: {}",
                    policy.delay(),
                    e
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
            Err(e) => {
                error!(attempt, "Unable to connect to the database: {}", e);
                return Err(Error::Database(DbErr::Conn(RuntimeErr::SqlxError(e))));
            }
        }
    }
}

async fn try_connect(
    options: &PgConnectOptions,
) -> std::result::Result<DatabaseConnection, sea_orm::sqlx::Error> {
    options.connect().await?.close().await?;

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options.clone())
        .await?;
    Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::database::connection_factory;
    use crate::test_utils::config_with;
    use std::time::Instant;

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 10);
        assert_eq!(policy.delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(5));
        assert_eq!(policy.attempts(), 1);
    }

    #[test]
    fn test_connect_options_mirror_descriptor() -> Result<()> {
        let descriptor = connection_factory(&config_with(&[("DB_PORT", "6543")]))?;
        let options = connect_options(&descriptor);

        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "u");
        assert_eq!(options.get_database(), Some("app"));
        Ok(())
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_last_attempt() -> Result<()> {
        // Nothing listens on port 1, so every attempt is refused.
        let descriptor =
            connection_factory(&config_with(&[("DB_HOST", "127.0.0.1"), ("DB_PORT", "1")]))?;
        let policy = RetryPolicy::new(2, Duration::from_millis(10));

        let started = Instant::now();
        let result = connect(&descriptor, &policy).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(
            result,
            Err(Error::Database(DbErr::Conn(RuntimeErr::SqlxError(
                sea_orm::sqlx::Error::Io(_)
            ))))
        ));
        Ok(())
    }
}
