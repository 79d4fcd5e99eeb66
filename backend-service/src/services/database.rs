//! PostgreSQL access for backend-service.

use crate::config::PostgresConfig;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    options: PgConnectOptions,
    acquire_timeout: Duration,
}

impl Database {
    /// Create a pool that opens connections on first use.
    ///
    /// An unreachable server does not fail startup; each query reports it instead.
    #[instrument(skip(config), fields(host = %config.host, port = config.port, database = %config.database))]
    pub fn connect_lazy(config: &PostgresConfig) -> Self {
        info!(
            max_connections = config.max_connections,
            acquire_timeout_secs = config.acquire_timeout.as_secs(),
            "Configuring PostgreSQL connection pool"
        );

        let options = PgConnectOptions::new_without_pgpass()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(config.password.expose_secret())
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(options.clone());

        Self {
            pool,
            options,
            acquire_timeout: config.acquire_timeout,
        }
    }

    /// Ask the server for its current time.
    #[instrument(skip(self))]
    pub async fn current_time(&self) -> Result<DateTime<Utc>, AppError> {
        match sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await
        {
            Ok(now) => Ok(now),
            Err(sqlx::Error::PoolTimedOut) => Err(self.connect_failure().await),
            Err(e) => Err(AppError::DatabaseError(anyhow::Error::new(e))),
        }
    }

    /// The pool hides connect errors behind `PoolTimedOut`; one direct
    /// connection with the same options surfaces the actual cause.
    async fn connect_failure(&self) -> AppError {
        let attempt =
            tokio::time::timeout(self.acquire_timeout, PgConnection::connect_with(&self.options))
                .await;

        let cause = match attempt {
            Ok(Err(e)) => anyhow::Error::new(e),
            Ok(Ok(conn)) => {
                if let Err(e) = conn.close().await {
                    warn!(error = %e, "Failed to close diagnostic connection");
                }
                anyhow::Error::new(sqlx::Error::PoolTimedOut)
            }
            Err(_) => anyhow::anyhow!(
                "timed out after {}s connecting to {}:{}",
                self.acquire_timeout.as_secs(),
                self.options.get_host(),
                self.options.get_port()
            ),
        };

        AppError::DatabaseError(cause)
    }
}
