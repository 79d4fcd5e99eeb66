//! Configuration module for backend-service.

use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which handler is mounted on `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootMode {
    /// Static greeting with the server's clock.
    Greeting,
    /// `SELECT NOW()` against PostgreSQL.
    Database,
}

impl FromStr for RootMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greeting" => Ok(RootMode::Greeting),
            "database" => Ok(RootMode::Database),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "ROOT_MODE must be 'greeting' or 'database', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub metrics_port: Option<u16>,
    pub mode: RootMode,
    /// Present exactly when `mode` is [`RootMode::Database`].
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub user: String,
    pub host: String,
    pub database: String,
    pub password: Secret<String>,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

const DEFAULT_POSTGRES_PORT: u16 = 5432;

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("{} is required", key)))
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} is invalid ('{}'): {}", key, raw, e))
        }),
        None => Ok(default),
    }
}

impl PostgresConfig {
    /// Read the `POSTGRES_*` keys through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            user: required(&lookup, "POSTGRES_USER")?,
            host: required(&lookup, "POSTGRES_HOST")?,
            database: required(&lookup, "POSTGRES_DB")?,
            password: Secret::new(required(&lookup, "POSTGRES_PASSWORD")?),
            port: parsed_or(&lookup, "POSTGRES_PORT", DEFAULT_POSTGRES_PORT)?,
            max_connections: parsed_or(&lookup, "POSTGRES_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parsed_or(
                &lookup,
                "POSTGRES_ACQUIRE_TIMEOUT_SECS",
                30,
            )?),
        })
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("ROOT_MODE") {
            Some(raw) => raw.parse()?,
            None => RootMode::Database,
        };

        let postgres = match mode {
            RootMode::Database => Some(PostgresConfig::from_lookup(&lookup)?),
            RootMode::Greeting => None,
        };

        Ok(Self {
            common,
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "backend-service".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.is_empty()),
            metrics_port: lookup("METRICS_PORT")
                .map(|raw| {
                    raw.trim().parse::<u16>().map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "METRICS_PORT is invalid ('{}'): {}",
                            raw,
                            e
                        ))
                    })
                })
                .transpose()?,
            mode,
            postgres,
        })
    }
}
