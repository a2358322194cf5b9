//! Type-safe configuration loader using the `config` crate,
//! with manual environment-variable overrides for core settings.

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::{env, time::Duration};

/// Top-level application settings loaded from `Config.toml`
/// and then overridden (where applicable) by environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Postgres connection URL
    pub database_url: String,

    /// HTTP bind address for the GraphQL, metrics & health endpoints
    pub server_bind: String,

    /// Upper bound on pooled Postgres connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a request waits for a pooled connection (e.g. "5s")
    #[serde(default = "default_acquire_timeout", with = "humantime_serde")]
    pub acquire_timeout: Duration,

    /// Serve the GraphiQL explorer on `GET /graphql`
    #[serde(default)]
    pub graphiql: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> Duration {
    Duration::from_secs(5)
}

impl Settings {
    /// Load settings from `Config.toml` (if present),
    /// then apply any overrides from these environment variables:
    ///
    /// - `APP__DATABASE_URL` (or plain `DATABASE_URL`)
    /// - `APP__SERVER_BIND`
    /// - `APP__MAX_CONNECTIONS`
    /// - `APP__ACQUIRE_TIMEOUT`
    /// - `APP__GRAPHIQL`
    pub fn new() -> Result<Self, ConfigError> {
        let builder =
            Config::builder().add_source(File::with_name("Config").required(false));

        Self::from_builder(builder, |key| env::var(key).ok())
    }

    /// Layer the overrides returned by `lookup` on top of `builder`, then
    /// deserialize. Required keys may come from either side.
    pub fn from_builder<F>(
        builder: ConfigBuilder<DefaultState>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        with_overrides(builder, lookup)?.build()?.try_deserialize()
    }
}

fn with_overrides<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("APP__DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
        builder = builder.set_override("database_url", val)?;
    }
    if let Some(val) = lookup("APP__SERVER_BIND") {
        builder = builder.set_override("server_bind", val)?;
    }
    if let Some(val) = lookup("APP__MAX_CONNECTIONS") {
        let max: u32 = val
            .trim()
            .parse()
            .map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        builder = builder.set_override("max_connections", i64::from(max))?;
    }
    if let Some(val) = lookup("APP__ACQUIRE_TIMEOUT") {
        humantime::parse_duration(val.trim()).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        builder = builder.set_override("acquire_timeout", val.trim().to_string())?;
    }
    if let Some(val) = lookup("APP__GRAPHIQL") {
        let enabled = match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(ConfigError::Message(format!(
                    "APP__GRAPHIQL must be a boolean, got {other:?}"
                )))
            }
        };
        builder = builder.set_override("graphiql", enabled)?;
    }

    Ok(builder)
}
