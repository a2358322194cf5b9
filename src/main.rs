//! Entrypoint: set up tracing, run database migrations, and serve the GraphQL API
//! alongside the metrics & health endpoints.
//!
//! This application uses a strongly-typed configuration (`Settings`) defined in `config.rs`,
//! which provides:
//!  - `database_url`     – Postgres connection string
//!  - `server_bind`      – HTTP bind address for `/graphql`, `/metrics` and `/healthz`
//!  - `max_connections`  – Postgres pool size
//!  - `acquire_timeout`  – How long to wait for a pooled connection
//!  - `graphiql`         – Whether to serve the GraphiQL explorer

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use rust_survey_api::config::Settings;
use rust_survey_api::errors::SurveyError;
use rust_survey_api::schema::build_schema;
use rust_survey_api::server::{self, AppState};
use rust_survey_api::store::PgStore;

/// Application entrypoint for the survey API.
///
/// **Workflow**:
/// 1. Initialise tracing/logging from `RUST_LOG` (or default to `info`).
/// 2. Load `Config.toml` (and apply any `APP__…` env-var overrides).
/// 3. Spin up a Postgres pool and run any pending SQLx migrations.
/// 4. Build the GraphQL schema over the pool and serve HTTP until shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ───────────────────────────────────────────────────────────────
    // 1. Initialise tracing / logging
    // ───────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    info!("Starting survey API…");

    // ───────────────────────────────────────────────────────────────
    // 2. Load configuration
    // ───────────────────────────────────────────────────────────────
    let settings = Settings::new().map_err(SurveyError::from)?;
    info!(
        server_bind = %settings.server_bind,
        max_connections = settings.max_connections,
        graphiql = settings.graphiql,
        "Loaded configuration"
    );

    // ───────────────────────────────────────────────────────────────
    // 3. Database pool & migrations
    // ───────────────────────────────────────────────────────────────
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(&settings.database_url)
        .await
        .map_err(SurveyError::from)
        .context("Failed to connect to Postgres")?;
    info!("Connected to Postgres");

    info!("Running database migrations…");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(SurveyError::from)
        .context("Failed to run database migrations")?;
    info!("Migrations complete");

    // ───────────────────────────────────────────────────────────────
    // 4. GraphQL + metrics & health server
    // ───────────────────────────────────────────────────────────────
    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("Invalid `server_bind` in configuration: {}", settings.server_bind))?;

    let state = Arc::new(AppState {
        schema: build_schema(Arc::new(PgStore::new(pool))),
        graphiql: settings.graphiql,
    });

    server::serve(addr, state).await.context("HTTP server failed")?;
    Ok(())
}
