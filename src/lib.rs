//! Library entrypoint: re‑export modules

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod results;
pub mod schema;
pub mod server;
pub mod store;
pub mod surveys;
