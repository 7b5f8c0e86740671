//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the PETS REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you want the REST server (with
//! OpenAPI/Swagger UI) without the workspace's `pets-run` wrapper.

use api_rest::{router, AppState};
use pets_core::{
    config::{optional_env_value, request_timeout_from_env_value},
    constants::DEFAULT_REST_ADDR,
    CoreConfig, ScreeningContext,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the PETS REST API server
///
/// # Environment Variables
/// - `PETS_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PETS_DATA_DIR`: Directory for application YAML files (default: in memory)
/// - `PETS_PERSISTENCE_URL`: Base URL of the persistence API (default: none)
/// - `PETS_REQUEST_TIMEOUT_SECS`: Timeout for persistence calls (default: 30)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("pets_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PETS_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = CoreConfig::new(
        optional_env_value(std::env::var("PETS_DATA_DIR").ok()).map(PathBuf::from),
        optional_env_value(std::env::var("PETS_PERSISTENCE_URL").ok()),
        request_timeout_from_env_value(std::env::var("PETS_REQUEST_TIMEOUT_SECS").ok())?,
    )?;
    let ctx = ScreeningContext::from_config(&cfg)?;

    tracing::info!("-- Starting PETS REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(AppState::new(ctx))).await?;

    Ok(())
}
