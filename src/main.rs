use api_rest::{AppState, router};
use api_shared::HealthService;
use pets_core::{
    CoreConfig, ScreeningContext,
    config::{optional_env_value, request_timeout_from_env_value},
    constants::DEFAULT_REST_ADDR,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reads the core configuration from the environment.
///
/// # Environment Variables
/// - `PETS_DATA_DIR`: Directory for application YAML files (default: kept in memory)
/// - `PETS_PERSISTENCE_URL`: Base URL of the persistence API (default: none, saves stay local)
/// - `PETS_REQUEST_TIMEOUT_SECS`: Timeout for each persistence call (default: 30)
fn config_from_env() -> anyhow::Result<CoreConfig> {
    Ok(CoreConfig::new(
        optional_env_value(std::env::var("PETS_DATA_DIR").ok()).map(PathBuf::from),
        optional_env_value(std::env::var("PETS_PERSISTENCE_URL").ok()),
        request_timeout_from_env_value(std::env::var("PETS_REQUEST_TIMEOUT_SECS").ok())?,
    )?)
}

/// Main entry point for the PETS application
///
/// Serves the REST API, OpenAPI document and Swagger UI on one address and
/// shuts down cleanly on Ctrl-C.
///
/// # Environment Variables
/// - `PETS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - plus those read by `config_from_env`
///
/// # Returns
/// * `Ok(())` - If the server starts and stops cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pets_run=info".parse()?)
                .add_directive("pets_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PETS_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = config_from_env()?;
    tracing::info!(
        data_dir = ?cfg.data_dir(),
        persistence = cfg.persistence_url().unwrap_or("none"),
        "loaded configuration"
    );
    let ctx = ScreeningContext::from_config(&cfg)?;

    let health = HealthService::check_health();
    tracing::info!("{}", health.message);
    tracing::info!("++ Starting PETS REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(AppState::new(ctx)))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {:?}", e);
            }
            tracing::info!("-- Shutting down PETS REST");
        })
        .await?;

    Ok(())
}
