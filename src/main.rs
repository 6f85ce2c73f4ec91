use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use patient_core::{CoreConfig, PatientService};

/// Main entry point for the patient service
///
/// Starts the REST server (with Swagger UI) in front of the SQLite-backed patient store.
///
/// # Environment Variables
/// - `PATIENT_DB_PATH`: SQLite database file (default: "patient_data/patients.db")
/// - `PATIENT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RUST_LOG`: extra tracing directives on top of the `patient=info` default
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, the store or the listener fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patient=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var("PATIENT_DB_PATH").ok(),
        std::env::var("PATIENT_REST_ADDR").ok(),
    )
    .context("invalid patient service configuration")?;

    let patient_service = PatientService::open(&cfg).context("failed to open patient store")?;
    let app = api_rest::router(AppState::new(patient_service));

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr())
        .await
        .with_context(|| format!("failed to bind {}", cfg.rest_addr()))?;

    tracing::info!("++ Starting patient REST on {}", cfg.rest_addr());
    tracing::info!("++ Swagger UI at http://{}/swagger-ui", cfg.rest_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Patient REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
