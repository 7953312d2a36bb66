//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the triage REST API on its own, with OpenAPI/Swagger UI.
//!
//! ## Intended use
//! Development and debugging. The workspace's `triage-run` binary serves the same router and also
//! loads `.env`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the triage REST API server
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `FACILITY_DATA_FILE`: Facility YAML file (default: `data/facilities.yaml`)
/// - `TRIAGE_RULES_FILE`: Optional rules YAML replacing the built-in table
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the facility data or rules file cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting triage REST API on {}", addr);

    let cfg = api_rest::core_config_from_env()?;
    let service = api_rest::service_from_config(&cfg)?;
    let app = api_rest::router(service);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
