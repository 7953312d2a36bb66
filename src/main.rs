//! Workspace entry point.
//!
//! Loads `.env`, resolves configuration once and serves the triage REST API.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the triage service
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `FACILITY_DATA_FILE`: Facility YAML file (default: `data/facilities.yaml`)
/// - `TRIAGE_RULES_FILE`: Optional rules YAML replacing the built-in table
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_run=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = api_rest::core_config_from_env()?;
    tracing::info!(
        "facility data: {}",
        cfg.facility_data_file().display()
    );
    let service = api_rest::service_from_config(&cfg)?;
    let app = api_rest::router(service);

    tracing::info!("++ Starting triage REST server on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
