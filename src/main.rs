//! Expense report server.
//!
//! Main entry point for the expense tracking service.

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expense_report::api::{AppState, create_router};
use expense_report::config::ConfigLoader;

/// Environment variable naming the configuration directory.
const CONFIG_DIR_ENV: &str = "EXPENSE_REPORT_CONFIG";
const DEFAULT_CONFIG_DIR: &str = "./config/snbd";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expense_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        organization = %config.report().organization,
        "Configuration loaded"
    );
    if config.service().store.project_id.is_none() {
        warn!("No store project id configured; saves will be refused");
    }

    let addr = format!(
        "{}:{}",
        config.service().server.host,
        config.service().server.port
    );
    let app = create_router(AppState::from_config(config));

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
