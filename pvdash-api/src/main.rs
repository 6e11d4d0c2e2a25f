use anyhow::Context;
use pvdash_api::aggregator::{Aggregator, AggregatorOptions};
use pvdash_api::config::DashboardConfig;
use pvdash_api::dashboard::{self, template::TemplateSource, DashboardState};
use pvdash_api::kubernetes::K8sClient;
use pvdash_api::{logging, shutdown};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().skip(1).any(|arg| arg == "--sample-config") {
        print!("{}", DashboardConfig::generate_sample());
        return Ok(());
    }

    // Load configuration
    let config = DashboardConfig::load().context("Failed to load configuration")?;

    // Initialize tracing; the guard keeps the file writer alive
    let _log_guard = logging::init(&config.logging)?;

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(anyhow::anyhow!("Invalid configuration: {}", e));
    }
    info!("Configuration loaded successfully");

    // Everything below up to the listener is fatal on failure
    let client = match K8sClient::connect(&config.kubernetes).await {
        Ok(client) => client,
        Err(e) => {
            error!("Error creating Kubernetes client: {}", e);
            return Err(e.into());
        }
    };
    info!(
        api_server = %client.api_server(),
        context = client.context().unwrap_or("<current>"),
        "Connected to Kubernetes API"
    );

    let aggregator = Aggregator::new(AggregatorOptions::from(&config.kubernetes));
    let snapshot = match aggregator.collect(&client).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Error loading cluster data: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "Persistent volumes found in cluster: {} ({} claims)",
        snapshot.volumes().len(),
        snapshot.claims().len()
    );

    let templates = match TemplateSource::from_config(&config.template).await {
        Ok(templates) => templates,
        Err(e) => {
            error!("Error loading template: {}", e);
            return Err(e.into());
        }
    };

    let app = dashboard::router(Arc::new(DashboardState::new(snapshot, templates)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://localhost:{}", config.server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}
