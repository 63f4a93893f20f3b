use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quality_notifier::config::AppConfig;
use quality_notifier::webhooks::{self, NotificationPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quality_notifier=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting quality notifier");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        "Configuration loaded: profile {:?}, sonar host {}, dry run {}",
        config.profile, config.sonar_host, config.dry_run
    );

    let pipeline = Arc::new(NotificationPipeline::from_app_config(&config)?);
    info!("Notification pipeline ready: {:?}", pipeline.config());

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    let app = webhooks::router(config, pipeline);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
