use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use firework_api::{build_router, AppState};
use firework_core::{BrokerService, Dispatcher, DispatcherConfig};
use firework_infrastructure::{InMemoryTopicRepository, ReqwestTransport, StaticKeyRepository};
use firework_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry; the guard flushes the file writer on exit
    let _log_guard = firework_shared::telemetry::init_telemetry(&config.log)?;

    info!("{} starting ({})...", config.app.name, config.app.env);

    // Request keys
    let keys = StaticKeyRepository::from_config(&config.broker.request_keys)?;
    if keys.is_empty() {
        warn!("No request keys configured: subscribe and topic creation will always be rejected");
    }

    // Webhook delivery
    let transport = ReqwestTransport::new(config.dispatch.timeout(), &config.dispatch.user_agent)?;
    let dispatcher = Dispatcher::new(
        Arc::new(transport),
        DispatcherConfig {
            timeout: config.dispatch.timeout(),
            max_in_flight: config.dispatch.max_in_flight,
            report_capacity: config.dispatch.report_capacity,
            signing_secret: config.dispatch.signing_secret.clone(),
        },
    );
    if config.dispatch.signing_secret.is_some() {
        info!("Webhook payload signing enabled");
    }

    // Broker
    let broker = BrokerService::new(
        Arc::new(InMemoryTopicRepository::new()),
        Arc::new(keys),
        dispatcher,
    );
    broker
        .provision_topics(&config.broker.topics)
        .context("Invalid topic in broker.topics")?;

    let app = build_router(AppState::new(Arc::new(broker)));

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
