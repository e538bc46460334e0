use anyhow::Result;
use campus_portal::{proxy::Forwarder, web, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting campus portal gateway");

    // Load configuration from environment
    let config = campus_portal::config::Config::load()?;
    tracing::info!(
        environment = ?config.environment,
        backend_url = %config.backend_url,
        login_portal = %config.portals.login,
        "Configuration loaded"
    );

    let forwarder = Forwarder::new(
        config.backend_url.clone(),
        config.http_connect_timeout_secs,
        config.http_request_timeout_secs,
        config.readiness_probe_timeout_ms,
    )
    .map_err(|e| anyhow::anyhow!("Failed to build backend HTTP client: {}", e))?;

    if !forwarder.probe().await {
        // Not fatal: /readyz reports it until the backend comes up
        tracing::warn!(backend_url = %config.backend_url, "Backend not reachable at startup");
    }

    let state = Arc::new(AppState {
        config: Arc::new(config.clone()),
        forwarder: Arc::new(forwarder),
    });

    let app = web::create_router(state);

    // Bind and serve
    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(
        routes = campus_portal::proxy::ROUTES.len(),
        production = config.is_production(),
        "Gateway listening on {}",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
