use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer_auth::IdpClient;
use wayfarer_server::{auth::AppState, config::ServerConfig, router};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("failed to load configuration");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.log_summary();

    // Refuse to start with incomplete provider configuration rather than
    // serving unauthenticated traffic.
    let idp_config = config.idp_config().unwrap_or_else(|error| {
        tracing::error!(%error, "identity provider is not configured");
        std::process::exit(1);
    });

    let idp = IdpClient::new(idp_config).expect("failed to build identity provider client");
    let state = Arc::new(AppState::new(idp));

    let allowed_origin = config
        .base_url
        .parse()
        .expect("BASE_URL is not a valid header value");
    let app = router::build(state, allowed_origin);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("shutting down");
}
