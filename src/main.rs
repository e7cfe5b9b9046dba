//! Population Query Gateway
//!
//! A lightweight proxy that forwards browser/agent requests to the Seoul
//! open-data population API, reshapes the upstream JSON into a simplified
//! envelope, and adds permissive cross-origin access.
//!
//! ```text
//!   Client ──▶ http (axum router, CORS, request ID)
//!                 └─▶ gateway (url build → single GET → filter → normalize)
//!                        └─▶ openapi.seoul.go.kr
//! ```

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use population_gateway::config;
use population_gateway::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "population_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("population-gateway v0.1.0 starting");

    // Environment is read exactly once; everything downstream gets the
    // validated config by value.
    let config = config::loader::load_from_env()?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
