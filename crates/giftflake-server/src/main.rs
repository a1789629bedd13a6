//! # An HTTP server for workshop-unique gift identifiers
//!
//! `giftflake-server` exposes the [`giftflake`] generator over a small JSON
//! API:
//!
//! - `POST /api/v1/gift-id/generate` mints the next identifier for an
//!   optional `gift_class` (`"toy"` or `"coal"`, default toy)
//! - `GET /api/v1/gift-id/{id}/decode` unpacks an identifier's fields
//! - `GET /health` reports liveness and the configured workshop ID
//!
//! The process is stateless: the workshop ID is supplied by the operator at
//! each start (see `--help`) and is the only coordination point in the
//! fleet. Identifiers are returned as decimal strings so 53-bit JSON
//! consumers survive them.
//!
//! ## Running the server
//!
//! ```bash
//! giftflake-server --workshop-id 7 --port 8080
//!
//! curl -s -X POST localhost:8080/api/v1/gift-id/generate \
//!   -H 'content-type: application/json' -d '{"gift_class": "coal"}'
//! ```

use anyhow::Context;
use clap::Parser;
use giftflake::{GiftIdGenerator, SystemClock};
use giftflake_server::config::{CliArgs, ServerConfig};
use giftflake_server::routes::{self, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftflake_server=info,giftflake=info".into()),
        )
        .init();

    let generator = GiftIdGenerator::new(config.workshop_id, SystemClock)?;
    let state = AppState {
        generator: Arc::new(generator),
    };
    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        "gift ID service listening on {} (workshop {})",
        listener.local_addr()?,
        config.workshop_id
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("service shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
