// file: src/server/mod.rs
// description: http server bootstrap and graceful shutdown
// reference: https://docs.rs/axum

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, SharedState};
pub use routes::{create_router, create_router_with_middleware};

use crate::error::Result;
use crate::pipeline::QueryPipeline;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Binds the configured address and serves until ctrl-c or SIGTERM.
pub async fn serve(pipeline: QueryPipeline) -> Result<()> {
    let addr = format!(
        "{}:{}",
        pipeline.config().server.host,
        pipeline.config().server.port
    );
    let port = pipeline.config().server.port;

    let state = Arc::new(AppState::new(pipeline));
    let app = create_router_with_middleware(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);
    info!("Server running on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
