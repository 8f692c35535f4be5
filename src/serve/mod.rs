//! Post-batch static file server
//!
//! Exposes the output directory over HTTP once the batch has finished.
//! Serving blocks until the process is stopped.

use crate::HarvestError;
use axum::Router;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Builds a router that serves files from `dir`
pub fn router(dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(TraceLayer::new_for_http())
}

/// Binds `host:port` and serves `dir` until the process exits
pub async fn serve_directory(dir: &Path, host: &str, port: u16) -> Result<(), HarvestError> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| serve_error(dir, source))?;

    println!("Serving scraped files at http://{}/", addr);
    serve_on(listener, dir).await
}

/// Serves `dir` on an already bound listener
pub async fn serve_on(listener: TcpListener, dir: &Path) -> Result<(), HarvestError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Serving {} on {}", dir.display(), addr);
    }

    axum::serve(listener, router(dir))
        .await
        .map_err(|source| serve_error(dir, source))
}

fn serve_error(dir: &Path, source: std::io::Error) -> HarvestError {
    HarvestError::Serve {
        path: PathBuf::from(dir),
        source,
    }
}
