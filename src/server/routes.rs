//! Axum HTTP routes for the counting API.

use crate::config::ScanConfig;
use crate::error::{ServerError, ServerResult};
use crate::scan::{locate, WordCounter};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Server-side configuration shared by every request
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Fixed corpus directory all scans are anchored under
    pub corpus_root: PathBuf,

    /// Worker pool size per scan
    pub workers: usize,
}

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
}

/// Request body for a count operation
#[derive(Debug, Deserialize)]
pub struct CountRequest {
    pub directory: String,
    pub word: String,
}

/// Response body for a successful count
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

// ─── Route builder ───────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>) -> Router {
    // Unmatched routes fall through to axum's default empty 404
    Router::new()
        .route("/counter", post(count_words))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Handlers ────────────────────────────────────────────────────

async fn count_words(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CountRequest>, JsonRejection>,
) -> ServerResult<Json<CountResponse>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    ScanConfig::validate_word(&request.word)?;

    let config = state.config.clone();
    let count = tokio::task::spawn_blocking(move || run_count(&config, &request))
        .await
        .map_err(|e| ServerError::Other(format!("Scan task failed: {e}")))??;

    Ok(Json(CountResponse { count }))
}

/// Resolve the request's directory and run exactly one scan over it.
///
/// A retried scan after directory relocation always uses a fresh session
/// (and therefore a fresh counter), so a partial first attempt can never
/// be double-counted.
fn run_count(server: &ServerConfig, request: &CountRequest) -> ServerResult<u64> {
    let root = resolve_scan_root(server, &request.directory)?;

    let config = ScanConfig::new(root, &request.word).with_workers(server.workers);
    let session = WordCounter::new(config).map_err(|e| ServerError::Other(e.to_string()))?;

    let summary = session
        .run_to_completion()
        .map_err(|e| ServerError::Other(e.to_string()))?;

    if !summary.is_clean() {
        warn!(
            directory = %request.directory,
            count = summary.count,
            errors = summary.errors.len(),
            "Scan finished with errors; partial count retained"
        );
        return Err(ServerError::ScanFailed(summary.errors[0].to_string()));
    }

    info!(
        directory = %request.directory,
        word = %request.word,
        count = summary.count,
        "Successfully counted word occurrences"
    );

    Ok(summary.count)
}

/// Anchor the requested directory under the corpus root.
///
/// The root itself may be named by its base name; anything else is
/// resolved by the directory locator.
fn resolve_scan_root(server: &ServerConfig, directory: &str) -> ServerResult<PathBuf> {
    let names_root = server
        .corpus_root
        .file_name()
        .is_some_and(|name| name == OsStr::new(directory));

    if names_root {
        return Ok(server.corpus_root.clone());
    }

    info!(directory, "Directory does not name the corpus root, attempting to locate it");
    Ok(locate(&server.corpus_root, directory)?)
}

// ─── Server startup ──────────────────────────────────────────────

/// Start the counting server
pub async fn serve(config: ServerConfig, bind: &str, port: u16) -> ServerResult<()> {
    if !config.corpus_root.is_dir() {
        warn!(
            root = %config.corpus_root.display(),
            "Corpus root is not a directory; scans will fail until it exists"
        );
    }

    let state = Arc::new(AppState { config });
    let router = build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| ServerError::Other(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Counting server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves when an interrupt or termination signal arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_root_by_base_name() {
        let dir = tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();

        let server = ServerConfig {
            corpus_root: corpus.clone(),
            workers: 2,
        };

        let resolved = resolve_scan_root(&server, "corpus").unwrap();
        assert_eq!(resolved, corpus);
    }

    #[test]
    fn test_resolve_subdirectory_via_locator() {
        let dir = tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir_all(corpus.join("books")).unwrap();

        let server = ServerConfig {
            corpus_root: corpus.clone(),
            workers: 2,
        };

        let resolved = resolve_scan_root(&server, "books").unwrap();
        assert_eq!(resolved, corpus.join("books"));
    }

    #[test]
    fn test_resolve_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();

        let server = ServerConfig {
            corpus_root: corpus,
            workers: 2,
        };

        assert!(matches!(
            resolve_scan_root(&server, "missing"),
            Err(ServerError::Lookup(_))
        ));
    }
}
