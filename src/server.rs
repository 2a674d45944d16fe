// src/server.rs

//! Static feed server for serve mode.
//!
//! One route, `GET /<feed file name>`, answered from disk on every request.
//! Everything else is 404. Before the first feed exists the route answers
//! 503 instead of waiting for a refresh.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::error::{AppError, Result};
use crate::models::ServerConfig;
use crate::storage::FeedFile;

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const NOT_YET_AVAILABLE: &str = "feed not yet available";

/// URL path the feed is served at.
pub fn feed_route(output: &Path) -> String {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "feed.xml".to_string());
    format!("/{name}")
}

/// Build the router for a feed file.
pub fn router(feed: FeedFile) -> Router {
    let route = feed_route(feed.path());
    Router::new()
        .route(&route, get(serve_feed))
        .fallback(not_found)
        .with_state(Arc::new(feed))
}

/// Bind the configured address.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = format!("{}:{}", config.bind, config.port);
    TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::server(format!("cannot bind {addr}: {e}")))
}

/// Serve the feed until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, feed: FeedFile, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    let route = feed_route(feed.path());
    if let Some(addr) = addr {
        log::info!("Serving feed on http://{}{}", addr, route);
    }

    axum::serve(listener, router(feed))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::server)
}

/// Resolves once `true` is sent on the channel (or the sender is dropped).
pub async fn shutdown_signal(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn serve_feed(State(feed): State<Arc<FeedFile>>) -> Response {
    match feed.read().await {
        Ok(Some(bytes)) => ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], bytes).into_response(),
        Ok(None) => (StatusCode::SERVICE_UNAVAILABLE, NOT_YET_AVAILABLE).into_response(),
        Err(e) => {
            log::error!("Failed to read {}: {}", feed.path().display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read feed").into_response()
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}
