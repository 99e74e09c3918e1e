//! # Server
//!
//! HTTP boundary of the relay.
//!
//! - `POST /write`: remote-write ingestion, decode + dispatch
//! - `POST /read`: remote-read decode stub
//!
//! Status mapping: body read failure -> 500, decode failure -> 400,
//! otherwise 200 regardless of writer outcomes.

mod error;
mod routes;

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::post;
use axum::Router;
use dispatcher::Dispatcher;
use tokio::net::TcpListener;
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};

pub use error::ServerError;

/// Shared per-process state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    /// Immutable writer set
    pub dispatcher: Dispatcher,
    /// Maximum accepted request body size
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, max_body_bytes: usize) -> Self {
        Self {
            dispatcher,
            max_body_bytes,
        }
    }
}

/// Build the relay router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/write", post(routes::write))
        .route("/read", post(routes::read))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn serve<F>(addr: SocketAddr, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening for remote write");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
