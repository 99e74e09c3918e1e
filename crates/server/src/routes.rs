//! `/write` and `/read` handlers

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, info};

use crate::error::ServerError;
use crate::AppState;

/// Remote-write ingestion: decode, then fan out to every writer
///
/// Responds only after every writer returned. Writer failures never change
/// the status once decoding succeeded.
pub async fn write(State(state): State<AppState>, body: Body) -> Result<StatusCode, ServerError> {
    observability::record_request_received("write");

    let compressed = read_body(body, state.max_body_bytes).await?;
    let request = ingestion::decode_write_message(&compressed).inspect_err(|e| {
        observability::record_decode_failure("write", e.kind());
    })?;
    let num_series = request.timeseries.len();
    let batch = ingestion::flatten(request);

    debug!(num_series, num_samples = batch.len(), "remote_write");
    observability::record_batch_decoded(batch.len());

    state.dispatcher.dispatch(Arc::new(batch)).await;

    Ok(StatusCode::OK)
}

/// Remote-read boundary: decode only, no query execution
pub async fn read(State(state): State<AppState>, body: Body) -> Result<StatusCode, ServerError> {
    observability::record_request_received("read");

    let compressed = read_body(body, state.max_body_bytes).await?;
    let request = ingestion::decode_read_request(&compressed).inspect_err(|e| {
        observability::record_decode_failure("read", e.kind());
    })?;

    info!(queries = request.queries.len(), "remote_read");

    Ok(StatusCode::OK)
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, ServerError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(ServerError::ReadBody)
}
