//! Wire Decoder
//!
//! snappy block decompression -> protobuf deserialization -> flattening.

use std::sync::Arc;

use contracts::{Batch, Metric, Sample};
use prost::Message;
use tracing::trace;

use crate::error::Result;
use crate::proto::{ReadRequest, WriteRequest};

/// Decompress a snappy block-format body
pub fn decompress(body: &[u8]) -> Result<Vec<u8>> {
    Ok(snap::raw::Decoder::new().decompress_vec(body)?)
}

/// Decompress and deserialize a remote-write body without flattening
pub fn decode_write_message(body: &[u8]) -> Result<WriteRequest> {
    let buf = decompress(body)?;
    Ok(WriteRequest::decode(buf.as_slice())?)
}

/// Decode a remote-write body into a `Batch`
///
/// # Errors
/// - `DecodeError::Compression` if the body is not valid snappy data
/// - `DecodeError::Message` if the payload is not a valid `WriteRequest`
pub fn decode_write_request(body: &[u8]) -> Result<Batch> {
    let request = decode_write_message(body)?;
    Ok(flatten(request))
}

/// Decode a remote-read body
pub fn decode_read_request(body: &[u8]) -> Result<ReadRequest> {
    let buf = decompress(body)?;
    Ok(ReadRequest::decode(buf.as_slice())?)
}

/// Flatten the series tree into one sample per point
///
/// The label set of a series is built once and shared by all of its points.
/// Series and points keep wire order.
pub fn flatten(request: WriteRequest) -> Batch {
    let mut batch = Batch::with_capacity(request.sample_count());

    for series in request.timeseries {
        let metric: Arc<Metric> = Arc::new(
            series
                .labels
                .into_iter()
                .map(|l| (l.name, l.value))
                .collect(),
        );

        trace!(metric = %metric, points = series.samples.len(), "Flattening series");

        for point in series.samples {
            batch.push(Sample::new(Arc::clone(&metric), point.value, point.timestamp));
        }
    }

    batch
}
