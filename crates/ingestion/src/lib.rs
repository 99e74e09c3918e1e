//! # Ingestion
//!
//! Remote-write wire decoding.
//!
//! Responsibilities:
//! - Decompress snappy block-format request bodies
//! - Deserialize `WriteRequest` / `ReadRequest` protobuf messages
//! - Flatten the series tree into an ordered `Batch` of `Sample`s
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::decode_write_request;
//!
//! let batch = decode_write_request(&body)?;
//! dispatcher.dispatch(Arc::new(batch)).await;
//! ```

mod decoder;
mod encoder;
mod error;
pub mod proto;

// Re-exports
pub use contracts::{Batch, Sample};
pub use decoder::{
    decode_read_request, decode_write_message, decode_write_request, decompress, flatten,
};
pub use encoder::{encode_read_request, encode_write_request, to_write_request};
pub use error::{DecodeError, Result};
pub use proto::{ReadRequest, WriteRequest};
