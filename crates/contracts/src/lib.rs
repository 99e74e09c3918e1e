//! # Contracts
//!
//! Frozen interface contracts shared by every relay crate: the sample model,
//! the `Writer` capability and the relay configuration.
//! Business crates depend on this crate only, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Sample timestamps are milliseconds since the Unix epoch (`i64`), the
//!   remote-write wire unit
//! - Float seconds only appear in log output

mod config;
mod error;
mod sample;
mod writer;

pub use config::*;
pub use error::*;
pub use sample::*;
pub use writer::*;
