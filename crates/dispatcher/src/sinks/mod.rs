//! Writer implementations
//!
//! Contains NoopWriter, the placeholder backend.

mod noop;

pub use self::noop::NoopWriter;
