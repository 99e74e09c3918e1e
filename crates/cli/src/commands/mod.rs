//! Command implementations.

mod serve;
mod validate;

pub use serve::run_serve;
pub use validate::run_validate;
