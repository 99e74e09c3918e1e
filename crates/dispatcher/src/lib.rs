//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 持有启动时构建、之后不可变的 writer 集合
//! - 每个 batch 为每个 writer 启动一个并发任务
//! - 等待全部 writer 返回后再交还调用方 (屏障)
//! - 单个 writer 失败只记录日志，不影响其他 writer

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{Batch, Writer};
pub use dispatcher::{
    create_dispatcher, DispatchReport, Dispatcher, DispatcherBuilder, DispatcherConfig,
};
pub use error::DispatcherError;
pub use handle::WriterHandle;
pub use metrics::{InFlightGuard, MetricsSnapshot, WriterMetrics};
pub use sinks::NoopWriter;
