//! Relay 指标收集模块
//!
//! 解码与分发路径上的计数器/直方图，经 `metrics` facade 上报。

use metrics::{counter, histogram};

/// 记录收到的请求 (endpoint = "write" / "read")
pub fn record_request_received(endpoint: &'static str) {
    counter!("remote_relay_requests_total", "endpoint" => endpoint).increment(1);
}

/// 记录一次成功解码的写请求
pub fn record_batch_decoded(sample_count: usize) {
    counter!("remote_relay_samples_received_total").increment(sample_count as u64);
    histogram!("remote_relay_batch_size").record(sample_count as f64);
}

/// 记录解码失败 (kind 来自 `DecodeError::kind`)
pub fn record_decode_failure(endpoint: &'static str, kind: &'static str) {
    counter!(
        "remote_relay_decode_failures_total",
        "endpoint" => endpoint,
        "kind" => kind
    )
    .increment(1);
}

/// 记录单个 writer 的分发结果
pub fn record_batch_dispatched(writer: &str, success: bool, sample_count: usize) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "remote_relay_batches_dispatched_total",
        "writer" => writer.to_string(),
        "status" => status
    )
    .increment(1);

    if success {
        counter!(
            "remote_relay_samples_sent_total",
            "writer" => writer.to_string()
        )
        .increment(sample_count as u64);
    }
}

/// 记录一次完整分发 (屏障等待) 的耗时
pub fn record_dispatch_duration_ms(duration_ms: f64) {
    histogram!("remote_relay_dispatch_duration_ms").record(duration_ms);
}
