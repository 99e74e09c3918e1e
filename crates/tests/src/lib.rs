//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - HTTP -> 解码 -> 分发 的 e2e 测试（无需真实后端）
//! - 失败隔离与 WARN 日志契约

#[cfg(test)]
mod contract_tests {
    use std::sync::Arc;

    use contracts::{Batch, Metric, RelayConfig, Sample};

    /// 样本模型的 JSON 形状是对外契约，变更需同步下游
    #[test]
    fn test_batch_json_snapshot() {
        let metric: Arc<Metric> = Arc::new([("job", "api"), ("__name__", "up")].into_iter().collect());
        let batch = Batch::new(vec![
            Sample::new(Arc::clone(&metric), 1.0, 1_700_000_000_000),
            Sample::new(metric, 0.5, 1_700_000_015_000),
        ]);

        let json = serde_json::to_string(&batch).unwrap();
        assert_eq!(
            json,
            r#"[{"metric":{"__name__":"up","job":"api"},"value":1.0,"timestamp":1700000000000},{"metric":{"__name__":"up","job":"api"},"value":0.5,"timestamp":1700000015000}]"#
        );
        assert_eq!(batch.samples()[0].metric.to_string(), r#"up{job="api"}"#);
    }

    /// 默认配置的 TOML 形状，CLI 在没有配置文件时使用它
    #[test]
    fn test_default_config_toml_snapshot() {
        let toml = config_loader::ConfigLoader::to_toml(&RelayConfig::default()).unwrap();
        let reloaded =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        assert!(toml.contains(r#"listen_address = "0.0.0.0:9201""#), "got: {toml}");
        assert!(toml.contains(r#"kind = "noop""#), "got: {toml}");
        assert_eq!(reloaded.writers[0].name, "kafka");
        assert_eq!(reloaded.writers[0].send_timeout_ms, 30_000);
    }
}

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use contracts::{Batch, ContractError, Metric, Sample, Writer};
    use dispatcher::{Dispatcher, WriterHandle};
    use tower::ServiceExt;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};

    /// Writer that keeps every batch it receives
    #[derive(Clone)]
    pub struct RecordingWriter {
        name: String,
        fail: bool,
        delay: Duration,
        pub batches: Arc<Mutex<Vec<Batch>>>,
        pub finished: Arc<AtomicBool>,
    }

    impl RecordingWriter {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                fail: false,
                delay: Duration::ZERO,
                batches: Arc::new(Mutex::new(Vec::new())),
                finished: Arc::new(AtomicBool::new(false)),
            }
        }

        pub fn failing(name: &str) -> Self {
            Self {
                fail: true,
                ..Self::new(name)
            }
        }

        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn call_count(&self) -> usize {
            self.batches.lock().unwrap().len()
        }
    }

    impl Writer for RecordingWriter {
        fn name(&self) -> &str {
            &self.name
        }

        async fn write(&self, batch: &Batch) -> Result<(), ContractError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.batches.lock().unwrap().push(batch.clone());
            self.finished.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(ContractError::writer_connection(&self.name, "broker unreachable"));
            }
            Ok(())
        }
    }

    pub fn dispatcher_of(writers: &[RecordingWriter]) -> Dispatcher {
        Dispatcher::new(writers.iter().cloned().map(WriterHandle::new).collect())
    }

    pub fn sample(pairs: &[(&str, &str)], value: f64, timestamp: i64) -> Sample {
        let metric: Metric = pairs.iter().map(|(k, v)| (*k, *v)).collect();
        Sample::new(Arc::new(metric), value, timestamp)
    }

    /// POST `body` to `uri` and return the status plus response body
    pub async fn post(app: axum::Router, uri: &str, body: Vec<u8>) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Encoding", "snappy")
                    .header("Content-Type", "application/x-protobuf")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Records the `storage` field of every WARN event
    #[derive(Clone, Default)]
    pub struct WarnCapture {
        pub storages: Arc<Mutex<Vec<String>>>,
        pub count: Arc<AtomicUsize>,
    }

    impl WarnCapture {
        pub fn storages(&self) -> Vec<String> {
            self.storages.lock().unwrap().clone()
        }
    }

    struct StorageVisitor(Option<String>);

    impl Visit for StorageVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "storage" {
                self.0 = Some(value.to_string());
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "storage" {
                self.0 = Some(format!("{:?}", value));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for WarnCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() != Level::WARN {
                return;
            }
            self.count.fetch_add(1, Ordering::SeqCst);
            let mut visitor = StorageVisitor(None);
            event.record(&mut visitor);
            if let Some(storage) = visitor.0 {
                self.storages.lock().unwrap().push(storage);
            }
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use contracts::{WriterConfig, WriterKind};
    use ingestion::proto::{Query, ReadRequest};
    use server::{router, AppState};
    use tracing_subscriber::layer::SubscriberExt;

    use crate::support::*;

    const LIMIT: usize = 1024 * 1024;

    /// End-to-end test: encoded request -> router -> decoder -> dispatcher -> writers
    #[tokio::test]
    async fn test_e2e_write_reaches_every_writer_in_order() {
        let writers = [RecordingWriter::new("kafka"), RecordingWriter::new("graphite")];
        let app = router(AppState::new(dispatcher_of(&writers), LIMIT));

        let samples = vec![
            sample(&[("__name__", "up"), ("job", "api")], 1.0, 1_700_000_000_000),
            sample(&[("__name__", "up"), ("job", "api")], 0.0, 1_700_000_015_000),
            sample(&[("__name__", "http_requests_total")], 42.5, 1_700_000_000_000),
        ];
        let body = ingestion::encode_write_request(&samples).unwrap();

        let (status, text) = post(app, "/write", body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.is_empty());

        for writer in &writers {
            let batches = writer.batches.lock().unwrap();
            assert_eq!(batches.len(), 1);
            let received = batches[0].samples();
            assert_eq!(received.len(), 3);
            assert_eq!(received[0].metric.name(), Some("up"));
            assert_eq!(received[0].timestamp, 1_700_000_000_000);
            assert_eq!(received[1].value, 0.0);
            assert_eq!(received[2].metric.name(), Some("http_requests_total"));
            assert_eq!(received[2].value, 42.5);
            // 同一序列的采样共享同一标签集
            assert!(Arc::ptr_eq(&received[0].metric, &received[1].metric));
        }
    }

    #[tokio::test]
    async fn test_e2e_bad_compression_never_reaches_writers() {
        let writer = RecordingWriter::new("kafka");
        let app = router(AppState::new(dispatcher_of(&[writer.clone()]), LIMIT));

        let (status, text) = post(app.clone(), "/write", b"definitely not snappy".to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("malformed compression"), "got: {text}");

        let (status, _) = post(app, "/read", b"definitely not snappy".to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_e2e_malformed_message_never_reaches_writers() {
        let writer = RecordingWriter::new("kafka");
        let app = router(AppState::new(dispatcher_of(&[writer.clone()]), LIMIT));

        // valid snappy framing around a truncated protobuf field
        let body = snap::raw::Encoder::new().compress_vec(&[0x0a, 0x05, 0x0a]).unwrap();
        let (status, text) = post(app.clone(), "/write", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("malformed message"), "got: {text}");

        let body = snap::raw::Encoder::new().compress_vec(&[0x0a, 0x05, 0x0a]).unwrap();
        let (status, text) = post(app, "/read", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("malformed message"), "got: {text}");

        assert_eq!(writer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_e2e_empty_request_still_dispatches() {
        let writer = RecordingWriter::new("kafka");
        let app = router(AppState::new(dispatcher_of(&[writer.clone()]), LIMIT));

        let body = ingestion::encode_write_request(&[]).unwrap();
        let (status, _) = post(app, "/write", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(writer.call_count(), 1);
        assert!(writer.batches.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn test_e2e_failing_writer_logs_one_warning() {
        let capture = WarnCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let writers = [RecordingWriter::new("good"), RecordingWriter::failing("bad")];
        let app = router(AppState::new(dispatcher_of(&writers), LIMIT));

        let body =
            ingestion::encode_write_request(&[sample(&[("__name__", "up")], 1.0, 1)]).unwrap();
        let (status, _) = post(app, "/write", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(writers[0].call_count(), 1);
        assert_eq!(writers[1].call_count(), 1);
        assert_eq!(capture.count.load(Ordering::SeqCst), 1);
        assert_eq!(capture.storages(), vec!["bad".to_string()]);
    }

    #[tokio::test]
    async fn test_e2e_k_of_n_failures_log_k_warnings() {
        let capture = WarnCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let writers = [
            RecordingWriter::failing("a"),
            RecordingWriter::new("b"),
            RecordingWriter::failing("c"),
            RecordingWriter::new("d"),
            RecordingWriter::failing("e"),
        ];
        let dispatcher = dispatcher_of(&writers);

        let batch = contracts::Batch::new(vec![sample(&[("__name__", "up")], 1.0, 1)]);
        let report = dispatcher.dispatch(Arc::new(batch)).await;

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed_count(), 3);
        assert_eq!(capture.count.load(Ordering::SeqCst), 3);

        let mut storages = capture.storages();
        storages.sort();
        assert_eq!(storages, vec!["a", "c", "e"]);
        assert!(writers.iter().all(|w| w.call_count() == 1));
    }

    #[tokio::test]
    async fn test_e2e_response_waits_for_slowest_writer() {
        let slow = RecordingWriter::new("slow").delayed(Duration::from_millis(150));
        let fast = RecordingWriter::new("fast");
        let app = router(AppState::new(dispatcher_of(&[slow.clone(), fast.clone()]), LIMIT));

        let body =
            ingestion::encode_write_request(&[sample(&[("__name__", "up")], 1.0, 1)]).unwrap();
        let (status, _) = post(app, "/write", body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(slow.finished.load(Ordering::SeqCst));
        assert!(fast.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_e2e_read_is_decoded_but_not_dispatched() {
        let writer = RecordingWriter::new("kafka");
        let app = router(AppState::new(dispatcher_of(&[writer.clone()]), LIMIT));

        let request = ReadRequest {
            queries: vec![Query {
                start_timestamp_ms: 0,
                end_timestamp_ms: 60_000,
                ..Default::default()
            }],
            ..Default::default()
        };
        let body = ingestion::encode_read_request(&request).unwrap();

        let (status, text) = post(app, "/read", body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.is_empty());
        assert_eq!(writer.call_count(), 0);
    }

    /// Config -> dispatcher -> router with the noop writer
    #[tokio::test]
    async fn test_e2e_config_to_noop_dispatcher() {
        let config = config_loader::ConfigLoader::load_from_str(
            r#"
[server]
listen_address = "127.0.0.1:9201"
max_body_bytes = 4096

[[writers]]
name = "kafka"
kind = "noop"
endpoint = "localhost:9092"
"#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.writers[0].kind, WriterKind::Noop);

        let dispatcher = dispatcher::create_dispatcher(config.writers.clone()).unwrap();
        assert_eq!(dispatcher.writer_names(), vec!["kafka"]);

        let app = router(AppState::new(dispatcher.clone(), config.server.max_body_bytes));
        let body =
            ingestion::encode_write_request(&[sample(&[("__name__", "up")], 1.0, 1)]).unwrap();
        let (status, _) = post(app, "/write", body).await;
        assert_eq!(status, StatusCode::OK);

        let metrics = dispatcher.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].1.write_count, 1);
        assert_eq!(metrics[0].1.samples_written, 1);
    }

    #[test]
    fn test_duplicate_writer_names_rejected_before_dispatch() {
        let writer = WriterConfig::default();
        let config = contracts::RelayConfig {
            writers: vec![writer.clone(), writer],
            ..Default::default()
        };
        assert!(config_loader::ConfigLoader::validate(&config).is_err());
    }
}
