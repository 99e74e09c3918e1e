//! Prometheus remote storage protobuf messages
//!
//! Hand-derived `prost` messages matching `prompb/remote.proto` and
//! `prompb/types.proto`. Fields this relay never reads (exemplars, native
//! histograms) are skipped by prost as unknown fields.

/// Body of a remote-write push
#[derive(Clone, PartialEq, prost::Message)]
pub struct WriteRequest {
    #[prost(message, repeated, tag = "1")]
    pub timeseries: Vec<TimeSeries>,

    #[prost(message, repeated, tag = "3")]
    pub metadata: Vec<MetricMetadata>,
}

impl WriteRequest {
    /// Total number of points across all series
    pub fn sample_count(&self) -> usize {
        self.timeseries.iter().map(|ts| ts.samples.len()).sum()
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TimeSeries {
    #[prost(message, repeated, tag = "1")]
    pub labels: Vec<Label>,

    #[prost(message, repeated, tag = "2")]
    pub samples: Vec<Sample>,
}

#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct Label {
    #[prost(string, tag = "1")]
    pub name: String,

    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Sample {
    #[prost(double, tag = "1")]
    pub value: f64,

    /// Milliseconds since epoch
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetricMetadata {
    /// `MetricType` enum value (counter = 1, gauge = 2, ...)
    #[prost(int32, tag = "1")]
    pub r#type: i32,

    #[prost(string, tag = "2")]
    pub metric_family_name: String,

    #[prost(string, tag = "4")]
    pub help: String,

    #[prost(string, tag = "5")]
    pub unit: String,
}

/// Body of a remote-read request
#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadRequest {
    #[prost(message, repeated, tag = "1")]
    pub queries: Vec<Query>,

    #[prost(int32, repeated, tag = "2")]
    pub accepted_response_types: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Query {
    #[prost(int64, tag = "1")]
    pub start_timestamp_ms: i64,

    #[prost(int64, tag = "2")]
    pub end_timestamp_ms: i64,

    #[prost(message, repeated, tag = "3")]
    pub matchers: Vec<LabelMatcher>,

    #[prost(message, optional, tag = "4")]
    pub hints: Option<ReadHints>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LabelMatcher {
    /// 0 = EQ, 1 = NEQ, 2 = RE, 3 = NRE
    #[prost(int32, tag = "1")]
    pub r#type: i32,

    #[prost(string, tag = "2")]
    pub name: String,

    #[prost(string, tag = "3")]
    pub value: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReadHints {
    #[prost(int64, tag = "1")]
    pub step_ms: i64,

    #[prost(string, tag = "2")]
    pub func: String,

    #[prost(int64, tag = "3")]
    pub start_ms: i64,

    #[prost(int64, tag = "4")]
    pub end_ms: i64,

    #[prost(string, repeated, tag = "5")]
    pub grouping: Vec<String>,

    #[prost(bool, tag = "6")]
    pub by: bool,

    #[prost(int64, tag = "7")]
    pub range_ms: i64,
}
