//! Sample model - Wire Decoder output
//!
//! Normalized time-series points handed to every writer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Label carrying the metric name
pub const METRIC_NAME_LABEL: &str = "__name__";

/// One dimension of a metric identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Label set identifying one time series
///
/// Names are unique; inserting an existing name replaces its value.
/// An empty set is allowed and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metric {
    labels: BTreeMap<String, String>,
}

impl Metric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, returning the previous value for that name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.labels.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// Value of the `__name__` label
    pub fn name(&self) -> Option<&str> {
        self.get(METRIC_NAME_LABEL)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate labels ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<Label> for Metric {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut metric = Metric::new();
        for label in iter {
            metric.insert(label.name, label.value);
        }
        metric
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metric {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metric = Metric::new();
        for (name, value) in iter {
            metric.insert(name, value);
        }
        metric
    }
}

/// Prometheus exposition style: `up{job="api"}`
impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            f.write_str(name)?;
        }
        f.write_str("{")?;
        let mut first = true;
        for (name, value) in self.iter().filter(|(n, _)| *n != METRIC_NAME_LABEL) {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}={:?}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Single measurement of a time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Series identity, shared by all points of one series
    pub metric: Arc<Metric>,

    /// Measured value
    pub value: f64,

    /// Milliseconds since epoch
    pub timestamp: i64,
}

impl Sample {
    pub fn new(metric: Arc<Metric>, value: f64, timestamp: i64) -> Self {
        Self {
            metric,
            value,
            timestamp,
        }
    }

    /// Timestamp as float seconds (log output only)
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp as f64 / 1e3
    }
}

/// Ordered samples decoded from one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    samples: Vec<Sample>,
}

impl Batch {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl From<Vec<Sample>> for Batch {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
