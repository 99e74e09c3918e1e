//! Wire encoder (client side of the protocol)
//!
//! Builds snappy-compressed remote-write / remote-read bodies.

use std::sync::Arc;

use contracts::{Metric, Sample};
use prost::Message;

use crate::proto::{Label, ReadRequest, Sample as WireSample, TimeSeries, WriteRequest};

/// Group samples into series
///
/// Consecutive samples with the same label set become one series, so a
/// decoded `Batch` encodes back to the tree it came from.
pub fn to_write_request(samples: &[Sample]) -> WriteRequest {
    let mut timeseries: Vec<TimeSeries> = Vec::new();
    let mut current: Option<&Arc<Metric>> = None;

    for sample in samples {
        let same_series = current
            .map(|m| Arc::ptr_eq(m, &sample.metric) || **m == *sample.metric)
            .unwrap_or(false);

        if !same_series {
            timeseries.push(TimeSeries {
                labels: sample
                    .metric
                    .iter()
                    .map(|(name, value)| Label {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
                samples: Vec::new(),
            });
            current = Some(&sample.metric);
        }

        if let Some(series) = timeseries.last_mut() {
            series.samples.push(WireSample {
                value: sample.value,
                timestamp: sample.timestamp,
            });
        }
    }

    WriteRequest {
        timeseries,
        metadata: Vec::new(),
    }
}

/// Encode samples as a remote-write body
pub fn encode_write_request(samples: &[Sample]) -> Result<Vec<u8>, snap::Error> {
    compress(&to_write_request(samples))
}

/// Encode a remote-read body
pub fn encode_read_request(request: &ReadRequest) -> Result<Vec<u8>, snap::Error> {
    compress(request)
}

fn compress(message: &impl Message) -> Result<Vec<u8>, snap::Error> {
    snap::raw::Encoder::new().compress_vec(&message.encode_to_vec())
}
