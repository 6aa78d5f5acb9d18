//! HTTP sinks for the F1 2022 ingest pipeline.
//!
//! - [`HecClient`]: Splunk HTTP Event Collector, implements
//!   [`f1_ingest_pipeline::EventSink`].
//! - [`SignalFxClient`]: Splunk Observability datapoint ingest, implements
//!   [`f1_ingest_pipeline::MetricsSink`].
//!
//! Both hold a pooled `reqwest::Client` and are cheap to share behind an
//! `Arc`. Failed requests are reported, never retried.

pub mod error;
pub mod hec;
pub mod signalfx;

pub use error::ClientError;
pub use hec::{HEC_SOURCE, HecClient, HecConfig};
pub use signalfx::{SignalFxClient, SignalFxConfig};

use f1_ingest_pipeline::SinkError;

/// Turn a non-success response into [`SinkError::Status`], keeping a short
/// prefix of the body for the log line.
async fn response_error(response: reqwest::Response) -> SinkError {
    const MAX_BODY: usize = 256;
    let status = response.status().as_u16();
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_BODY {
        let cut = (0..=MAX_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    SinkError::Status { status, body }
}
