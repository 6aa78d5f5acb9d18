//! Error types for the ingest pipeline.

use thiserror::Error;

/// A packet entity did not have the one-level shape the flattener supports.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("field `{field}` nests deeper than one level")]
    Nested { field: String },

    #[error("entity {index} is not an object")]
    NotAnObject { index: usize },

    #[error("failed to serialize packet entity: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures while merging a packet into a record batch.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Flatten(#[from] FlattenError),

    /// Solo mode asked for a player slot the batch does not have.
    #[error("player car index {index} out of range for {len} records")]
    PlayerIndexOutOfRange { index: usize, len: usize },
}

/// Failures reported by a downstream sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Connection, TLS or timeout failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The collector answered with a non-success status.
    #[error("collector returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}
