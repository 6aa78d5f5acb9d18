use thiserror::Error;

/// Failures while constructing a sink client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0} must not be empty")]
    MissingSetting(&'static str),

    #[error("failed to create HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
