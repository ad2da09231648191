use thiserror::Error;

/// Why an adjustment fetch produced nothing usable. The estimator treats
/// every variant the same way and falls back to zero adjustments.
#[derive(Debug, Error)]
pub enum AdjustmentSourceError {
    #[error("adjustment endpoint is empty")]
    EmptyEndpoint,

    #[error("failed to build adjustment client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("adjustment endpoint {endpoint} unreachable: {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("adjustment endpoint {endpoint} answered {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("adjustment payload is not valid: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("adjustment payload must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}
