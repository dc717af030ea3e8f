use thiserror::Error;

/// Transport-layer failures. Deliberately generic on the receiving side —
/// spec §4.1 requires callers to see one undifferentiated authentication
/// error; internal logs carry the detail via `tracing`.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("missing signature headers")]
    MissingSignature,

    #[error("stale timestamp")]
    Stale,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),
}

impl warp::reject::Reject for TransportError {}
