use thiserror::Error;

/// Failure of a catalog call. Generation calls classify their failures
/// into user-facing envelopes instead of surfacing this type.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream responded with status {status}")]
    Status { status: u16 },
    #[error("network error: {0}")]
    Network(#[source] wreq::Error),
    #[error("decode error: {0}")]
    Decode(#[source] wreq::Error),
}
