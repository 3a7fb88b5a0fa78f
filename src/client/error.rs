use thiserror::Error;

/// Errors raised while talking to the `$match` endpoint.
///
/// The matcher treats all of these as per-chunk failures: the chunk degrades
/// to empty results and processing continues.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid match endpoint configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("match request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("match endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode match response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}
