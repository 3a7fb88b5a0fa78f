use thiserror::Error;

/// Errors raised by the cross-encoder ranker.
#[derive(Debug, Error)]
pub enum RankerError {
    #[error("failed to load cross-encoder model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("cross-encoder inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("invalid ranker configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for RankerError {
    fn from(err: candle_core::Error) -> Self {
        RankerError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for RankerError {
    fn from(err: std::io::Error) -> Self {
        RankerError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
