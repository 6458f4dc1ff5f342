use crate::errors::KackyError;

/// Failure of a single roster fetch.
///
/// Surfaced to the presentation layer as a value on `PollState`, never
/// raised: the last good roster stays on screen when this happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Roster request failed: {message}")]
    Network { message: String },

    #[error("Roster request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Roster request was rejected with HTTP {status}. Check your token.")]
    Unauthorized { status: u16 },

    #[error("Roster endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("Failed to decode roster response: {message}")]
    Decode { message: String },
}

impl KackyError for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "FETCH_NETWORK_ERROR",
            FetchError::Timeout { .. } => "FETCH_TIMEOUT",
            FetchError::Unauthorized { .. } => "FETCH_UNAUTHORIZED",
            FetchError::Status { .. } => "FETCH_BAD_STATUS",
            FetchError::Decode { .. } => "FETCH_DECODE_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, FetchError::Unauthorized { .. })
    }
}
