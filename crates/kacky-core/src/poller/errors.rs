use crate::errors::KackyError;

#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("No tokio runtime is available to run the background task")]
    NoRuntime,

    #[error("Background task '{task}' failed: {message}")]
    TaskFailed { task: &'static str, message: String },
}

impl KackyError for PollerError {
    fn error_code(&self) -> &'static str {
        match self {
            PollerError::NoRuntime => "POLLER_NO_RUNTIME",
            PollerError::TaskFailed { .. } => "POLLER_TASK_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        false
    }
}
