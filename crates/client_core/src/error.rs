//! Submission failure taxonomy and the user-facing messages each kind maps to.

use thiserror::Error;

/// Shown when submit is invoked without a selected file.
pub const FILE_REQUIRED_MESSAGE: &str = "Please upload a PDF file.";
/// Shown when the service reports failure without saying why.
pub const REMOTE_FALLBACK_MESSAGE: &str = "An error occurred while fetching the answer.";
/// Shown when no usable response was obtained.
pub const FETCH_FALLBACK_MESSAGE: &str = "Sorry, I couldn't fetch the answer. Please try again.";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport failure: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no file selected")]
    MissingFile,
    #[error("service responded with status {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Remote { status: u16, message: Option<String> },
    #[error("unreadable response body: {0}")]
    Protocol(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// Message stored in `SubmissionState::Failed`.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFile => FILE_REQUIRED_MESSAGE.to_string(),
            Self::Remote {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Remote { message: None, .. } => REMOTE_FALLBACK_MESSAGE.to_string(),
            Self::Protocol(_) | Self::Transport(_) => FETCH_FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingFile => "validation",
            Self::Remote { .. } => "remote",
            Self::Protocol(_) => "protocol",
            Self::Transport(_) => "transport",
        }
    }
}
