use std::path::Path;

use anyhow::{Context, Result};
use shared::protocol::FALLBACK_MEDIA_TYPE;

/// Document selected by the user, held until the next submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub media_type: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        filename: impl Into<String>,
        media_type: Option<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string()),
            content,
        }
    }

    /// Reads `path` and guesses the media type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let media_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self::new(filename, media_type, content))
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(String),
    Failed(String),
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Succeeded(answer) => Some(answer),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// One outbound ask call. Built at submit time and consumed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub question: String,
    pub file: UploadedFile,
}

/// Raw response as seen by the transport; interpretation is the controller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl AskReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
