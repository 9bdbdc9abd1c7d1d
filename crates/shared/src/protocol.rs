//! Wire contract between the ask client and the answering service.
//!
//! The service matches multipart parts by name, so the field names here are
//! part of the contract and must not change.

use serde::{Deserialize, Serialize};

/// Multipart part carrying the question text.
pub const QUESTION_FIELD: &str = "question";
/// Multipart part carrying the document bytes.
pub const FILE_FIELD: &str = "pdf_file";
/// Path the answering service serves the ask operation on.
pub const ASK_PATH: &str = "/ask";
/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/ask";
/// Media type used when the selected file declares none.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Body of a successful ask response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskAnswerBody {
    pub answer: String,
}

impl AskAnswerBody {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}
