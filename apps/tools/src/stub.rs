//! Local stand-in for the answering service, for exercising the client by hand.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use shared::{
    error::AskErrorBody,
    protocol::{AskAnswerBody, ASK_PATH, FILE_FIELD, QUESTION_FIELD},
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Fixed answer; when unset the stub describes what it received.
    pub answer: Option<String>,
    pub fail_with: Option<String>,
    pub fail_status: StatusCode,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            answer: None,
            fail_with: None,
            fail_status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Default)]
struct ReceivedForm {
    question: Option<String>,
    filename: Option<String>,
    file_size: Option<usize>,
}

pub fn router(config: StubConfig) -> Router {
    Router::new()
        .route(ASK_PATH, post(handle_ask))
        .with_state(Arc::new(config))
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(AskErrorBody::new(message))).into_response()
}

async fn read_form(mut multipart: Multipart) -> Result<ReceivedForm, String> {
    let mut form = ReceivedForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(QUESTION_FIELD) => {
                form.question = Some(field.text().await.map_err(|e| e.to_string())?);
            }
            Some(FILE_FIELD) => {
                form.filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                form.file_size = Some(bytes.len());
            }
            other => warn!(field = ?other, "ignoring unexpected form field"),
        }
    }
    Ok(form)
}

async fn handle_ask(State(config): State<Arc<StubConfig>>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, err),
    };

    let Some(file_size) = form.file_size else {
        return error_response(StatusCode::BAD_REQUEST, format!("{FILE_FIELD} is required"));
    };
    let question = form.question.unwrap_or_default();
    let filename = form.filename.unwrap_or_else(|| "unnamed".to_string());
    info!(
        question_len = question.len(),
        filename = %filename,
        file_size,
        "ask received"
    );

    if let Some(message) = &config.fail_with {
        return error_response(config.fail_status, message.clone());
    }

    let answer = config.answer.clone().unwrap_or_else(|| {
        format!("Received question '{question}' about {filename} ({file_size} bytes).")
    });
    (StatusCode::OK, Json(AskAnswerBody::new(answer))).into_response()
}

#[cfg(test)]
#[path = "tests/stub_tests.rs"]
mod tests;
