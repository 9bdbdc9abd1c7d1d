use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{FALLBACK_MEDIA_TYPE, FILE_FIELD, QUESTION_FIELD};
use tracing::debug;

use crate::{
    error::TransportError,
    types::{AskReply, AskRequest},
};

/// Moves one ask request to the answering service and hands back whatever came back.
///
/// Implementations report only transport-level failures as errors; any HTTP
/// status, success or not, is an `Ok(AskReply)`.
#[async_trait]
pub trait AskTransport: Send + Sync {
    async fn ask(&self, request: AskRequest) -> Result<AskReply, TransportError>;
}

pub struct HttpAskTransport {
    http: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpAskTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub(crate) fn build_form(request: AskRequest) -> Result<Form, TransportError> {
    let AskRequest { question, file } = request;
    // An undeclared or unparsable media type is sent as opaque bytes.
    let media_type = if file
        .media_type
        .parse::<mime_guess::Mime>()
        .is_ok()
    {
        file.media_type
    } else {
        FALLBACK_MEDIA_TYPE.to_string()
    };
    let file_part = Part::bytes(file.content)
        .file_name(file.filename)
        .mime_str(&media_type)?;

    Ok(Form::new()
        .text(QUESTION_FIELD, question)
        .part(FILE_FIELD, file_part))
}

#[async_trait]
impl AskTransport for HttpAskTransport {
    async fn ask(&self, request: AskRequest) -> Result<AskReply, TransportError> {
        let mut builder = self.http.post(&self.endpoint).multipart(build_form(request)?);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(status, body_len = body.len(), endpoint = %self.endpoint, "ask response received");

        Ok(AskReply::new(status, body.to_vec()))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
