use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use shared::{error::AskErrorBody, protocol::AskAnswerBody};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

pub mod error;
pub mod transport;
pub mod types;

pub use error::{SubmitError, TransportError};
pub use transport::{AskTransport, HttpAskTransport};
pub use types::{AskReply, AskRequest, SubmissionState, UploadedFile};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    QuestionChanged(String),
    FileChanged {
        filename: Option<String>,
        media_type: Option<String>,
    },
    StateChanged(SubmissionState),
}

/// Request built by [`AskController::begin_submit`], waiting to be sent.
#[derive(Debug)]
pub struct PreparedSubmission {
    attempt: u64,
    request: AskRequest,
}

impl PreparedSubmission {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn request(&self) -> &AskRequest {
        &self.request
    }
}

#[derive(Default)]
struct ControllerState {
    question: String,
    file: Option<UploadedFile>,
    submission: SubmissionState,
}

/// Owns the pending question, the selected file and the submission lifecycle
/// for one session.
///
/// State is kept behind a synchronous lock that is never held across an
/// `.await`, so the `InFlight` transition is visible before the request leaves.
pub struct AskController {
    transport: Arc<dyn AskTransport>,
    inner: Mutex<ControllerState>,
    attempts: AtomicU64,
    events: broadcast::Sender<ControllerEvent>,
}

impl AskController {
    pub fn new(transport: Arc<dyn AskTransport>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            transport,
            inner: Mutex::new(ControllerState::default()),
            attempts: AtomicU64::new(0),
            events,
        })
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Arc<Self> {
        Self::new(Arc::new(HttpAskTransport::new(endpoint)))
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().submission.clone()
    }

    pub fn question(&self) -> String {
        self.lock().question.clone()
    }

    pub fn file_name(&self) -> Option<String> {
        self.lock().file.as_ref().map(|file| file.filename.clone())
    }

    pub fn update_question(&self, text: impl Into<String>) {
        let text = text.into();
        self.lock().question = text.clone();
        debug!(question_len = text.len(), "question updated");
        let _ = self.events.send(ControllerEvent::QuestionChanged(text));
    }

    pub fn update_file(&self, file: Option<UploadedFile>) {
        let event = ControllerEvent::FileChanged {
            filename: file.as_ref().map(|file| file.filename.clone()),
            media_type: file.as_ref().map(|file| file.media_type.clone()),
        };
        if let Some(file) = &file {
            debug!(
                filename = %file.filename,
                media_type = %file.media_type,
                size_bytes = file.size_bytes(),
                "file selected"
            );
        } else {
            debug!("file selection cleared");
        }
        self.lock().file = file;
        let _ = self.events.send(event);
    }

    fn set_state(&self, state: SubmissionState) {
        self.lock().submission = state.clone();
        let _ = self.events.send(ControllerEvent::StateChanged(state));
    }

    /// Validates inputs and moves to `InFlight` without suspending.
    ///
    /// Without a file the state becomes `Failed` and that state is returned
    /// as the error; no request is prepared.
    pub fn begin_submit(&self) -> Result<PreparedSubmission, SubmissionState> {
        let request = {
            let guard = self.lock();
            guard.file.clone().map(|file| AskRequest {
                question: guard.question.clone(),
                file,
            })
        };

        let Some(request) = request else {
            let err = SubmitError::MissingFile;
            warn!(category = err.category(), "submit rejected: {err}");
            let failed = SubmissionState::Failed(err.user_message());
            self.set_state(failed.clone());
            return Err(failed);
        };

        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        self.set_state(SubmissionState::InFlight);
        info!(
            attempt,
            question_len = request.question.len(),
            filename = %request.file.filename,
            size_bytes = request.file.size_bytes(),
            "submitting question"
        );
        Ok(PreparedSubmission { attempt, request })
    }

    /// Sends a prepared request and records the terminal outcome.
    ///
    /// Overlapping submissions are not sequenced: whichever resolves last
    /// owns the final state.
    pub async fn complete_submit(&self, prepared: PreparedSubmission) -> SubmissionState {
        let PreparedSubmission { attempt, request } = prepared;
        let outcome = match self.transport.ask(request).await {
            Ok(reply) => interpret_reply(reply),
            Err(err) => Err(SubmitError::from(err)),
        };

        let state = match outcome {
            Ok(answer) => {
                info!(attempt, answer_len = answer.len(), "answer received");
                SubmissionState::Succeeded(answer)
            }
            Err(err) => {
                warn!(attempt, category = err.category(), "submit failed: {err}");
                SubmissionState::Failed(err.user_message())
            }
        };
        self.set_state(state.clone());
        state
    }

    /// Runs a full submit cycle and returns the terminal state it produced.
    pub async fn submit(&self) -> SubmissionState {
        match self.begin_submit() {
            Ok(prepared) => self.complete_submit(prepared).await,
            Err(failed) => failed,
        }
    }

    /// Enters `InFlight` on the caller's thread, then resolves on the runtime.
    pub fn submit_in_background(self: &Arc<Self>) -> JoinHandle<SubmissionState> {
        let prepared = self.begin_submit();
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            match prepared {
                Ok(prepared) => controller.complete_submit(prepared).await,
                Err(failed) => failed,
            }
        })
    }
}

/// Maps a raw reply to the answer text or the failure it represents.
pub fn interpret_reply(reply: AskReply) -> Result<String, SubmitError> {
    if reply.is_success() {
        let body: AskAnswerBody = serde_json::from_slice(&reply.body)
            .map_err(|err| SubmitError::Protocol(err.to_string()))?;
        Ok(body.answer)
    } else {
        let body: AskErrorBody = serde_json::from_slice(&reply.body)
            .map_err(|err| SubmitError::Protocol(err.to_string()))?;
        Err(SubmitError::Remote {
            status: reply.status,
            message: body.message().map(str::to_string),
        })
    }
}

#[cfg(test)]
#[path = "tests/mock_service.rs"]
mod mock_service;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
