#![allow(dead_code)]

use async_trait::async_trait;
use beacon_app::{AudioRecorder, BoxedError, RecognizerAuthorization, SpeechRecognizer};
use beacon_client::{
    ArrayApi, ArrayError, ArrayResult, ChatError, ChatModel, ChatResult, Conversation,
    IngestRequest, IngestResponse, Message, StatusCode,
};
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

pub fn ok_ingest_response() -> IngestResponse {
    IngestResponse {
        success: true,
        message: "queued".to_string(),
        file_path: Some("inbox/item.md".to_string()),
        item_id: Some("item-1".to_string()),
    }
}

/// Records every ingest request; optionally fails ingests or session
/// listings with an HTTP 500.
pub struct MockArray {
    pub ingests: Mutex<Vec<IngestRequest>>,
    pub sessions: Vec<Conversation>,
    pub fail_ingest: bool,
    pub fail_sessions: bool,
}

impl MockArray {
    pub fn new() -> Self {
        Self {
            ingests: Mutex::new(Vec::new()),
            sessions: Vec::new(),
            fail_ingest: false,
            fail_sessions: false,
        }
    }

    pub fn failing_ingest() -> Self {
        Self {
            fail_ingest: true,
            ..Self::new()
        }
    }

    pub fn recorded_ingests(&self) -> Vec<IngestRequest> {
        self.ingests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArrayApi for MockArray {
    async fn ingest(&self, request: &IngestRequest) -> ArrayResult<IngestResponse> {
        self.ingests.lock().unwrap().push(request.clone());
        if self.fail_ingest {
            return Err(ArrayError::Http(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(ok_ingest_response())
    }

    async fn get_recent_sessions(&self, _limit: usize) -> ArrayResult<Vec<Conversation>> {
        if self.fail_sessions {
            return Err(ArrayError::Http(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(self.sessions.clone())
    }
}

/// Replays queued completions and records every call's user message and
/// history.
pub struct MockChatModel {
    replies: Mutex<VecDeque<ChatResult<String>>>,
    pub calls: Mutex<Vec<(String, Vec<Message>)>>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn enqueue(&self, reply: ChatResult<String>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn recorded_calls(&self) -> Vec<(String, Vec<Message>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn send_message(&self, user_message: &str, history: &[Message]) -> ChatResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((user_message.to_string(), history.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ChatError::EmptyResponse))
    }
}

/// Writes an empty file on start so temp-file lifecycle is observable.
pub struct StubRecorder {
    pub fail_start: bool,
    pub starts: Arc<Mutex<Vec<PathBuf>>>,
    pub stops: Arc<Mutex<usize>>,
}

impl StubRecorder {
    pub fn new() -> Self {
        Self {
            fail_start: false,
            starts: Arc::new(Mutex::new(Vec::new())),
            stops: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl AudioRecorder for StubRecorder {
    async fn start(&self, path: &Path) -> Result<(), BoxedError> {
        if self.fail_start {
            return Err("audio session unavailable".into());
        }
        std::fs::write(path, b"")?;
        self.starts.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn stop(&self) {
        *self.stops.lock().unwrap() += 1;
    }
}

pub struct StubRecognizer {
    pub available: bool,
    pub authorized: bool,
    pub transcript: Result<String, String>,
}

impl StubRecognizer {
    pub fn returning(transcript: &str) -> Self {
        Self {
            available: true,
            authorized: true,
            transcript: Ok(transcript.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::returning("")
        }
    }

    pub fn denied() -> Self {
        Self {
            authorized: false,
            ..Self::returning("")
        }
    }
}

#[async_trait]
impl SpeechRecognizer for StubRecognizer {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_authorization(&self) -> RecognizerAuthorization {
        if self.authorized {
            RecognizerAuthorization::Authorized
        } else {
            RecognizerAuthorization::Denied
        }
    }

    async fn transcribe(&self, _path: &Path) -> Result<String, BoxedError> {
        match &self.transcript {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(message.clone().into()),
        }
    }
}
