use crate::errors::{BoxedError, CaptureError};
use beacon_client::{ArrayApi, IngestRequest, IngestResponse};
use chrono::Utc;
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tokio::sync::oneshot;

/// Platform audio recorder contract: capture to a local file. The real
/// implementation configures the audio session for simultaneous
/// playback/record before starting.
#[async_trait::async_trait]
pub trait AudioRecorder: Send + Sync {
    async fn start(&self, path: &Path) -> Result<(), BoxedError>;
    async fn stop(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerAuthorization {
    Authorized,
    Denied,
}

/// Platform speech recognition contract. `transcribe` is single-shot: it
/// suspends until the final transcription result, never surfacing partial
/// results.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool;
    async fn request_authorization(&self) -> RecognizerAuthorization;
    async fn transcribe(&self, path: &Path) -> Result<String, BoxedError>;
}

/// Single-resolution bridge from a callback-style recognizer to the async
/// contract. Platforms may invoke their completion callback more than once
/// (a partial result followed by the final one); only the first `resolve`
/// settles the receiver, later calls are ignored.
pub struct RecognitionSink {
    sender: Mutex<Option<oneshot::Sender<Result<String, BoxedError>>>>,
}

impl RecognitionSink {
    /// Settle the paired receiver. Returns whether this call was the one
    /// that resolved it.
    pub fn resolve(&self, result: Result<String, BoxedError>) -> bool {
        let Some(sender) = self.sender.lock().unwrap().take() else {
            return false;
        };
        sender.send(result).is_ok()
    }
}

/// Create a sink/receiver pair for one recognition attempt.
pub fn recognition_channel() -> (
    Arc<RecognitionSink>,
    oneshot::Receiver<Result<String, BoxedError>>,
) {
    let (sender, receiver) = oneshot::channel();
    (
        Arc::new(RecognitionSink {
            sender: Mutex::new(Some(sender)),
        }),
        receiver,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
    Stopped,
    Transcribing,
    Transcribed,
    Failed,
}

/// Record → transcribe → submit → cleanup pipeline for voice notes.
///
/// One recording/transcription cycle is in flight at a time per instance.
/// The instance owns at most one temporary audio file: starting a new
/// recording deletes any previous uncommitted file first.
pub struct VoiceCapture {
    recorder: Box<dyn AudioRecorder>,
    recognizer: Arc<dyn SpeechRecognizer>,
    array: Arc<dyn ArrayApi>,
    state: CaptureState,
    audio_path: Option<PathBuf>,
    transcript: Option<String>,
}

impl VoiceCapture {
    #[must_use]
    pub fn new(
        recorder: Box<dyn AudioRecorder>,
        recognizer: Arc<dyn SpeechRecognizer>,
        array: Arc<dyn ArrayApi>,
    ) -> Self {
        Self {
            recorder,
            recognizer,
            array,
            state: CaptureState::Idle,
            audio_path: None,
            transcript: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Text of the last successful transcription, for display.
    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    /// Allocate a fresh audio file path and begin capture. On recorder
    /// failure the state stays `Idle` and no path is retained.
    pub async fn start_recording(&mut self) -> Result<(), CaptureError> {
        self.discard_audio_file().await;

        let path = allocate_audio_path();
        self.recorder
            .start(&path)
            .await
            .map_err(CaptureError::Audio)?;

        tracing::debug!(path = %path.display(), "recording started");
        self.audio_path = Some(path);
        self.transcript = None;
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Stop capture. No-op unless currently recording.
    pub async fn stop_recording(&mut self) {
        if self.state != CaptureState::Recording {
            return;
        }
        self.recorder.stop().await;
        self.state = CaptureState::Stopped;
    }

    /// Transcribe the captured recording, returning the final transcript.
    pub async fn transcribe_recording(&mut self) -> Result<String, CaptureError> {
        let Some(path) = self.audio_path.clone() else {
            return Err(CaptureError::NoRecording);
        };
        if !self.recognizer.is_available() {
            return Err(CaptureError::RecognizerUnavailable);
        }
        if self.recognizer.request_authorization().await == RecognizerAuthorization::Denied {
            return Err(CaptureError::NotAuthorized);
        }

        self.state = CaptureState::Transcribing;
        match self.recognizer.transcribe(&path).await {
            Ok(text) => {
                self.transcript = Some(text.clone());
                self.state = CaptureState::Transcribed;
                Ok(text)
            }
            Err(error) => {
                self.state = CaptureState::Failed;
                Err(CaptureError::Transcription(error))
            }
        }
    }

    /// Transcribe and archive the recording as a voice note. On completion
    /// (success or failure) the temporary audio file is deleted best-effort;
    /// deletion problems never surface to the caller.
    pub async fn submit_audio_note(
        &mut self,
        title: &str,
        tags: Vec<String>,
    ) -> Result<IngestResponse, CaptureError> {
        let result = self.transcribe_and_submit(title, tags).await;
        self.discard_audio_file().await;
        result
    }

    async fn transcribe_and_submit(
        &mut self,
        title: &str,
        tags: Vec<String>,
    ) -> Result<IngestResponse, CaptureError> {
        let transcript = self.transcribe_recording().await?;
        let request = IngestRequest::new("voice_note", title)
            .content(transcript)
            .device("beacon-ios")
            .tags(tags);
        Ok(self.array.ingest(&request).await?)
    }

    async fn discard_audio_file(&mut self) {
        if let Some(path) = self.audio_path.take() {
            if let Err(error) = tokio::fs::remove_file(&path).await {
                tracing::debug!(
                    path = %path.display(),
                    %error,
                    "could not remove temporary audio file"
                );
            }
        }
    }
}

/// Unique per attempt so a stale file can never shadow a new recording.
fn allocate_audio_path() -> PathBuf {
    std::env::temp_dir().join(format!("voice_note_{}.m4a", Utc::now().timestamp_micros()))
}
