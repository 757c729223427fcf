use beacon_client::ArrayError;
use thiserror::Error;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from the voice capture pipeline.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No recording found")]
    NoRecording,
    #[error("Speech recognition is not available")]
    RecognizerUnavailable,
    #[error("Speech recognition not authorized. Please enable it in Settings.")]
    NotAuthorized,
    /// The platform audio subsystem failed to start or run the recording.
    #[error("Audio capture error: {0}")]
    Audio(#[source] BoxedError),
    #[error("Transcription error: {0}")]
    Transcription(#[source] BoxedError),
    #[error(transparent)]
    Array(#[from] ArrayError),
}

/// Errors from the note submission flow.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("A title is required")]
    EmptyTitle,
    #[error("Note content is required")]
    EmptyContent,
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Array(#[from] ArrayError),
}
