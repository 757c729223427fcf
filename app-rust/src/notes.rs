use crate::{capture::VoiceCapture, errors::NoteError};
use beacon_client::{ArrayApi, IngestResponse};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMode {
    Text,
    Voice,
}

/// User input collected by the note composer.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub mode: NoteMode,
}

/// Sequences "collect input → (optionally transcribe) → ingest" and reports
/// a single terminal outcome per submission.
pub struct NoteSubmitter {
    array: Arc<dyn ArrayApi>,
}

impl NoteSubmitter {
    #[must_use]
    pub fn new(array: Arc<dyn ArrayApi>) -> Self {
        Self { array }
    }

    pub async fn submit(
        &self,
        draft: NoteDraft,
        capture: &mut VoiceCapture,
    ) -> Result<IngestResponse, NoteError> {
        match draft.mode {
            NoteMode::Text => self.submit_text(&draft.title, &draft.content, draft.tags).await,
            NoteMode::Voice => self.submit_voice(capture, &draft.title, draft.tags).await,
        }
    }

    /// Archive a text note. Fails fast on a blank title or content.
    pub async fn submit_text(
        &self,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<IngestResponse, NoteError> {
        if title.trim().is_empty() {
            return Err(NoteError::EmptyTitle);
        }
        if content.trim().is_empty() {
            return Err(NoteError::EmptyContent);
        }
        Ok(self.array.save_note(title, content, tags).await?)
    }

    /// Drive the voice pipeline through transcription and submission.
    /// Fails fast on a blank title before touching the recording.
    pub async fn submit_voice(
        &self,
        capture: &mut VoiceCapture,
        title: &str,
        tags: Vec<String>,
    ) -> Result<IngestResponse, NoteError> {
        if title.trim().is_empty() {
            return Err(NoteError::EmptyTitle);
        }
        Ok(capture.submit_audio_note(title, tags).await?)
    }
}
