mod capture;
mod errors;
mod notes;
mod session;

pub use capture::{
    recognition_channel, AudioRecorder, CaptureState, RecognitionSink, RecognizerAuthorization,
    SpeechRecognizer, VoiceCapture,
};
pub use errors::{BoxedError, CaptureError, NoteError};
pub use notes::{NoteDraft, NoteMode, NoteSubmitter};
pub use session::{ChatSession, ChatSnapshot};
