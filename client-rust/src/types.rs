use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of the Array's health and identity, as returned by
/// `GET /api/v1/status`. Fetched on demand and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayStatus {
    pub status: String,
    pub version: String,
    pub hostname: String,
    pub uptime_seconds: f64,
}

/// One artifact to be archived in the Array inbox.
///
/// `source_type` is an open string enum; the values Beacon itself produces
/// are `"note"`, `"voice_note"` and `"session_trace"`, but the Array also
/// accepts `"url"`, `"pdf"` and others from different capture devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub source_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl IngestRequest {
    /// Create a request with the default capture device (`"beacon"`).
    pub fn new(source_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            title: title.into(),
            content: None,
            summary: None,
            source_url: None,
            device: Some("beacon".to_string()),
            tags: None,
        }
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    #[must_use]
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Outcome of an ingest call. `success` is reported by the Array itself and
/// must be checked independently of the HTTP status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub file_path: Option<String>,
    pub item_id: Option<String>,
}

/// A pending or recently archived inbox item. Identity is `file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub file: String,
    pub title: String,
    pub source_type: String,
    /// ISO-8601 capture time, passed through as the server renders it.
    pub captured_at: String,
    pub device: Option<String>,
    pub status: Option<String>,
}

impl QueueItem {
    pub fn id(&self) -> &str {
        &self.file
    }
}

/// Snapshot listing of the inbox queue. No pagination cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueResponse {
    pub count: usize,
    pub items: Vec<QueueItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }

    /// Capitalized form used when rendering a conversation transcript.
    pub(crate) fn display_name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
        }
    }
}

/// A chat message. Immutable once created; ordering is append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An append-only chat conversation. Messages are never reordered or
/// deleted in place; `updated_at` is bumped on every append and never
/// falls below `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message and bump `updated_at`, strictly monotonic even when
    /// two appends land on the same clock tick.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }
}
