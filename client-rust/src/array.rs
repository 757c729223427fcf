use crate::{
    client_utils,
    errors::ArrayResult,
    types::{ArrayStatus, Conversation, IngestRequest, IngestResponse, QueueResponse},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://array.baldlygo.uk";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The subset of the Array API that the capture and conversation layers
/// depend on. Consumers hold `Arc<dyn ArrayApi>` so tests can substitute a
/// mock without a live backend.
#[async_trait]
pub trait ArrayApi: Send + Sync {
    /// Archive one artifact in the Array inbox. Issues exactly one POST;
    /// the `success` flag in the response is the Array's verdict and is
    /// reported independently of the HTTP status code.
    async fn ingest(&self, request: &IngestRequest) -> ArrayResult<IngestResponse>;

    /// Recent conversations, most-recent-first as returned by the server.
    /// The client performs no re-sorting.
    async fn get_recent_sessions(&self, limit: usize) -> ArrayResult<Vec<Conversation>>;

    /// Archive a simple text note.
    async fn save_note(
        &self,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> ArrayResult<IngestResponse> {
        let request = IngestRequest::new("note", title).content(content).tags(tags);
        self.ingest(&request).await
    }

    /// Archive a conversation as a session trace.
    async fn save_conversation(&self, conversation: &Conversation) -> ArrayResult<IngestResponse> {
        let request = IngestRequest::new(
            "session_trace",
            format!("Beacon Conversation - {}", conversation.title),
        )
        .content(render_transcript(conversation))
        .tags(vec![
            "beacon".to_string(),
            "conversation".to_string(),
            "trace".to_string(),
        ]);
        self.ingest(&request).await
    }
}

/// Client for the Array HTTP API.
///
/// Holds no mutable cross-call state beyond the transport configuration;
/// all operations are safe to call concurrently.
pub struct ArrayClient {
    base_url: String,
    client: Client,
}

#[derive(Clone, Default)]
pub struct ArrayClientOptions {
    pub base_url: Option<String>,
    pub client: Option<Client>,
}

impl ArrayClient {
    #[must_use]
    pub fn new(mut options: ArrayClientOptions) -> Self {
        let base_url = options
            .base_url
            .take()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = match options.client.take() {
            Some(client) => client,
            None => Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        };

        Self { base_url, client }
    }

    /// Check whether the Array is online and fetch its status snapshot.
    pub async fn get_status(&self) -> ArrayResult<ArrayStatus> {
        client_utils::get_json(&self.client, &format!("{}/api/v1/status", self.base_url)).await
    }

    /// List the inbox queue.
    pub async fn get_queue(&self) -> ArrayResult<QueueResponse> {
        client_utils::get_json(
            &self.client,
            &format!("{}/api/v1/ingest/queue", self.base_url),
        )
        .await
    }

    /// Check ingest endpoint health. Deliberately lenient: `true` only when
    /// the body decodes and carries `status == "ok"`; transport failures,
    /// non-2xx responses and undecodable bodies all read as unhealthy
    /// rather than raising.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/v1/ingest/health", self.base_url);
        let Ok(response) = self.client.get(&url).send().await else {
            return false;
        };
        if !response.status().is_success() {
            return false;
        }
        let Ok(body) = response.text().await else {
            return false;
        };

        serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("status")
                    .and_then(Value::as_str)
                    .map(|status| status == "ok")
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl ArrayApi for ArrayClient {
    async fn ingest(&self, request: &IngestRequest) -> ArrayResult<IngestResponse> {
        tracing::debug!(
            source_type = %request.source_type,
            title = %request.title,
            "ingesting artifact"
        );
        client_utils::post_json(
            &self.client,
            &format!("{}/api/v1/ingest", self.base_url),
            request,
        )
        .await
    }

    async fn get_recent_sessions(&self, limit: usize) -> ArrayResult<Vec<Conversation>> {
        client_utils::get_json(
            &self.client,
            &format!("{}/api/v1/sessions/recent?limit={limit}", self.base_url),
        )
        .await
    }
}

/// Render a conversation as a markdown transcript:
/// `**Role**: content` per message, joined by blank lines.
pub(crate) fn render_transcript(conversation: &Conversation) -> String {
    conversation
        .messages
        .iter()
        .map(|message| format!("**{}**: {}", message.role.display_name(), message.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
