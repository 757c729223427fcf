use crate::{
    array::ArrayApi,
    errors::{ChatError, ChatResult},
    secret::{SecretStore, API_KEY_SECRET},
    types::{Conversation, Message, MessageRole},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant for The Array knowledge system.";

const MAX_TOKENS: u32 = 4096;
const CONTEXT_SESSION_LIMIT: usize = 3;
const CONTEXT_MESSAGES_PER_SESSION: usize = 3;
const CONTEXT_SNIPPET_CHARS: usize = 200;

/// Seam between the conversation layer and a concrete chat backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one user message with the prior history and return the
    /// assistant's completion text.
    async fn send_message(&self, user_message: &str, history: &[Message]) -> ChatResult<String>;
}

/// Client for the chat-completion API.
///
/// Stateless aside from the held secret store; safe for concurrent
/// invocation. Callers are expected to serialize calls per conversation to
/// avoid interleaved history.
pub struct ChatClient {
    base_url: String,
    api_version: String,
    model: String,
    client: Client,
    secrets: Arc<dyn SecretStore>,
    array: Arc<dyn ArrayApi>,
}

#[derive(Clone, Default)]
pub struct ChatClientOptions {
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub model: Option<String>,
    pub client: Option<Client>,
}

impl ChatClient {
    #[must_use]
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        array: Arc<dyn ArrayApi>,
        mut options: ChatClientOptions,
    ) -> Self {
        let base_url = options
            .base_url
            .take()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let api_version = options
            .api_version
            .take()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let model = options
            .model
            .take()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = options.client.take().unwrap_or_default();

        Self {
            base_url,
            api_version,
            model,
            client,
            secrets,
            array,
        }
    }

    pub async fn has_api_key(&self) -> bool {
        self.secrets
            .get(API_KEY_SECRET)
            .await
            .is_some_and(|key| !key.is_empty())
    }

    pub async fn save_api_key(&self, key: String) {
        self.secrets.set(API_KEY_SECRET, key).await;
    }

    pub async fn api_key(&self) -> Option<String> {
        self.secrets.get(API_KEY_SECRET).await
    }

    pub async fn remove_api_key(&self) {
        self.secrets.delete(API_KEY_SECRET).await;
    }

    /// Send one user message, overriding the system prompt and model.
    ///
    /// Fails with `NoApiKey` before any network I/O when no secret is
    /// stored. The recent-sessions context fetch is best-effort: a dead
    /// Array degrades to an empty context block instead of failing the
    /// whole call.
    pub async fn send_message_with(
        &self,
        user_message: &str,
        history: &[Message],
        system_prompt: &str,
        model: &str,
    ) -> ChatResult<String> {
        let Some(api_key) = self
            .secrets
            .get(API_KEY_SECRET)
            .await
            .filter(|key| !key.is_empty())
        else {
            return Err(ChatError::NoApiKey);
        };

        let sessions = match self.array.get_recent_sessions(CONTEXT_SESSION_LIMIT).await {
            Ok(sessions) => sessions,
            Err(error) => {
                tracing::warn!(%error, "failed to fetch recent sessions for context");
                Vec::new()
            }
        };

        let system = format!("{system_prompt}\n\n{}", build_context_prompt(&sessions));
        let payload = build_request(model, &system, history, user_message);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                return Err(ChatError::Api(envelope.error.message));
            }
            return Err(ChatError::Http(status));
        }

        let completion: CompletionResponse =
            serde_json::from_str(&body).map_err(ChatError::Decoding)?;
        tracing::debug!(completion_id = %completion.id, "chat completion received");

        completion
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or(ChatError::EmptyResponse)
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn send_message(&self, user_message: &str, history: &[Message]) -> ChatResult<String> {
        self.send_message_with(user_message, history, DEFAULT_SYSTEM_PROMPT, &self.model)
            .await
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    id: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    block_type: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Build the outgoing message list: history minus `system`-role entries
/// (those travel in the system prompt), with the new user message last.
fn build_request(
    model: &str,
    system: &str,
    history: &[Message],
    user_message: &str,
) -> CompletionRequest {
    let mut messages: Vec<ApiMessage> = history
        .iter()
        .filter(|message| message.role != MessageRole::System)
        .map(|message| ApiMessage {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        })
        .collect();
    messages.push(ApiMessage {
        role: "user".to_string(),
        content: user_message.to_string(),
    });

    CompletionRequest {
        model: model.to_string(),
        max_tokens: MAX_TOKENS,
        system: system.to_string(),
        messages,
    }
}

/// Render recent sessions as a context block: a header line, then per
/// session a separator with title and creation time followed by its last
/// messages, each truncated. Empty input yields an empty block.
fn build_context_prompt(sessions: &[Conversation]) -> String {
    if sessions.is_empty() {
        return String::new();
    }

    let mut context = String::from("## CONTEXT FROM RECENT SESSIONS\n");
    for session in sessions.iter().take(CONTEXT_SESSION_LIMIT) {
        context.push_str(&format!(
            "\n--- Session: {} ({}) ---\n",
            session.title,
            session.created_at.format("%Y-%m-%d %H:%M")
        ));
        let start = session
            .messages
            .len()
            .saturating_sub(CONTEXT_MESSAGES_PER_SESSION);
        for message in &session.messages[start..] {
            let snippet: String = message.content.chars().take(CONTEXT_SNIPPET_CHARS).collect();
            context.push_str(&format!(
                "{}: {}...\n",
                message.role.as_str().to_uppercase(),
                snippet
            ));
        }
    }
    context
}
