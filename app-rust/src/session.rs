use beacon_client::{ArrayApi, ChatModel, Conversation, Message, MessageRole};
use std::sync::Arc;
use tokio::sync::watch;

const NEW_CHAT_TITLE: &str = "New Chat";

/// Immutable view of the chat state, published after every mutation. The
/// presentation layer subscribes and re-renders from these snapshots; it
/// never mutates session fields directly.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub conversation: Conversation,
    pub busy: bool,
    pub last_error: Option<String>,
    pub input: String,
}

/// Owns one live conversation at a time and sequences
/// append user message → chat call → append assistant message → archive.
///
/// Single-writer: all mutation goes through `&mut self`, so message appends
/// are strictly ordered within one session. Dependencies are injected at
/// construction; there are no global service accessors.
pub struct ChatSession {
    chat: Arc<dyn ChatModel>,
    archive: Arc<dyn ArrayApi>,
    conversation: Conversation,
    busy: bool,
    last_error: Option<String>,
    input: String,
    updates: watch::Sender<ChatSnapshot>,
}

impl ChatSession {
    #[must_use]
    pub fn new(chat: Arc<dyn ChatModel>, archive: Arc<dyn ArrayApi>) -> Self {
        let conversation = Conversation::new(NEW_CHAT_TITLE);
        let (updates, _) = watch::channel(ChatSnapshot {
            conversation: conversation.clone(),
            busy: false,
            last_error: None,
            input: String::new(),
        });
        Self {
            chat,
            archive,
            conversation,
            busy: false,
            last_error: None,
            input: String::new(),
            updates,
        }
    }

    /// Subscribe to state snapshots. The receiver always holds the latest.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            conversation: self.conversation.clone(),
            busy: self.busy,
            last_error: self.last_error.clone(),
            input: self.input.clone(),
        }
    }

    /// Replace the pending input buffer.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.publish();
    }

    /// Send the pending input as a user message. No-op when the trimmed
    /// input is empty: no message is appended and busy is never set.
    pub async fn send_message(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        self.conversation
            .add_message(Message::new(MessageRole::User, input.clone()));
        // Clear input immediately so the composer is ready for the next turn.
        self.input.clear();
        self.busy = true;
        self.last_error = None;
        self.publish();

        // The new user message travels as `user_message`; the history is
        // everything before it.
        let history_end = self.conversation.messages.len() - 1;
        match self
            .chat
            .send_message(&input, &self.conversation.messages[..history_end])
            .await
        {
            Ok(reply) => {
                self.conversation
                    .add_message(Message::new(MessageRole::Assistant, reply));
                // The reply is already visible; an archive failure is logged
                // rather than shown as a send failure.
                if let Err(error) = self.archive.save_conversation(&self.conversation).await {
                    tracing::warn!(%error, "failed to archive conversation");
                }
            }
            Err(error) => {
                self.last_error = Some(error.to_string());
            }
        }

        self.busy = false;
        self.publish();
    }

    /// Replace the conversation wholesale with a fresh empty one. The
    /// discarded conversation is not archived.
    pub fn clear_chat(&mut self) {
        self.conversation = Conversation::new(NEW_CHAT_TITLE);
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}
