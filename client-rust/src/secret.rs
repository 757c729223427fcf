use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Name under which the chat-completion API key is stored.
pub const API_KEY_SECRET: &str = "anthropic_api_key";

/// Opaque secure storage for named string secrets, scoped to the app.
///
/// Absence of a secret is a normal, recoverable condition, hence `Option`
/// rather than an error. Implementations must serialize writes so that
/// overlapping saves cannot lose updates; reads observe the latest
/// completed write (last writer wins).
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
    async fn delete(&self, key: &str);
}

/// In-memory secret store. The default store for tests and for platforms
/// without a keychain binding; writes are serialized behind the lock.
#[derive(Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}
