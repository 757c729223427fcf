mod array;
mod chat;
mod client_utils;
mod errors;
mod secret;
mod types;

pub use array::{ArrayApi, ArrayClient, ArrayClientOptions};
pub use chat::{ChatClient, ChatClientOptions, ChatModel, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
pub use errors::*;
pub use reqwest::StatusCode;
pub use secret::{MemorySecretStore, SecretStore, API_KEY_SECRET};
pub use types::*;
