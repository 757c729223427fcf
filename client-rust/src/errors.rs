use thiserror::Error;

/// Errors from the Array backend client.
#[derive(Error, Debug)]
pub enum ArrayError {
    /// The request could not be sent or the transport-level exchange failed.
    #[error("Invalid response from The Array: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returned a status code outside [200, 299].
    #[error("HTTP error {0}")]
    Http(reqwest::StatusCode),
    /// The body did not match the expected schema.
    #[error("Failed to decode response: {0}")]
    Decoding(#[source] serde_json::Error),
}

pub type ArrayResult<T> = Result<T, ArrayError>;

/// Errors from the chat-completion client.
#[derive(Error, Debug)]
pub enum ChatError {
    /// No secret is stored under the API key name. Recoverable: the user
    /// adds the key in Settings and retries.
    #[error("Anthropic API key not found. Please add it in Settings.")]
    NoApiKey,
    #[error("Invalid response from server: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response without a parseable error envelope.
    #[error("Chat API error: {0}")]
    Http(reqwest::StatusCode),
    /// Error message extracted from the provider's `{error:{message}}` body.
    #[error("Chat API error: {0}")]
    Api(String),
    #[error("The model returned an empty response")]
    EmptyResponse,
    #[error("Failed to decode chat response: {0}")]
    Decoding(#[source] serde_json::Error),
}

pub type ChatResult<T> = Result<T, ChatError>;
