use crate::errors::{ArrayError, ArrayResult};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

/// Issue a GET and decode the JSON response.
/// Fails on non-2xx status codes and on bodies that miss the schema.
pub(crate) async fn get_json<R: DeserializeOwned>(client: &Client, url: &str) -> ArrayResult<R> {
    let response = client.get(url).send().await?;
    decode_response(response).await
}

/// Issue a POST with a JSON body and decode the JSON response.
/// Fails on non-2xx status codes and on bodies that miss the schema.
pub(crate) async fn post_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
) -> ArrayResult<R> {
    let response = client.post(url).json(data).send().await?;
    decode_response(response).await
}

async fn decode_response<R: DeserializeOwned>(response: reqwest::Response) -> ArrayResult<R> {
    let status = response.status();
    if !status.is_success() {
        return Err(ArrayError::Http(status));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(ArrayError::Decoding)
}
