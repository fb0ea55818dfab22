use crate::LanguageModelError;
use reqwest::{header::HeaderMap, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

// Provider error bodies can be large HTML pages.
const MAX_ERROR_BODY_CHARS: usize = 2048;

/// POST `body` as JSON and decode a JSON reply. Any non-success status is
/// returned as [`LanguageModelError::StatusCode`] with the (truncated) body.
pub async fn post_json<B, R>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    body: &B,
) -> Result<R, LanguageModelError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client.post(url).headers(headers).json(body).send().await?;
    let status = response.status();
    debug!(%url, %status, "provider replied");

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(LanguageModelError::StatusCode(
            status,
            text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        ));
    }
    Ok(response.json::<R>().await?)
}
