use anyhow::{anyhow, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use shared::protocol::GoogleErrorEnvelope;
use url::Url;

/// Per-request credentials for the Google REST endpoints.
#[derive(Clone)]
pub struct GoogleCredentials {
    pub api_key: String,
    pub access_token: Option<String>,
}

impl GoogleCredentials {
    pub fn new(api_key: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            access_token,
        }
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("key", self.api_key.as_str())]);
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("api_key", &"<redacted>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub fn build_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("rater/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")
}

pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid API base url '{base}'"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("API base url '{base}' cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Passes 2xx responses through and turns anything else into an error carrying
/// Google's error message when the body has one.
pub(crate) async fn check_status(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<GoogleErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body,
    };
    Err(anyhow!("{operation} failed with HTTP {status}: {detail}"))
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
