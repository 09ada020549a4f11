//! RestClient - authenticated JSON client for the booking API.

use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error_detail::extract_detail;
use crate::ports::ApiError;

/// Connection settings for the REST client.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// API root, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub timeout: Duration,
    token: Secret<String>,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, token: Secret<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(15),
            token,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Thin wrapper over `reqwest::Client` that adds the bearer token, joins
/// paths onto the API root and maps failures to `ApiError`.
///
/// Implements every REST port; see the sibling modules.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    config: RestConfig,
}

impl RestClient {
    pub fn new(config: RestConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(self.config.token.expose_secret())
    }

    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        Self::decode(response).await
    }

    pub(super) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::POST, path).query(query)).await?;
        Self::decode(response).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                ApiError::network(format!("connection failed: {e}"))
            } else {
                ApiError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = map_status(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), error = %err, "API request failed");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::parse(e.to_string()))
    }
}

/// Joins `path` onto `base` with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Maps a non-success status and its body to an `ApiError`.
pub fn map_status(status: u16, body: &str) -> ApiError {
    let detail = extract_detail(body);
    match status {
        401 => ApiError::Unauthorized,
        404 => ApiError::NotFound(detail.unwrap_or_else(|| "Not found".to_string())),
        _ => ApiError::rejected(
            status,
            detail.unwrap_or_else(|| format!("Request failed with status {status}")),
        ),
    }
}
