//! HTTP client for the storefront REST API.
//!
//! Wraps `reqwest` with base-URL handling, optional bearer auth, retry on
//! transient failures and typed decoding of the `{success, message, data,
//! meta}` envelope every endpoint answers with. API-level failures surface
//! as [`ClientError::Api`].

use std::time::Duration;

use booth_core::{AppConfig, PageMeta};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;

const DEFAULT_USER_AGENT: &str = "booth/0.1 (storefront)";
const DEFAULT_PAGE_SIZE: u32 = 15;

/// Response envelope shared by every storefront endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Client for the storefront REST API.
///
/// Use [`StorefrontClient::from_config`] in the binary or
/// [`StorefrontClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: Url,
    asset_url: Url,
    api_token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
    page_size: u32,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.base_url.as_str())
            .field("asset_url", &self.asset_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

fn normalise_base(raw: &str) -> Result<Url, ClientError> {
    // Exactly one trailing slash, so path segments append below the base path.
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: "URL cannot be a base".to_owned(),
        });
    }
    Ok(url)
}

fn build_http(timeout_secs: u64, user_agent: &str) -> Result<Client, ClientError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

impl StorefrontClient {
    /// Creates a client from application config: base and asset URLs,
    /// timeout, user agent, token, retry policy and page size.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if either
    /// URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_http(config.request_timeout_secs, &config.user_agent)?,
            base_url: normalise_base(&config.api_url)?,
            asset_url: normalise_base(&config.asset_url)?,
            api_token: config.api_token.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            page_size: config.page_size,
        })
    }

    /// Creates a client with a custom base URL and no retries (for testing
    /// with wiremock). Static assets are served from the same base.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::from_config`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let base = normalise_base(base_url)?;
        Ok(Self {
            client: build_http(timeout_secs, DEFAULT_USER_AGENT)?,
            asset_url: base.clone(),
            base_url: base,
            api_token: None,
            max_retries: 0,
            backoff_base_ms: 0,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// # Errors
    ///
    /// [`ClientError::InvalidBaseUrl`] if `asset_url` does not parse.
    pub fn with_asset_url(mut self, asset_url: &str) -> Result<Self, ClientError> {
        self.asset_url = normalise_base(asset_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token;
        self
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// API URL for the given path segments; each segment is percent-encoded.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        join_segments(&self.base_url, segments)
    }

    /// Static asset URL for the given path segments.
    pub(crate) fn asset_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        join_segments(&self.asset_url, segments)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET `url` with `query`, retrying transient failures, and parse the
    /// body as JSON.
    pub(crate) async fn get_json(
        &self,
        url: &Url,
        query: &[(String, String)],
    ) -> Result<Value, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let request = self.authorize(self.client.get(url.clone()).query(query));
            tracing::debug!(%url, "storefront GET");
            read_json(request, url.to_string())
        })
        .await
    }

    /// POST `body` as JSON with extra `headers`, retrying transient
    /// failures with the same headers each time.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<Value, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let mut request = self.client.post(url.clone()).json(body);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }
            tracing::debug!(%url, "storefront POST");
            read_json(self.authorize(request), url.to_string())
        })
        .await
    }

    /// Check the envelope and decode it with `data` as `T`.
    pub(crate) fn decode<T: DeserializeOwned>(
        body: Value,
        context: &str,
    ) -> Result<Envelope<T>, ClientError> {
        check_api_error(&body)?;
        serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidBaseUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request and map its status onto [`ClientError`], parsing a 2xx
/// body as JSON.
async fn read_json(request: RequestBuilder, url: String) -> Result<Value, ClientError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound { url });
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        return Err(ClientError::RateLimited { retry_after_secs });
    }

    let text = response.text().await?;
    if status.is_success() {
        return serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: url,
            source: e,
        });
    }

    match error_message(&text) {
        Some(message) => Err(ClientError::Api {
            status: status.as_u16(),
            message,
        }),
        None => Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        }),
    }
}

/// The `message` field of a JSON error body, if present and non-empty.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Fails with [`ClientError::Api`] when the envelope reports `"success": false`.
fn check_api_error(body: &Value) -> Result<(), ClientError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();
        return Err(ClientError::Api {
            status: StatusCode::OK.as_u16(),
            message,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
