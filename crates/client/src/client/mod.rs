//! HTTP client for the Okta management API.

mod auth;
pub mod conversions;
pub mod groups;
pub mod health;
pub mod logs;
pub mod users;

pub use auth::{parse_private_key, sign_assertion, AssertionClaims};

use jsonwebtoken::EncodingKey;
use reqwest::header::{HeaderMap, ACCEPT, LINK};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

use crate::config::OktaConfig;
use crate::error::{ClientError, Result};
use conversions::OktaErrorBody;

/// Page size requested from list endpoints.
const PAGE_SIZE: &str = "200";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one Okta organisation.
///
/// The access token is requested lazily on the first call and reused for
/// the lifetime of the client.
pub struct OktaClient {
    client: reqwest::Client,
    base_url: Url,
    config: OktaConfig,
    key: EncodingKey,
    token: OnceCell<String>,
}

impl std::fmt::Debug for OktaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OktaClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.config.client_id)
            .finish_non_exhaustive()
    }
}

impl OktaClient {
    /// Create a client from validated configuration.
    pub fn new(config: OktaConfig) -> Result<Self> {
        let base_url = Url::parse(&config.org_url)
            .map_err(|e| ClientError::Config(format!("Invalid organisation URL: {}", e)))?;
        let key = parse_private_key(&config.private_key_pem)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("oktactl/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            config,
            key,
            token: OnceCell::new(),
        })
    }

    /// Get the organisation URL.
    pub fn org_url(&self) -> &str {
        &self.config.org_url
    }

    /// Build a URL for a fixed path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.org_url, path)
    }

    /// Build a URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(format!("Organisation URL cannot be a base: {}", self.base_url))
            })?
            .clear()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Result<reqwest::RequestBuilder> {
        let token = self.access_token().await?;
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.request(Method::GET, url).await?.send().await?;
        self.handle_response(response).await
    }

    /// GET that maps 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let response = self.request(Method::GET, url).await?.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// GET every page of a list endpoint by following `Link: rel="next"`.
    async fn get_paginated<T: DeserializeOwned>(&self, mut url: Url) -> Result<Vec<T>> {
        if !url.query_pairs().any(|(key, _)| key == "limit") {
            url.query_pairs_mut().append_pair("limit", PAGE_SIZE);
        }

        let mut items = Vec::new();
        loop {
            let response = self.request(Method::GET, url.clone()).await?.send().await?;
            let next = next_link(response.headers());
            let page: Vec<T> = self.handle_response(response).await?;
            tracing::debug!(url = %url, count = page.len(), "Fetched page");

            let empty = page.is_empty();
            items.extend(page);

            match next {
                Some(next) if !empty => {
                    let next = Url::parse(&next).map_err(|e| {
                        ClientError::InvalidResponse(format!("Invalid next link '{}': {}", next, e))
                    })?;
                    if next.origin() != self.base_url.origin() {
                        return Err(ClientError::InvalidResponse(format!(
                            "Next link points outside the organisation: {}",
                            next
                        )));
                    }
                    if next == url {
                        break;
                    }
                    url = next;
                }
                _ => break,
            }
        }
        Ok(items)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, url).await?.json(body).send().await?;
        self.handle_response(response).await
    }

    /// Send a request whose response body is ignored.
    async fn send_empty(&self, method: Method, url: Url) -> Result<()> {
        let response = self.request(method, url).await?.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    /// Handle error responses.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))
        } else {
            Err(error_from(response).await)
        }
    }
}

async fn error_from(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ClientError::ServerError {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}

/// Best effort message for a failed call: Okta's error summary, then the raw
/// body, then the status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<OktaErrorBody>(body)
        .ok()
        .and_then(|error| error.message())
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string())
}

fn next_link(headers: &HeaderMap) -> Option<String> {
    parse_next_link(headers.get_all(LINK).iter().filter_map(|v| v.to_str().ok()))
}

/// Extract the `rel="next"` target from one or more `Link` header values.
pub fn parse_next_link<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .find_map(|link| {
            let mut parts = link.split(';');
            let target = parts.next()?.trim();
            let is_next = parts.any(|param| match param.split_once('=') {
                Some((key, value)) => {
                    key.trim() == "rel"
                        && value
                            .trim()
                            .trim_matches('"')
                            .split_whitespace()
                            .any(|rel| rel == "next")
                }
                None => false,
            });
            let target = target.strip_prefix('<')?.strip_suffix('>')?;
            is_next.then(|| target.to_string())
        })
}
