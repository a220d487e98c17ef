use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a backend call failed
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status
    #[error("API error {status} from {url}")]
    Http { url: String, status: u16 },

    /// The body was not valid JSON
    #[error("invalid JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Short text suitable for an error banner
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network { .. } => "server unreachable".to_string(),
            ApiError::Http { status, .. } => format!("server error {}", status),
            ApiError::Parse { .. } => "unexpected response from server".to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// JSON access to the match tracker backend
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str) -> Result<Value, ApiError>;
}

/// HTTP client for the match tracker REST API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for `base_url` (no trailing slash)
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API path such as `/api/v1/stats/global`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(&self, method: Method, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);

        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method.clone(), &url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| {
                warn!("{} {} failed: {}", method, url, source);
                ApiError::Network {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} {} returned {}", method, url, status);
            return Err(ApiError::Http {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());

        serde_json::from_slice(&body).map_err(|source| {
            warn!("Invalid JSON from {}: {}", url, source);
            ApiError::Parse { url, source }
        })
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path).await
    }

    async fn post_json(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::POST, path).await
    }
}
