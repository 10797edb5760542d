//! Types for MusicStream API requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to a MusicStream API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "https://music.example.com")
    pub url: String,
    /// Bearer token sent with every request (if authenticated)
    pub access_token: Option<String>,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::new(url)
        }
    }

    /// Override the transport timeouts.
    #[must_use]
    pub fn timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self
    }
}

/// Health response from `GET /api/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthStatus {
    pub message: String,
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Collection body: either a bare array or the wrapped form
/// `{"music": [...], "count": n}` used by the document-store backend.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CollectionBody<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "music", alias = "playlists")]
        items: Vec<T>,
    },
}

impl<T> CollectionBody<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
        }
    }
}

/// Request body for playlist create and rename.
#[derive(Debug, Serialize)]
pub(crate) struct PlaylistBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Error body returned by the API. FastAPI sends `detail`, other handlers
/// send `error` and/or `message`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    pub detail: Option<serde_json::Value>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiError {
    /// Best human-readable message from an error body, falling back to the
    /// raw text.
    pub(crate) fn message_from(body: &str) -> String {
        match serde_json::from_str::<ApiError>(body) {
            Ok(api) => api
                .message
                .or(api.error)
                .or_else(|| {
                    api.detail.map(|d| match d {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                })
                .unwrap_or_else(|| body.to_string()),
            Err(_) => body.to_string(),
        }
    }
}
