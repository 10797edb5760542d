//! Main MusicStream API client.

use crate::error::{ClientError, Result};
use crate::types::{ApiError, ClientConfig, HealthStatus};
use musicstream_core::{EntityKind, StoreError};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the MusicStream REST API.
///
/// Holds the transport and the bearer token. It keeps no entity state: every
/// call is a single request/response and nothing is retried.
///
/// # Example
///
/// ```ignore
/// use musicstream_client::{ClientConfig, MusicStreamClient};
/// use musicstream_core::{EntityKind, RemoteStore};
///
/// let client = MusicStreamClient::new(ClientConfig::with_token("https://music.example.com", "token"))?;
/// let health = client.ping().await?;
/// let tracks = client.fetch_collection(EntityKind::Track).await?;
/// println!("{} tracks ({})", tracks.len(), health.status);
/// ```
pub struct MusicStreamClient {
    http: Client,
    base: Url,
    base_url: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl MusicStreamClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base = Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("MusicStream/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            base_url,
            access_token: Arc::new(RwLock::new(config.access_token)),
        })
    }

    /// Get the normalized base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    /// Set the bearer token (e.g., from stored credentials).
    pub async fn set_token(&self, access_token: impl Into<String>) {
        *self.access_token.write().await = Some(access_token.into());
    }

    /// Clear the stored token.
    pub async fn clear_token(&self) {
        *self.access_token.write().await = None;
        info!("Cleared access token");
    }

    /// Resolve a media reference (audio or cover) to an absolute URL.
    ///
    /// Absolute `http(s)` references are returned unchanged; relative ones
    /// are joined onto the backend base URL.
    pub fn media_url(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}/{}", self.base_url, reference.trim_start_matches('/'))
        }
    }

    /// Check that the API is reachable. Does not require authentication.
    pub async fn ping(&self) -> std::result::Result<HealthStatus, StoreError> {
        let url = self.endpoint(&["api", ""])?;
        debug!(url = %url, "Pinging API");

        let response = self
            .send(self.http.get(url), &[])
            .await?;
        let health: HealthStatus = decode(response, "health").await?;

        info!(status = %health.status, message = %health.message, "API reachable");
        Ok(health)
    }

    /// Build an absolute URL from path segments. Segments are percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::validation(format!("Cannot append path to {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Attach credentials, send, and turn non-success statuses into
    /// `StoreError`s.
    ///
    /// `targets` lists the entities a 404 can refer to, subject first. With
    /// no targets a 404 means a missing route and is a server fault.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        targets: &[(EntityKind, &str)],
    ) -> std::result::Result<Response, StoreError> {
        let request = match self.access_token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = status_error(status, &body, targets);
        warn!(status = %status, error = %err, "Request failed");
        Err(err)
    }
}

/// Decode a JSON body; a malformed body is a server fault.
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> std::result::Result<T, StoreError> {
    response
        .json()
        .await
        .map_err(|e| StoreError::server_fault(format!("Failed to parse {} response: {}", what, e)))
}

/// Map a transport-level failure.
pub(crate) fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        StoreError::network(e.to_string())
    } else {
        StoreError::server_fault(e.to_string())
    }
}

/// Map a non-success HTTP status.
pub(crate) fn status_error(
    status: StatusCode,
    body: &str,
    targets: &[(EntityKind, &str)],
) -> StoreError {
    let message = ApiError::message_from(body);
    match status.as_u16() {
        400 | 422 => StoreError::validation(message),
        401 | 403 => StoreError::unauthorized(message),
        404 => match not_found_target(&message, targets) {
            Some((kind, id)) => StoreError::not_found(kind, id),
            None => StoreError::server_fault(format!("{}: {}", status, message)),
        },
        _ => StoreError::server_fault(format!("{}: {}", status, message)),
    }
}

/// Pick the entity a 404 refers to. The subject is the default; a nested
/// target wins when the error message names its kind.
fn not_found_target<'a>(
    message: &str,
    targets: &[(EntityKind, &'a str)],
) -> Option<(EntityKind, &'a str)> {
    let message = message.to_lowercase();
    targets
        .iter()
        .skip(1)
        .find(|(kind, _)| names_kind(&message, *kind))
        .or_else(|| targets.first())
        .copied()
}

fn names_kind(message: &str, kind: EntityKind) -> bool {
    match kind {
        EntityKind::Track => ["track", "music", "song"]
            .iter()
            .any(|word| message.contains(word)),
        EntityKind::Playlist => message.contains("playlist"),
        EntityKind::FavoriteSet => message.contains("favorite"),
    }
}
