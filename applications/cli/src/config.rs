//! CLI configuration
//!
//! Sources, later ones winning: built-in defaults, a TOML file
//! (`musicstream.toml` in the working directory, or `--config`), then
//! `MUSICSTREAM_*` environment variables with `__` between section and key,
//! e.g. `MUSICSTREAM_API__URL`.

use crate::error::{CliError, Result};
use config::builder::DefaultState;
use config::ConfigBuilder;
use musicstream_client::ClientConfig;
use musicstream_playback::DEFAULT_VOLUME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File read when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "musicstream.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer token for user-scoped collections
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl CliConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            // An explicit file must exist
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MUSICSTREAM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::build(settings)
    }

    /// Parse configuration from TOML text (no environment overlay)
    pub fn from_toml(contents: &str) -> Result<Self> {
        Self::build(
            config::Config::builder()
                .add_source(config::File::from_str(contents, config::FileFormat::Toml)),
        )
    }

    fn build(settings: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.api.url.trim();
        if url.is_empty() {
            return Err(CliError::Config(
                "API URL is required (set MUSICSTREAM_API__URL)".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "API URL must start with http:// or https://, got {:?}",
                url
            )));
        }

        if self.api.request_timeout_secs == 0 || self.api.connect_timeout_secs == 0 {
            return Err(CliError::Config("Timeouts must be at least 1 second".to_string()));
        }

        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(CliError::Config(format!(
                "Playback volume must be between 0.0 and 1.0, got {}",
                self.playback.volume
            )));
        }

        Ok(())
    }

    /// Transport settings for the HTTP client
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new(self.api.url.trim()).timeouts(
            Duration::from_secs(self.api.request_timeout_secs),
            Duration::from_secs(self.api.connect_timeout_secs),
        );
        client.access_token = self
            .api
            .token
            .clone()
            .filter(|token| !token.trim().is_empty());
        client
    }
}

// Default values
fn default_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CliConfig::from_toml("").unwrap();
        assert_eq!(config.api.url, "http://localhost:8000");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.playback.volume, DEFAULT_VOLUME);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = CliConfig::from_toml(
            r#"
            [api]
            url = "https://music.example.com"
            token = "abc"
            connect_timeout_secs = 3

            [playback]
            volume = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.api.url, "https://music.example.com");
        assert_eq!(config.api.connect_timeout_secs, 3);
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.playback.volume, 0.25);

        let client = config.client_config();
        assert_eq!(client.access_token.as_deref(), Some("abc"));
        assert_eq!(client.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_token_is_ignored() {
        let mut config = CliConfig::default();
        config.api.token = Some("  ".to_string());
        assert!(config.client_config().access_token.is_none());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = CliConfig::default();
        config.api.url = "music.example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.playback.volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/musicstream.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
