use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use serde::{Deserialize, Deserializer};
use snafu::{ensure, ResultExt};

use crate::database::DatabaseConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu, ConfigureStorageSnafu, SessionSecretSnafu};
use crate::storage::{Bucket, MediaStorage, StorageBackend};

const DEFAULT_BUCKET: &str = "bittube-io.appspot.com";
const DEFAULT_OAUTH_CALLBACK: &str = "http://localhost:8080/oauth2callback";
const OAUTH_SCOPES: [&str; 2] = ["email", "profile"];

/// Minimum length of `SESSION_SECRET`, in bytes.
pub const SESSION_SECRET_LEN: usize = 64;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes", deserialize_with = "number_from_str")]
    pub max_upload_bytes: usize,

    #[serde(flatten)]
    pub database: DatabaseConfig,
    #[serde(flatten)]
    pub storage: StorageConfig,
    #[serde(flatten)]
    pub session: SessionConfig,
    #[serde(flatten)]
    pub oauth: OAuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>().context(ConfigLoadSnafu)
    }
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_max_upload_bytes() -> usize {
    256 * 1024 * 1024
}

// flattened sections make envy hand every value over as a string
fn number_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = String::deserialize(deserializer)?;
    value.trim().parse().map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(rename = "storage_backend", default)]
    pub backend: StorageBackend,
    #[serde(rename = "storage_bucket", default = "default_bucket")]
    pub bucket: String,
}

impl StorageConfig {
    /// Opens the configured bucket, or `None` when uploads are disabled.
    pub fn open(&self) -> Result<Option<Bucket>, ApplicationError> {
        let bucket = match self.backend {
            StorageBackend::Gcs => Bucket::gcs(&self.bucket).context(ConfigureStorageSnafu)?,
            StorageBackend::Memory => Bucket::in_memory(&self.bucket),
            StorageBackend::Disabled => return Ok(None),
        };

        Ok(Some(bucket))
    }

    pub fn media(&self) -> Result<Option<Arc<dyn MediaStorage>>, ApplicationError> {
        Ok(self
            .open()?
            .map(|bucket| Arc::new(bucket) as Arc<dyn MediaStorage>))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: default_bucket(),
        }
    }
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    #[serde(rename = "session_secret", default)]
    pub secret: Option<String>,
}

impl SessionConfig {
    /// Key used to sign session cookies.
    ///
    /// Without a configured secret a random key is generated, which signs
    /// everybody out whenever the process restarts.
    pub fn key(&self) -> Result<Key, ApplicationError> {
        let Some(secret) = &self.secret else {
            tracing::warn!("SESSION_SECRET is not set, sessions will not survive a restart");
            return Ok(Key::generate());
        };

        ensure!(
            secret.len() >= SESSION_SECRET_LEN,
            SessionSecretSnafu {
                length: secret.len()
            }
        );

        Ok(Key::from(secret.as_bytes()))
    }
}

/// OAuth client settings for signing users in.
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthConfig {
    #[serde(rename = "oauth2_client_id", default)]
    pub client_id: Option<String>,
    #[serde(rename = "oauth2_client_secret", default)]
    pub client_secret: Option<String>,
    #[serde(rename = "oauth2_callback", default)]
    pub callback: Option<String>,
}

impl OAuthConfig {
    /// Where the provider sends users back to, falling back to a local address.
    pub fn redirect_url(&self) -> &str {
        self.callback
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_OAUTH_CALLBACK)
    }

    pub fn scopes(&self) -> &'static [&'static str] {
        &OAUTH_SCOPES
    }

    pub fn is_enabled(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}
