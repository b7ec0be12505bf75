//! Menu sources the scope tree is built from
//!
//! The backend serves the navigation menu as `{ "data": [ node, ... ] }`.
//! [`HttpMenuSource`] fetches it over HTTP; [`FileMenuSource`] reads the same
//! payload (or a bare node array) from disk for offline use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ScopeError;

/// Supplies the raw menu nodes
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Fetch the top-level menu nodes
    async fn fetch_menu(&self) -> Result<Vec<Value>, ScopeError>;
}

/// Extract the item list from a backend payload
///
/// Accepts the `{ "data": [...] }` envelope or a bare array. Anything else
/// yields an empty list.
pub fn envelope_items(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(nodes) => nodes,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(nodes)) => nodes,
            _ => {
                debug!("envelope_items: envelope has no data array");
                Vec::new()
            }
        },
        _ => {
            debug!("envelope_items: payload is neither an array nor an object");
            Vec::new()
        }
    }
}

/// Menu fetched from `GET {api_server}/web/menu`
pub struct HttpMenuSource {
    url: String,
    http: Client,
}

impl HttpMenuSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ScopeError> {
        let url = url.into();
        debug!(%url, ?timeout, "HttpMenuSource::new: called");
        let http = Client::builder().timeout(timeout).build().map_err(ScopeError::Network)?;
        Ok(Self { url, http })
    }

    /// Create a source from configuration
    pub fn from_config(config: &Config) -> Result<Self, ScopeError> {
        Self::new(config.menu_url(), Duration::from_millis(config.timeout_ms))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MenuSource for HttpMenuSource {
    async fn fetch_menu(&self) -> Result<Vec<Value>, ScopeError> {
        info!(url = %self.url, "HttpMenuSource::fetch_menu: fetching menu");
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%status, "HttpMenuSource::fetch_menu: non-success status");
            return Err(ScopeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ScopeError::InvalidResponse(e.to_string()))?;
        let nodes = envelope_items(payload);
        debug!(count = %nodes.len(), "HttpMenuSource::fetch_menu: received nodes");
        Ok(nodes)
    }
}

/// Menu read from a JSON file
pub struct FileMenuSource {
    path: PathBuf,
}

impl FileMenuSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl MenuSource for FileMenuSource {
    async fn fetch_menu(&self) -> Result<Vec<Value>, ScopeError> {
        debug!(path = %self.path.display(), "FileMenuSource::fetch_menu: called");
        let content = tokio::fs::read_to_string(&self.path).await?;
        let payload: Value = serde_json::from_str(&content)?;
        Ok(envelope_items(payload))
    }
}
