//! Remote store configuration
//!
//! Safe-to-ship public endpoint and anon key for the hosted data store.
//! Secret credentials must never be stored here.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the hosted data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project base URL, e.g. `https://project.supabase.co`
    pub url: String,
    /// Public anon API key
    pub anon_key: String,
    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
}

impl RemoteConfig {
    /// Validate and normalize a url/key pair
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self> {
        let url = normalize_text_option(Some(url.into()))
            .ok_or_else(|| Error::InvalidInput("Remote URL must not be empty".to_string()))?;
        if !is_http_url(&url) {
            return Err(Error::InvalidInput(
                "Remote URL must include http:// or https://".to_string(),
            ));
        }

        let anon_key = normalize_text_option(Some(anon_key.into()))
            .ok_or_else(|| Error::InvalidInput("Anon key must not be empty".to_string()))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            timeout: default_timeout(),
        })
    }

    /// Override the per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from `DUKAAN_SUPABASE_URL` / `DUKAAN_SUPABASE_ANON_KEY`
    ///
    /// Returns `None` when the variables are absent or unusable; the app
    /// then runs in offline-only mode.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = env::var("DUKAAN_SUPABASE_URL").ok()?;
        let anon_key = env::var("DUKAAN_SUPABASE_ANON_KEY").ok()?;

        match Self::new(url, anon_key) {
            Ok(config) => Some(config),
            Err(error) => {
                tracing::warn!("Ignoring invalid remote configuration: {error}");
                None
            }
        }
    }
}
