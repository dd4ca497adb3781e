//! API Config

use std::{fmt, time::Duration};

use clap::Args;
use zeroize::Zeroizing;

use crate::{api::ApiConfig, config::ConfigError};

/// Backend API settings.
#[derive(Args)]
pub struct ApiArgs {
    /// Backend API root, including the `/api` prefix
    #[arg(long, env = "POSY_API_URL", default_value = "http://localhost:8000/api")]
    pub api_url: String,

    /// Header carrying the user's identity
    #[arg(long, env = "POSY_IDENTITY_HEADER", default_value = "X-Telegram-Init-Data")]
    pub identity_header: String,

    /// Telegram init data identifying the user
    #[arg(long, env = "POSY_INIT_DATA", hide_env_values = true)]
    pub init_data: Option<Zeroizing<String>>,

    /// Per-request timeout in seconds
    #[arg(long, env = "POSY_REQUEST_TIMEOUT_SECONDS")]
    pub request_timeout_seconds: Option<u64>,
}

impl fmt::Debug for ApiArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiArgs")
            .field("api_url", &self.api_url)
            .field("identity_header", &self.identity_header)
            .field("init_data", &"<redacted>")
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl ApiArgs {
    /// Client configuration for these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingInitData`] when no identity was given.
    pub fn to_api_config(&self) -> Result<ApiConfig, ConfigError> {
        let identity = self
            .init_data
            .clone()
            .filter(|data| !data.trim().is_empty())
            .ok_or(ConfigError::MissingInitData)?;

        Ok(ApiConfig {
            base_url: self.api_url.clone(),
            identity_header: self.identity_header.clone(),
            identity,
            timeout: self.request_timeout_seconds.map(Duration::from_secs),
        })
    }
}
