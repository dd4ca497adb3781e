//! HTTP client for the marketplace REST API.

use std::{fmt, time::Duration};

use reqwest::{
    Client, Method, RequestBuilder,
    header::{HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::api::errors::{ApiError, rejection_message};

/// Header carrying a per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Configuration for connecting to the marketplace backend.
#[derive(Clone)]
pub struct ApiConfig {
    /// API root including the `/api` prefix, e.g. `"https://shop.example/api"`.
    pub base_url: String,

    /// Name of the header that identifies the user.
    pub identity_header: String,

    /// Identity header value (Telegram init data).
    pub identity: Zeroizing<String>,

    /// Optional per-request timeout.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("identity_header", &self.identity_header)
            .field("identity", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// JSON client shared by every API service.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    identity_header: HeaderName,
    identity: HeaderValue,
    http: Client,
}

impl HttpApi {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the identity header cannot be encoded,
    /// or [`ApiError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let identity_header = HeaderName::from_bytes(config.identity_header.as_bytes())
            .map_err(|error| ApiError::Config(format!("identity header name: {error}")))?;

        let mut identity = HeaderValue::from_str(config.identity.as_str())
            .map_err(|error| ApiError::Config(format!("identity header value: {error}")))?;

        identity.set_sensitive(true);

        let mut builder = Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identity_header,
            identity,
            http: builder.build()?,
        })
    }

    /// Absolute URL for an API path such as `"/cart"`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request carrying the identity and a fresh request ID.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(self.identity_header.clone(), self.identity.clone())
            .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string())
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;

        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    /// Send a request, discarding any successful body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(%status, %url, "request rejected");

            return Err(ApiError::Rejected {
                status,
                message: rejection_message(status, &body),
            });
        }

        debug!(%status, %url, "request succeeded");

        Ok(body)
    }
}
