//! Geocoding API.
//!
//! The backend proxies an external mapping provider; the client only sees the
//! normalized result.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use serde::Deserialize;

use crate::api::{client::HttpApi, errors::ApiError};

/// A resolved address.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodedAddress {
    /// Formatted address
    pub address: String,

    /// Latitude
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Longitude
    #[serde(alias = "lon")]
    pub longitude: f64,

    /// City the address lies in, when the provider reports one
    #[serde(default)]
    pub city: Option<String>,
}

/// Forward and reverse geocoding.
#[automock]
#[async_trait]
pub trait GeocodeApi: Send + Sync {
    /// Resolve free text to an address.
    async fn forward(&self, query: &str) -> Result<GeocodedAddress, ApiError>;

    /// Resolve coordinates to an address.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<GeocodedAddress, ApiError>;
}

#[async_trait]
impl GeocodeApi for HttpApi {
    async fn forward(&self, query: &str) -> Result<GeocodedAddress, ApiError> {
        self.send_json(
            self.request(Method::GET, "/geocode/forward")
                .query(&[("q", query)]),
        )
        .await
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<GeocodedAddress, ApiError> {
        self.send_json(
            self.request(Method::GET, "/geocode/reverse")
                .query(&[("lat", latitude), ("lon", longitude)]),
        )
        .await
    }
}
