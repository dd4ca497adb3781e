//! Shops API.

use async_trait::async_trait;
use mockall::automock;
use posy::prelude::*;
use reqwest::Method;
use serde::Deserialize;

use crate::api::{client::HttpApi, errors::ApiError};

/// Shop record; only the parts checkout needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Shop {
    /// Shop ID
    pub id: ShopId,

    /// Display name
    pub name: String,

    /// Registered city, used to check delivery addresses
    #[serde(default)]
    pub city: Option<String>,
}

/// Shop lookups.
#[automock]
#[async_trait]
pub trait ShopsApi: Send + Sync {
    /// Fetch a shop.
    async fn get_shop(&self, shop: ShopId) -> Result<Shop, ApiError>;
}

#[async_trait]
impl ShopsApi for HttpApi {
    async fn get_shop(&self, shop: ShopId) -> Result<Shop, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/shops/{shop}")))
            .await
    }
}
