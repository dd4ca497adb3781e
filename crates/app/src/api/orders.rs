//! Orders API.

use async_trait::async_trait;
use mockall::automock;
use posy::prelude::*;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::{client::HttpApi, errors::ApiError};

/// Order as the backend returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    /// Order ID
    pub id: OrderId,

    /// Shop the order was placed with
    pub shop_id: ShopId,

    /// Lifecycle status, owned by the backend
    #[serde(default)]
    pub status: Option<String>,

    /// Amount charged
    pub total: Decimal,
}

/// Order placement and history.
#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Place an order.
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError>;

    /// The user's past orders.
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;
}

#[async_trait]
impl OrdersApi for HttpApi {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.send_json(self.request(Method::POST, "/orders").json(order))
            .await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.send_json(self.request(Method::GET, "/orders")).await
    }
}
