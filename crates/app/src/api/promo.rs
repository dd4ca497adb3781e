//! Promo API.

use async_trait::async_trait;
use mockall::automock;
use posy::prelude::*;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::{client::HttpApi, errors::ApiError};

/// Body of `POST /promo/validate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoRequest {
    /// Code as entered
    pub code: String,

    /// Shop the order is for
    pub shop_id: ShopId,

    /// Order subtotal before discounts
    pub subtotal: Decimal,

    /// Whether the user has never ordered before
    pub is_first_order: bool,
}

/// Promo code validation.
#[automock]
#[async_trait]
pub trait PromoApi: Send + Sync {
    /// Ask the backend whether a code applies to an order.
    async fn validate(&self, request: &PromoRequest) -> Result<PromoValidation, ApiError>;
}

#[async_trait]
impl PromoApi for HttpApi {
    async fn validate(&self, request: &PromoRequest) -> Result<PromoValidation, ApiError> {
        self.send_json(self.request(Method::POST, "/promo/validate").json(request))
            .await
    }
}
