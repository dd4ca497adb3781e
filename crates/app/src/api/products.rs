//! Products API.

use async_trait::async_trait;
use mockall::automock;
use posy::prelude::*;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::{client::HttpApi, errors::ApiError};

fn active_by_default() -> bool {
    true
}

/// Product as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product ID
    pub id: ProductId,

    /// Shop selling the product
    pub shop_id: ShopId,

    /// Display name
    pub name: String,

    /// List price
    pub price: Decimal,

    /// Sale price, when set
    #[serde(default)]
    pub discount_price: Option<Decimal>,

    /// Units in stock; `None` when the seller does not track stock
    #[serde(default)]
    pub quantity: Option<i64>,

    /// Whether the product is listed at all
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

impl Product {
    /// Stock available to order. Unlisted products and negative counts have
    /// none; `None` means stock is not tracked.
    pub fn available_stock(&self) -> Option<u32> {
        if !self.is_active {
            return Some(0);
        }

        self.quantity
            .map(|quantity| u32::try_from(quantity.max(0)).unwrap_or(u32::MAX))
    }
}

/// Catalog lookups.
#[automock]
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// Fetch the current record of a product.
    async fn get_product(&self, product: ProductId) -> Result<Product, ApiError>;
}

#[async_trait]
impl ProductsApi for HttpApi {
    async fn get_product(&self, product: ProductId) -> Result<Product, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/products/{product}")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn product(quantity: serde_json::Value, active: bool) -> Result<Product, serde_json::Error> {
        serde_json::from_value(json!({
            "id": 10,
            "shop_id": 3,
            "name": "Tulips",
            "price": 1000.0,
            "discount_price": null,
            "quantity": quantity,
            "is_active": active
        }))
    }

    #[test]
    fn stock_comes_from_quantity() -> TestResult {
        assert_eq!(product(json!(4), true)?.available_stock(), Some(4));
        assert_eq!(product(json!(-2), true)?.available_stock(), Some(0));
        assert_eq!(product(json!(null), true)?.available_stock(), None);

        Ok(())
    }

    #[test]
    fn inactive_products_have_no_stock() -> TestResult {
        assert_eq!(product(json!(null), false)?.available_stock(), Some(0));
        assert_eq!(product(json!(12), false)?.available_stock(), Some(0));

        Ok(())
    }

    #[test]
    fn missing_fields_use_defaults() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "shop_id": 2,
            "name": "Bread",
            "price": 150
        }))?;

        assert!(product.is_active);
        assert_eq!(product.available_stock(), None);
        assert_eq!(product.discount_price, None);

        Ok(())
    }
}
