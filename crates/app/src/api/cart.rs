//! Cart API.

use async_trait::async_trait;
use mockall::automock;
use posy::prelude::*;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::{client::HttpApi, errors::ApiError};

#[derive(Debug, Serialize)]
struct AddItemBody {
    product_id: ProductId,
    quantity: Quantity,
}

#[derive(Debug, Serialize)]
struct UpdateItemBody {
    quantity: Quantity,
}

/// `GET /cart` answers either with the bare list or wrapped with a summary.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CartListing {
    Items(Vec<CartItem>),
    Wrapped { items: Vec<CartItem> },
}

impl From<CartListing> for Vec<CartItem> {
    fn from(listing: CartListing) -> Self {
        match listing {
            CartListing::Items(items) | CartListing::Wrapped { items } => items,
        }
    }
}

/// Remote cart owned by the identified user.
#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetch every cart line.
    async fn list_items(&self) -> Result<Vec<CartItem>, ApiError>;

    /// Add a product to the cart.
    async fn add_item(&self, product: ProductId, quantity: Quantity) -> Result<(), ApiError>;

    /// Change the quantity of a cart line.
    async fn update_item(&self, item: CartItemId, quantity: Quantity) -> Result<(), ApiError>;

    /// Remove a cart line.
    async fn remove_item(&self, item: CartItemId) -> Result<(), ApiError>;

    /// Remove every cart line.
    async fn clear(&self) -> Result<(), ApiError>;
}

#[async_trait]
impl CartApi for HttpApi {
    async fn list_items(&self) -> Result<Vec<CartItem>, ApiError> {
        let listing: CartListing = self.send_json(self.request(Method::GET, "/cart")).await?;

        Ok(listing.into())
    }

    async fn add_item(&self, product: ProductId, quantity: Quantity) -> Result<(), ApiError> {
        let body = AddItemBody {
            product_id: product,
            quantity,
        };

        self.send_empty(self.request(Method::POST, "/cart").json(&body))
            .await
    }

    async fn update_item(&self, item: CartItemId, quantity: Quantity) -> Result<(), ApiError> {
        let body = UpdateItemBody { quantity };

        self.send_empty(
            self.request(Method::PUT, &format!("/cart/{item}"))
                .json(&body),
        )
        .await
    }

    async fn remove_item(&self, item: CartItemId) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, &format!("/cart/{item}")))
            .await
    }

    async fn clear(&self) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, "/cart")).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn line() -> serde_json::Value {
        json!({
            "id": 1,
            "product_id": 10,
            "shop_id": 3,
            "quantity": 2,
            "product_name": "Tulips",
            "product_price": 1000.0,
            "product_discount_price": 800.0
        })
    }

    #[test]
    fn bare_listing_decodes() -> TestResult {
        let listing: CartListing = serde_json::from_value(json!([line()]))?;
        let items: Vec<CartItem> = listing.into();

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|item| item.quantity.get()), Some(2));

        Ok(())
    }

    #[test]
    fn wrapped_listing_decodes() -> TestResult {
        let listing: CartListing =
            serde_json::from_value(json!({ "items": [line()], "total": 1600.0 }))?;
        let items: Vec<CartItem> = listing.into();

        assert_eq!(items.len(), 1);

        Ok(())
    }

    #[test]
    fn add_body_uses_plain_integers() -> TestResult {
        let body = AddItemBody {
            product_id: ProductId::new(10),
            quantity: Quantity::new(3)?,
        };

        assert_eq!(
            serde_json::to_value(&body)?,
            json!({ "product_id": 10, "quantity": 3 })
        );

        Ok(())
    }
}
