//! Cart store.
//!
//! Every mutation is sent to the backend and followed by a full reload, so the
//! snapshot held here is always exactly what the backend last returned. There
//! is no optimistic local patching.

use std::sync::Arc;

use posy::prelude::*;
use tracing::debug;

use crate::{api::CartApi, cart::CartError};

/// Local snapshot of the backend cart.
pub struct CartStore {
    api: Arc<dyn CartApi>,
    cart: Cart,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty store; call [`CartStore::load`] to fill it.
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>) -> Self {
        Self {
            api,
            cart: Cart::default(),
        }
    }

    /// Last loaded snapshot.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Replace the snapshot with the backend cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart cannot be fetched; the previous snapshot
    /// is kept.
    pub async fn load(&mut self) -> Result<&Cart, CartError> {
        let items = self.api.list_items().await?;

        debug!(lines = items.len(), "cart loaded");

        self.cart = Cart::new(items);

        Ok(&self.cart)
    }

    /// Add a product and reload.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the line or the reload fails.
    pub async fn add(&mut self, product: ProductId, quantity: Quantity) -> Result<&Cart, CartError> {
        self.api.add_item(product, quantity).await?;

        self.load().await
    }

    /// Set a line's quantity, or remove the line, and reload.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call or the reload fails.
    pub async fn update_quantity(
        &mut self,
        item: CartItemId,
        update: QuantityUpdate,
    ) -> Result<&Cart, CartError> {
        match update {
            QuantityUpdate::Set(quantity) => self.api.update_item(item, quantity).await?,
            QuantityUpdate::Remove => self.api.remove_item(item).await?,
        }

        self.load().await
    }

    /// Remove a line and reload.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call or the reload fails.
    pub async fn remove(&mut self, item: CartItemId) -> Result<&Cart, CartError> {
        self.api.remove_item(item).await?;

        self.load().await
    }

    /// Empty the cart and reload.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend call or the reload fails.
    pub async fn clear(&mut self) -> Result<&Cart, CartError> {
        self.api.clear().await?;

        self.load().await
    }
}
