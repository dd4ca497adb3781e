//! Adding to the cart.
//!
//! A cart only ever holds lines from one shop. Adding a product from another
//! shop asks the user first; accepting empties the cart before the new line
//! goes in. The two backend calls are not atomic.

use async_trait::async_trait;
use mockall::automock;
use posy::prelude::*;
use tracing::info;

use crate::{
    api::Product,
    cart::{CartError, CartStore},
};

/// Asks the user whether to replace the cart with another shop's product.
#[automock]
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// `true` when the user agrees to drop the lines from `current`.
    async fn confirm_replace(&self, current: ShopId, incoming: ShopId) -> bool;
}

/// What happened to an add-to-cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was added to the cart.
    Added,

    /// The cart was emptied and now holds only the new product.
    Replaced,

    /// The user kept the existing cart; nothing changed.
    Declined,
}

/// Add `product` to the cart, enforcing the single-shop rule.
///
/// The cart is reloaded first so the shop check runs against the backend's
/// current state rather than a stale snapshot.
///
/// # Errors
///
/// Returns an error when any backend call fails. If clearing succeeded but
/// adding failed, the cart is left empty.
pub async fn add_to_cart(
    store: &mut CartStore,
    product: &Product,
    quantity: Quantity,
    prompt: &dyn ConfirmPrompt,
) -> Result<AddOutcome, CartError> {
    let conflict = store.load().await?.conflicting_shop(product.shop_id);

    let outcome = match conflict {
        None => AddOutcome::Added,
        Some(current) => {
            if !prompt.confirm_replace(current, product.shop_id).await {
                return Ok(AddOutcome::Declined);
            }

            info!(%current, incoming = %product.shop_id, "replacing cart with another shop");

            store.clear().await?;

            AddOutcome::Replaced
        }
    };

    store.add(product.id, quantity).await?;

    Ok(outcome)
}
