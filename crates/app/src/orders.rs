//! Order submitter.

use std::sync::Arc;

use jiff::civil::DateTime;
use posy::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::{ApiError, Order, OrdersApi},
    storage::ContactStorage,
};

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The checkout is incomplete; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] CheckoutError),

    /// The backend refused the order or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Text to show the user. Backend rejections are shown verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(error) => error.to_string(),
            Self::Api(error) => error.user_message(),
        }
    }
}

/// Turns a completed checkout into an order.
#[derive(Clone)]
pub struct OrderSubmitter {
    orders: Arc<dyn OrdersApi>,
    storage: Arc<dyn ContactStorage>,
    delivery_fee: Decimal,
    aliases: Arc<CityAliases>,
}

impl std::fmt::Debug for OrderSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSubmitter")
            .field("delivery_fee", &self.delivery_fee)
            .finish_non_exhaustive()
    }
}

impl OrderSubmitter {
    /// Create a submitter charging `delivery_fee` unless a promo waives it.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersApi>,
        storage: Arc<dyn ContactStorage>,
        delivery_fee: Decimal,
        aliases: Arc<CityAliases>,
    ) -> Self {
        Self {
            orders,
            storage,
            delivery_fee,
            aliases,
        }
    }

    /// Validate every step, post the order and remember the contact details.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] when a step fails validation, or
    /// [`SubmitError::Api`] when the backend does not accept the order. A
    /// failure to remember the contact is logged only.
    pub async fn submit(&self, state: &CheckoutState, now: DateTime) -> Result<Order, SubmitError> {
        let order = NewOrder::assemble(state, self.delivery_fee, now, &self.aliases)?;
        let created = self.orders.create_order(&order).await?;

        info!(order = %created.id, shop = %order.shop_id, total = %order.total, "order placed");

        if let Err(error) = self.storage.save(&state.contact()).await {
            warn!(%error, "could not remember checkout contact");
        }

        Ok(created)
    }
}
