//! Promo evaluator.

use std::sync::Arc;

use posy::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiError, OrdersApi, PromoApi, PromoRequest};

/// Message used when the backend rejects a code without saying why.
pub const INVALID_CODE: &str = "This promo code is not valid.";

/// Errors raised while evaluating a promo code.
#[derive(Debug, Error)]
pub enum PromoError {
    /// Nothing was entered.
    #[error("enter a promo code")]
    EmptyCode,

    /// The request failed before the backend could judge the code.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PromoError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCode => self.to_string(),
            Self::Api(error) => error.user_message(),
        }
    }
}

/// Result of evaluating a code.
#[derive(Debug, Clone, PartialEq)]
pub enum PromoOutcome {
    /// The code applies to this order.
    Applied(AppliedPromo),

    /// The code does not apply, with the backend's explanation.
    Rejected(String),
}

/// Validates promo codes against the backend.
#[derive(Clone)]
pub struct PromoEvaluator {
    promo: Arc<dyn PromoApi>,
    orders: Arc<dyn OrdersApi>,
}

impl std::fmt::Debug for PromoEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromoEvaluator").finish_non_exhaustive()
    }
}

impl PromoEvaluator {
    /// Create an evaluator over the given APIs.
    #[must_use]
    pub fn new(promo: Arc<dyn PromoApi>, orders: Arc<dyn OrdersApi>) -> Self {
        Self { promo, orders }
    }

    /// Whether the user has never placed an order. A failed history lookup
    /// counts as "not first".
    pub async fn is_first_order(&self) -> bool {
        match self.orders.list_orders().await {
            Ok(orders) => orders.is_empty(),
            Err(error) => {
                warn!(%error, "order history lookup failed");
                false
            }
        }
    }

    /// Ask the backend whether `code` applies to an order from `shop` worth
    /// `subtotal`.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::EmptyCode`] for blank input, or
    /// [`PromoError::Api`] when the request fails in transport or the answer
    /// cannot be read. Backend rejections are an [`PromoOutcome::Rejected`].
    pub async fn evaluate(
        &self,
        code: &str,
        shop: ShopId,
        subtotal: Decimal,
    ) -> Result<PromoOutcome, PromoError> {
        let code = code.trim();

        if code.is_empty() {
            return Err(PromoError::EmptyCode);
        }

        let request = PromoRequest {
            code: code.to_string(),
            shop_id: shop,
            subtotal,
            is_first_order: self.is_first_order().await,
        };

        let validation = match self.promo.validate(&request).await {
            Ok(validation) => validation,
            Err(ApiError::Rejected { message, .. }) => {
                return Ok(PromoOutcome::Rejected(message));
            }
            Err(error) => return Err(error.into()),
        };

        debug!(code, valid = validation.valid, "promo validated");

        Ok(match AppliedPromo::from_validation(code, &validation) {
            Some(promo) => PromoOutcome::Applied(promo),
            None => PromoOutcome::Rejected(
                validation
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| INVALID_CODE.to_string()),
            ),
        })
    }
}
