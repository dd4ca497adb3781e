//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::{
    cart::{CartItem, subtotal},
    promo::{AppliedPromo, DiscountKind},
};

/// Default delivery fee, in roubles.
pub const DEFAULT_DELIVERY_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Errors raised while formatting amounts.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The amount does not fit in minor units.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Order totals shown on the confirmation step and submitted with the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of effective line totals
    pub subtotal: Decimal,

    /// Amount actually taken off the subtotal by a promo
    pub promo_discount: Decimal,

    /// Delivery fee after any free-delivery promo
    pub delivery_fee: Decimal,

    /// `subtotal - promo_discount + delivery_fee`
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for `items` with an optional promo.
    ///
    /// A free-delivery promo zeroes the fee and ignores its amount. Any other
    /// promo takes its amount off the subtotal, never below zero.
    pub fn compute(items: &[CartItem], promo: Option<&AppliedPromo>, base_fee: Decimal) -> Self {
        let subtotal = subtotal(items);

        let (promo_discount, delivery_fee) = match promo.map(|promo| &promo.kind) {
            Some(DiscountKind::FreeDelivery) => (Decimal::ZERO, Decimal::ZERO),
            Some(DiscountKind::Amount(_)) => {
                let amount = promo.map_or(Decimal::ZERO, |promo| promo.discount_amount);

                (amount.min(subtotal).max(Decimal::ZERO), base_fee)
            }
            None => (Decimal::ZERO, base_fee),
        };

        Self {
            subtotal,
            promo_discount,
            delivery_fee,
            total: subtotal - promo_discount + delivery_fee,
        }
    }
}

/// Convert a rouble amount into kopecks, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] when the amount does not fit in `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, PricingError> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::OutOfRange(amount))
}

/// Format a rouble amount for display.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] when the amount does not fit in `i64`.
pub fn format_rub(amount: Decimal) -> Result<String, PricingError> {
    let money = Money::from_minor(to_minor_units(amount)?, iso::RUB);

    Ok(format!("{money}"))
}
