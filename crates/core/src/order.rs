//! Orders
//!
//! An order is written once, from a fully validated checkout, and handed to the
//! backend. Nothing on the client reads it back.

use jiff::civil::{Date, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    checkout::{CheckoutError, CheckoutState},
    cities::CityAliases,
    ids::{ProductId, ShopId},
    pricing::OrderTotals,
    quantity::Quantity,
    slots::TimeSlot,
};

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    /// Product ordered
    pub product_id: ProductId,

    /// Units ordered
    pub quantity: Quantity,

    /// Effective unit price at checkout
    pub price: Decimal,
}

/// Order payload submitted to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Shop the order is placed with
    pub shop_id: ShopId,

    /// Ordered products
    pub items: Vec<NewOrderItem>,

    /// Contact phone
    pub recipient_phone: String,

    /// Recipient name
    pub recipient_name: String,

    /// Delivery address
    pub delivery_address: String,

    /// Delivery latitude
    pub delivery_latitude: Option<f64>,

    /// Delivery longitude
    pub delivery_longitude: Option<f64>,

    /// Courier comment
    pub delivery_comment: Option<String>,

    /// Delivery date
    pub delivery_date: Date,

    /// Delivery slot
    pub delivery_time: TimeSlot,

    /// Delivery fee after promo
    pub delivery_fee: Decimal,

    /// Applied promo code
    pub promo_code: Option<String>,

    /// Amount taken off the subtotal by the promo
    pub promo_discount: Decimal,

    /// Sum of effective line totals
    pub subtotal: Decimal,

    /// Amount to pay
    pub total: Decimal,
}

impl NewOrder {
    /// Assemble the order for a checkout that passes every step's validation.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] when any step is incomplete.
    pub fn assemble(
        state: &CheckoutState,
        base_fee: Decimal,
        now: DateTime,
        aliases: &CityAliases,
    ) -> Result<Self, CheckoutError> {
        state.validate_all(now, aliases)?;

        let delivery_date = state.delivery_date.ok_or(CheckoutError::DateMissing)?;
        let delivery_time = state.delivery_time.ok_or(CheckoutError::SlotMissing)?;
        let totals = OrderTotals::compute(&state.items, state.promo.as_ref(), base_fee);

        Ok(Self {
            shop_id: state.shop_id,
            items: state
                .items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.effective_price(),
                })
                .collect(),
            recipient_phone: state.phone.clone(),
            recipient_name: state.recipient_name.clone(),
            delivery_address: state.address.clone(),
            delivery_latitude: state.latitude,
            delivery_longitude: state.longitude,
            delivery_comment: Some(state.delivery_comment.clone()).filter(|c| !c.is_empty()),
            delivery_date,
            delivery_time,
            delivery_fee: totals.delivery_fee,
            promo_code: state.promo.as_ref().map(|promo| promo.code.clone()),
            promo_discount: totals.promo_discount,
            subtotal: totals.subtotal,
            total: totals.total,
        })
    }
}
