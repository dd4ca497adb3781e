//! Posy prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartItem},
    checkout::{Back, CheckoutError, CheckoutState, SavedContact, Step},
    cities::{CityAliasError, CityAliases},
    ids::{CartItemId, OrderId, ProductId, ShopId},
    order::{NewOrder, NewOrderItem},
    pricing::{DEFAULT_DELIVERY_FEE, OrderTotals, PricingError, format_rub},
    promo::{AppliedPromo, DiscountKind, PromoValidation},
    quantity::{Quantity, QuantityError, QuantityUpdate},
    slots::{TimeSlot, UnknownSlot, available_slots},
    stock::{StockChange, StockReport, StockVerdict},
};
