//! Posy
//!
//! Cart, pricing and checkout rules for the Posy marketplace mini app. This
//! crate performs no I/O: it models the cart snapshot, the four-step checkout
//! wizard, delivery slots, city-alias matching, stock verdicts and the order
//! payload, and leaves talking to the backend to `posy-app`.

pub mod cart;
pub mod checkout;
pub mod cities;
pub mod ids;
pub mod order;
pub mod prelude;
pub mod pricing;
pub mod promo;
pub mod quantity;
pub mod slots;
pub mod stock;
