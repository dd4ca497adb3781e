//! Posy marketplace client: the backend REST API, cart store, stock checks,
//! promo codes, checkout and order placement.

pub mod api;
pub mod cart;
pub mod config;
pub mod context;
pub mod notify;
pub mod orders;
pub mod platform;
pub mod promo;
pub mod stock;
pub mod storage;
pub mod storefront;

#[cfg(test)]
mod test;
