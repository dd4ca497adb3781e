//! Marketplace REST API.

pub mod cart;
pub mod client;
pub mod errors;
pub mod geocode;
pub mod orders;
pub mod products;
pub mod promo;
pub mod shops;

pub use cart::{CartApi, MockCartApi};
pub use client::{ApiConfig, HttpApi};
pub use errors::{ApiError, GENERIC_FAILURE};
pub use geocode::{GeocodeApi, GeocodedAddress, MockGeocodeApi};
pub use orders::{MockOrdersApi, Order, OrdersApi};
pub use products::{MockProductsApi, Product, ProductsApi};
pub use promo::{MockPromoApi, PromoApi, PromoRequest};
pub use shops::{MockShopsApi, Shop, ShopsApi};
