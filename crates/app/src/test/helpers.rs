//! Test Helpers

use std::sync::Arc;

use jiff::civil::{DateTime, date};
use posy::prelude::*;
use rust_decimal::Decimal;

use crate::{
    api::{
        MockCartApi, MockGeocodeApi, MockOrdersApi, MockProductsApi, MockPromoApi, MockShopsApi,
        Product, Shop,
    },
    context::AppContext,
    notify::MockNotifier,
    platform::ConsoleBridge,
    storage::MockContactStorage,
};

pub(crate) const SHOP: ShopId = ShopId::new(3);
pub(crate) const OTHER_SHOP: ShopId = ShopId::new(4);

pub(crate) fn quantity(count: u32) -> Quantity {
    Quantity::new(count).expect("test quantities are positive")
}

pub(crate) fn make_item(id: i64, product: i64, count: u32) -> CartItem {
    CartItem {
        id: CartItemId::new(id),
        product_id: ProductId::new(product),
        shop_id: SHOP,
        quantity: quantity(count),
        product_name: format!("Product {product}"),
        product_price: Decimal::from(1000),
        product_discount_price: Some(Decimal::from(800)),
    }
}

pub(crate) fn make_product(id: i64, shop: ShopId, stock: Option<i64>) -> Product {
    Product {
        id: ProductId::new(id),
        shop_id: shop,
        name: format!("Product {id}"),
        price: Decimal::from(1000),
        discount_price: Some(Decimal::from(800)),
        quantity: stock,
        is_active: true,
    }
}

pub(crate) fn make_shop(city: &str) -> Shop {
    Shop {
        id: SHOP,
        name: "Petals".to_string(),
        city: Some(city.to_string()),
    }
}

/// 2026-10-19 10:00, a Monday morning.
pub(crate) fn morning() -> DateTime {
    date(2026, 10, 19).at(10, 0, 0, 0)
}

/// Strict mocks for every service seam; unset expectations fail the test.
pub(crate) struct Mocks {
    pub(crate) cart: MockCartApi,
    pub(crate) products: MockProductsApi,
    pub(crate) shops: MockShopsApi,
    pub(crate) orders: MockOrdersApi,
    pub(crate) promo: MockPromoApi,
    pub(crate) geocode: MockGeocodeApi,
    pub(crate) storage: MockContactStorage,
    pub(crate) notifier: MockNotifier,
    pub(crate) platform: Arc<ConsoleBridge>,
}

impl Mocks {
    pub(crate) fn new() -> Self {
        Self {
            cart: MockCartApi::new(),
            products: MockProductsApi::new(),
            shops: MockShopsApi::new(),
            orders: MockOrdersApi::new(),
            promo: MockPromoApi::new(),
            geocode: MockGeocodeApi::new(),
            storage: MockContactStorage::new(),
            notifier: MockNotifier::new(),
            platform: Arc::new(ConsoleBridge::new(Some("+79001234567".to_string()))),
        }
    }

    pub(crate) fn into_context(self) -> AppContext {
        AppContext {
            cart: Arc::new(self.cart),
            products: Arc::new(self.products),
            shops: Arc::new(self.shops),
            orders: Arc::new(self.orders),
            promo: Arc::new(self.promo),
            geocode: Arc::new(self.geocode),
            storage: Arc::new(self.storage),
            platform: self.platform,
            notifier: Arc::new(self.notifier),
            aliases: Arc::new(CityAliases::builtin()),
            delivery_fee: DEFAULT_DELIVERY_FEE,
        }
    }
}
