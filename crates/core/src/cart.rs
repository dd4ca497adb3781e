//! Cart
//!
//! The cart is a list of lines owned by the backend. A client only ever holds
//! the last snapshot it loaded, so [`Cart`] is a read model: it answers
//! questions about the snapshot but never mutates lines locally.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    ids::{CartItemId, ProductId, ShopId},
    quantity::Quantity,
};

/// One product/quantity pairing in the user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart line ID
    pub id: CartItemId,

    /// Product on this line
    pub product_id: ProductId,

    /// Shop selling the product
    pub shop_id: ShopId,

    /// Requested units
    pub quantity: Quantity,

    /// Product display name
    pub product_name: String,

    /// List price per unit
    pub product_price: Decimal,

    /// Discounted price per unit, when the shop runs a sale
    #[serde(default)]
    pub product_discount_price: Option<Decimal>,
}

impl CartItem {
    /// Unit price actually charged: the discount price when present, else the
    /// list price.
    pub fn effective_price(&self) -> Decimal {
        self.product_discount_price.unwrap_or(self.product_price)
    }

    /// Effective price multiplied by quantity.
    pub fn line_total(&self) -> Decimal {
        self.effective_price() * Decimal::from(self.quantity.get())
    }
}

/// Snapshot of the backend cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create a cart snapshot from backend lines.
    pub fn new(items: impl Into<Vec<CartItem>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// All lines in backend order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Find a line by ID.
    pub fn line(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Shop the cart currently belongs to, if it has any lines.
    pub fn shop_id(&self) -> Option<ShopId> {
        self.items.first().map(|item| item.shop_id)
    }

    /// Returns the cart's current shop when adding from `shop` would mix shops.
    pub fn conflicting_shop(&self, shop: ShopId) -> Option<ShopId> {
        self.shop_id().filter(|current| *current != shop)
    }

    /// Lines belonging to `shop`.
    pub fn lines_for_shop(&self, shop: ShopId) -> Vec<CartItem> {
        self.items
            .iter()
            .filter(|item| item.shop_id == shop)
            .cloned()
            .collect()
    }

    /// Sum of effective line totals.
    pub fn subtotal(&self) -> Decimal {
        subtotal(&self.items)
    }

    /// Total number of units across every line.
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sum of effective line totals for any set of lines.
pub fn subtotal(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn line(id: i64, shop: i64, quantity: u32, price: Decimal, discount: Option<Decimal>) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product_id: ProductId::new(id * 10),
            shop_id: ShopId::new(shop),
            quantity: Quantity::new(quantity).unwrap_or(Quantity::ONE),
            product_name: format!("Product {id}"),
            product_price: price,
            product_discount_price: discount,
        }
    }

    #[test]
    fn effective_price_prefers_discount() {
        let item = line(1, 1, 2, Decimal::from(1000), Some(Decimal::from(800)));

        assert_eq!(item.effective_price(), Decimal::from(800));
        assert_eq!(item.line_total(), Decimal::from(1600));
    }

    #[test]
    fn subtotal_sums_effective_line_totals() {
        let cart = Cart::new([
            line(1, 1, 2, Decimal::from(1000), Some(Decimal::from(800))),
            line(2, 1, 1, Decimal::from(350), None),
        ]);

        assert_eq!(cart.subtotal(), Decimal::from(1950));
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn empty_cart_has_no_shop() {
        let cart = Cart::default();

        assert!(cart.is_empty());
        assert_eq!(cart.shop_id(), None);
        assert_eq!(cart.conflicting_shop(ShopId::new(3)), None);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn conflicting_shop_only_reports_a_different_shop() {
        let cart = Cart::new([line(1, 4, 1, Decimal::from(100), None)]);

        assert_eq!(cart.conflicting_shop(ShopId::new(4)), None);
        assert_eq!(cart.conflicting_shop(ShopId::new(9)), Some(ShopId::new(4)));
    }

    #[test]
    fn line_lookup_by_id() -> TestResult {
        let cart = Cart::new([line(1, 4, 1, Decimal::from(100), None), line(2, 4, 3, Decimal::from(50), None)]);

        let found = cart.line(CartItemId::new(2)).ok_or("line 2 missing")?;

        assert_eq!(found.quantity.get(), 3);
        assert!(cart.line(CartItemId::new(5)).is_none());

        Ok(())
    }
}
