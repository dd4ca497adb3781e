//! Stock reconciler.
//!
//! Runs before checkout opens. Each line is checked against the product's
//! live stock and adjusted on the backend when it asks for more than is left.
//! A line whose product cannot be fetched is left alone.

use std::sync::Arc;

use posy::prelude::*;
use tracing::{debug, warn};

use crate::api::{ApiError, CartApi, ProductsApi};

/// Result of a stock check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCheck {
    /// Checkout may start
    pub can_proceed: bool,

    /// Some lines were removed or clamped; the cart should be reloaded
    pub has_changes: bool,

    /// What was changed
    pub report: StockReport,
}

impl From<StockReport> for StockCheck {
    fn from(report: StockReport) -> Self {
        Self {
            can_proceed: report.can_proceed(),
            has_changes: report.has_changes(),
            report,
        }
    }
}

/// Compares cart lines against product stock.
#[derive(Clone)]
pub struct StockReconciler {
    products: Arc<dyn ProductsApi>,
    cart: Arc<dyn CartApi>,
}

impl std::fmt::Debug for StockReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockReconciler").finish_non_exhaustive()
    }
}

impl StockReconciler {
    /// Create a reconciler over the given APIs.
    #[must_use]
    pub fn new(products: Arc<dyn ProductsApi>, cart: Arc<dyn CartApi>) -> Self {
        Self { products, cart }
    }

    /// Check every line and fix the ones that ask for too much.
    pub async fn check(&self, items: &[CartItem]) -> StockCheck {
        let mut report = StockReport::default();

        for item in items {
            let product = match self.products.get_product(item.product_id).await {
                Ok(product) => product,
                Err(error) => {
                    warn!(product = %item.product_id, %error, "stock lookup failed, keeping line");
                    continue;
                }
            };

            let verdict = StockVerdict::assess(item.quantity, product.available_stock());

            debug!(item = %item.id, ?verdict, "stock verdict");

            match self.apply(item.id, verdict).await {
                Ok(()) => report.record(item, verdict),
                Err(error) => {
                    warn!(item = %item.id, %error, "stock adjustment failed");
                    report.record_unresolved(item, verdict);
                }
            }
        }

        report.into()
    }

    async fn apply(&self, item: CartItemId, verdict: StockVerdict) -> Result<(), ApiError> {
        match verdict {
            StockVerdict::Keep => Ok(()),
            StockVerdict::Remove => self.cart.remove_item(item).await,
            StockVerdict::Clamp(quantity) => self.cart.update_item(item, quantity).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::{
        api::{MockCartApi, MockProductsApi},
        test::helpers::{SHOP, make_item, make_product},
    };

    use super::*;

    fn reconciler(products: MockProductsApi, cart: MockCartApi) -> StockReconciler {
        StockReconciler::new(Arc::new(products), Arc::new(cart))
    }

    #[tokio::test]
    async fn short_line_is_clamped_and_blocks_checkout() {
        let mut products = MockProductsApi::new();
        let mut cart = MockCartApi::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Ok(make_product(10, SHOP, Some(2))));
        cart.expect_update_item()
            .once()
            .withf(|item, count| *item == CartItemId::new(1) && count.get() == 2)
            .return_once(|_, _| Ok(()));
        cart.expect_remove_item().never();

        let check = reconciler(products, cart)
            .check(&[make_item(1, 10, 5)])
            .await;

        assert!(!check.can_proceed);
        assert!(check.has_changes);
        assert_eq!(check.report.changed.len(), 1);
        assert_eq!(
            check.report.changed.first().and_then(|c| c.adjusted).map(Quantity::get),
            Some(2)
        );
    }

    #[tokio::test]
    async fn sold_out_line_is_removed() {
        let mut products = MockProductsApi::new();
        let mut cart = MockCartApi::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Ok(make_product(10, SHOP, Some(0))));
        cart.expect_remove_item()
            .once()
            .withf(|item| *item == CartItemId::new(1))
            .return_once(|_| Ok(()));

        let check = reconciler(products, cart)
            .check(&[make_item(1, 10, 1)])
            .await;

        assert!(!check.can_proceed);
        assert_eq!(check.report.removed.len(), 1);
    }

    #[tokio::test]
    async fn enough_stock_proceeds_untouched() {
        let mut products = MockProductsApi::new();
        let mut cart = MockCartApi::new();

        products
            .expect_get_product()
            .times(2)
            .returning(|id| Ok(make_product(id.get(), SHOP, None)));
        cart.expect_update_item().never();
        cart.expect_remove_item().never();

        let check = reconciler(products, cart)
            .check(&[make_item(1, 10, 5), make_item(2, 11, 1)])
            .await;

        assert!(check.can_proceed);
        assert!(!check.has_changes);
    }

    #[tokio::test]
    async fn lookup_failure_keeps_the_line() {
        let mut products = MockProductsApi::new();
        let mut cart = MockCartApi::new();

        products.expect_get_product().once().return_once(|_| {
            Err(ApiError::Rejected {
                status: StatusCode::BAD_GATEWAY,
                message: "upstream".to_string(),
            })
        });
        cart.expect_update_item().never();
        cart.expect_remove_item().never();

        let check = reconciler(products, cart)
            .check(&[make_item(1, 10, 5)])
            .await;

        assert!(check.can_proceed);
        assert_eq!(check.report, StockReport::default());
    }

    #[tokio::test]
    async fn failed_adjustment_is_unresolved() {
        let mut products = MockProductsApi::new();
        let mut cart = MockCartApi::new();

        products
            .expect_get_product()
            .once()
            .return_once(|_| Ok(make_product(10, SHOP, Some(1))));
        cart.expect_update_item().once().return_once(|_, _| {
            Err(ApiError::Rejected {
                status: StatusCode::CONFLICT,
                message: "line changed".to_string(),
            })
        });

        let check = reconciler(products, cart)
            .check(&[make_item(1, 10, 3)])
            .await;

        assert!(!check.can_proceed);
        assert!(!check.has_changes);
        assert_eq!(check.report.unresolved.len(), 1);
    }
}
