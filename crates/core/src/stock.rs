//! Stock Checks
//!
//! Before checkout every cart line is compared against the seller's current
//! stock. Lines for sold-out products are dropped, lines asking for more than
//! is left are clamped, and the user is shown what changed before being let
//! through.

use crate::{cart::CartItem, ids::CartItemId, quantity::Quantity};

/// What should happen to one cart line given the available stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockVerdict {
    /// Enough stock, or stock is not tracked.
    Keep,

    /// Sold out; the line must go.
    Remove,

    /// Not enough stock; the line must shrink to this quantity.
    Clamp(Quantity),
}

impl StockVerdict {
    /// Compare a requested quantity against available stock. `None` means the
    /// seller does not track stock for the product.
    pub fn assess(requested: Quantity, available: Option<u32>) -> Self {
        match available {
            None => Self::Keep,
            Some(0) => Self::Remove,
            Some(available) if available < requested.get() => {
                Quantity::new(available).map_or(Self::Remove, Self::Clamp)
            }
            Some(_) => Self::Keep,
        }
    }
}

/// One line the check touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    /// Cart line ID
    pub item_id: CartItemId,

    /// Product display name
    pub product_name: String,

    /// Quantity the user asked for
    pub requested: Quantity,

    /// Quantity the line now has; `None` when the line was removed
    pub adjusted: Option<Quantity>,
}

impl StockChange {
    /// Describe a change to `item` under `verdict`.
    pub fn new(item: &CartItem, verdict: StockVerdict) -> Self {
        Self {
            item_id: item.id,
            product_name: item.product_name.clone(),
            requested: item.quantity,
            adjusted: match verdict {
                StockVerdict::Clamp(quantity) => Some(quantity),
                StockVerdict::Keep => Some(item.quantity),
                StockVerdict::Remove => None,
            },
        }
    }
}

/// Outcome of checking a whole cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockReport {
    /// Lines removed because the product sold out
    pub removed: Vec<StockChange>,

    /// Lines clamped to the available stock
    pub changed: Vec<StockChange>,

    /// Lines short on stock whose adjustment could not be saved
    pub unresolved: Vec<StockChange>,
}

impl StockReport {
    /// Record an applied adjustment.
    pub fn record(&mut self, item: &CartItem, verdict: StockVerdict) {
        match verdict {
            StockVerdict::Keep => {}
            StockVerdict::Remove => self.removed.push(StockChange::new(item, verdict)),
            StockVerdict::Clamp(_) => self.changed.push(StockChange::new(item, verdict)),
        }
    }

    /// Record an adjustment the backend did not accept.
    pub fn record_unresolved(&mut self, item: &CartItem, verdict: StockVerdict) {
        self.unresolved.push(StockChange::new(item, verdict));
    }

    /// Whether any line was removed or clamped.
    pub fn has_changes(&self) -> bool {
        !self.removed.is_empty() || !self.changed.is_empty()
    }

    /// Whether checkout may start: nothing changed and nothing is left short.
    pub fn can_proceed(&self) -> bool {
        !self.has_changes() && self.unresolved.is_empty()
    }

    /// Plain-text summary for the user; empty when there is nothing to report.
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        if !self.removed.is_empty() {
            summary.push_str("Sold out and removed from your cart:\n");

            for change in &self.removed {
                summary.push_str(&format!("  - {}\n", change.product_name));
            }
        }

        if !self.changed.is_empty() {
            summary.push_str("Quantity reduced to what is in stock:\n");

            for change in &self.changed {
                let adjusted = change.adjusted.map_or(0, Quantity::get);
                summary.push_str(&format!(
                    "  - {}: {} -> {adjusted}\n",
                    change.product_name, change.requested
                ));
            }
        }

        if !self.unresolved.is_empty() {
            summary.push_str("Not enough stock, please adjust manually:\n");

            for change in &self.unresolved {
                summary.push_str(&format!("  - {}\n", change.product_name));
            }
        }

        summary
    }
}
