//! Promo Codes
//!
//! The backend decides whether a code is valid and how much it is worth. The
//! client only needs to know what kind of discount came back so it can apply
//! it to the totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discount type value that waives the delivery fee.
pub const FREE_DELIVERY: &str = "free_delivery";

/// How an applied promo changes the order totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountKind {
    /// The delivery fee is dropped; the discount amount is ignored.
    FreeDelivery,

    /// The discount amount comes off the subtotal. Carries the backend's
    /// discount type label (`"fixed"`, `"percent"`, ...).
    Amount(String),
}

impl DiscountKind {
    /// Interpret the backend's discount type. Missing or blank types carry no
    /// discount at all.
    pub fn from_label(label: Option<&str>) -> Option<Self> {
        match label.map(str::trim) {
            None | Some("") => None,
            Some(FREE_DELIVERY) => Some(Self::FreeDelivery),
            Some(other) => Some(Self::Amount(other.to_string())),
        }
    }

    /// Label sent back to the backend with the order.
    pub fn label(&self) -> &str {
        match self {
            Self::FreeDelivery => FREE_DELIVERY,
            Self::Amount(label) => label,
        }
    }
}

/// Backend answer to a promo validation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoValidation {
    /// Whether the code can be used for this order
    pub valid: bool,

    /// Discount worth, in roubles
    #[serde(default)]
    pub discount_amount: Option<Decimal>,

    /// Discount type label
    #[serde(default)]
    pub discount_type: Option<String>,

    /// Human readable explanation, mostly present when the code is rejected
    #[serde(default)]
    pub message: Option<String>,
}

/// A promo code accepted for the current checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    /// The code as entered by the user
    pub code: String,

    /// Amount taken off the subtotal for [`DiscountKind::Amount`]
    pub discount_amount: Decimal,

    /// Discount kind
    pub kind: DiscountKind,
}

impl AppliedPromo {
    /// Build an applied promo from a successful validation. Returns `None` when
    /// the validation was negative or carried no usable discount type.
    pub fn from_validation(code: &str, validation: &PromoValidation) -> Option<Self> {
        if !validation.valid {
            return None;
        }

        let kind = DiscountKind::from_label(validation.discount_type.as_deref())?;

        Some(Self {
            code: code.trim().to_string(),
            discount_amount: validation
                .discount_amount
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO),
            kind,
        })
    }

    /// Whether this promo waives the delivery fee.
    pub fn waives_delivery(&self) -> bool {
        self.kind == DiscountKind::FreeDelivery
    }
}
