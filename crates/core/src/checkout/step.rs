//! Checkout Steps

use std::fmt;

use crate::checkout::CheckoutError;

/// Position in the four-step checkout wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    /// Contact phone
    #[default]
    Phone,

    /// Delivery address and recipient
    Address,

    /// Delivery date and time slot
    DateTime,

    /// Order review and submission
    Confirm,
}

impl Step {
    /// One-based step number as shown to the user.
    pub const fn number(self) -> u8 {
        match self {
            Self::Phone => 1,
            Self::Address => 2,
            Self::DateTime => 3,
            Self::Confirm => 4,
        }
    }

    /// The following step, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Phone => Some(Self::Address),
            Self::Address => Some(Self::DateTime),
            Self::DateTime => Some(Self::Confirm),
            Self::Confirm => None,
        }
    }

    /// The preceding step; `None` on the first step, where going back closes
    /// checkout.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Phone => None,
            Self::Address => Some(Self::Phone),
            Self::DateTime => Some(Self::Address),
            Self::Confirm => Some(Self::DateTime),
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = CheckoutError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Phone),
            2 => Ok(Self::Address),
            3 => Ok(Self::DateTime),
            4 => Ok(Self::Confirm),
            other => Err(CheckoutError::UnknownStep(other)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Phone => "phone",
            Self::Address => "address",
            Self::DateTime => "date and time",
            Self::Confirm => "confirmation",
        };

        write!(f, "step {} ({name})", self.number())
    }
}
