//! Checkout
//!
//! Checkout is a linear four-step wizard. Moving forward is gated by the
//! current step's validation; moving back is always allowed, and going back
//! from the first step closes checkout altogether.

use jiff::civil::Date;
use thiserror::Error;

use crate::slots::TimeSlot;

mod contact;
mod state;
mod step;

pub use contact::SavedContact;
pub use state::{Back, CheckoutState, MIN_PHONE_LENGTH};
pub use step::Step;

/// Validation failures that keep checkout on its current step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// No phone number was provided.
    #[error("enter a contact phone number")]
    PhoneMissing,

    /// The phone number is shorter than [`MIN_PHONE_LENGTH`].
    #[error("phone number must be at least {MIN_PHONE_LENGTH} characters")]
    PhoneTooShort,

    /// No delivery address was provided.
    #[error("enter a delivery address")]
    AddressMissing,

    /// No recipient name was provided.
    #[error("enter the recipient's name")]
    RecipientMissing,

    /// The address is outside the shop's city.
    #[error("this shop only delivers within {0}")]
    AddressOutsideCity(String),

    /// No delivery date was selected.
    #[error("choose a delivery date")]
    DateMissing,

    /// The selected date is before today.
    #[error("delivery date {0} is in the past")]
    DateInPast(Date),

    /// No delivery slot was selected.
    #[error("choose a delivery time")]
    SlotMissing,

    /// The selected slot has already passed for the selected date.
    #[error("delivery time {0} is no longer available")]
    SlotUnavailable(TimeSlot),

    /// A step number outside 1..=4.
    #[error("there is no checkout step {0}")]
    UnknownStep(u8),

    /// Forward jumps must go through [`CheckoutState::advance`].
    #[error("cannot jump forward from {from} to {to}")]
    ForwardJump {
        /// Current step
        from: Step,
        /// Requested step
        to: Step,
    },

    /// The final step has no next step; submit the order instead.
    #[error("checkout is already on the confirmation step")]
    AlreadyConfirming,

    /// There is nothing to order.
    #[error("there are no items to order")]
    NoItems,
}
