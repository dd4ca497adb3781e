//! Cart

mod errors;
mod store;
mod workflow;

pub use errors::CartError;
pub use store::CartStore;
pub use workflow::{AddOutcome, ConfirmPrompt, MockConfirmPrompt, add_to_cart};
