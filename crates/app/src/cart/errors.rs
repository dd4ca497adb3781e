//! Cart errors.

use thiserror::Error;

use crate::api::ApiError;

/// Errors raised while changing the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CartError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(error) => error.user_message(),
        }
    }
}
