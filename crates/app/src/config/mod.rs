//! Client configuration

use std::path::PathBuf;

use clap::Args;
use posy::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;

pub use api::ApiArgs;
pub use checkout::CheckoutArgs;
pub use logging::{LogFormat, LoggingConfig};

mod api;
mod checkout;
mod logging;

/// Errors raised while turning settings into runtime values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The city alias file could not be read.
    #[error("failed to read city aliases from {path}")]
    AliasFile {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The city alias file is malformed.
    #[error("invalid city alias table")]
    Aliases(#[from] CityAliasError),

    /// No identity was configured for the backend.
    #[error("POSY_INIT_DATA (or --init-data) must be set")]
    MissingInitData,

    /// The delivery fee is negative.
    #[error("delivery fee cannot be negative, got {0}")]
    NegativeFee(Decimal),
}

/// Everything the client needs to talk to the backend and run checkout.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiArgs,

    /// Checkout settings.
    #[command(flatten)]
    pub checkout: CheckoutArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
