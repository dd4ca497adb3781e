use std::sync::Arc;

use clap::{Parser, Subcommand};
use posy_app::{
    config::{AppConfig, LoggingConfig},
    context::AppContext,
    notify::ConsoleNotifier,
    platform::ConsoleBridge,
};

mod cart;
mod checkout;
mod geocode;
mod slots;

#[derive(Debug, Parser)]
#[command(name = "posy", about = "Posy marketplace client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart(cart::CartCommand),
    /// List delivery slots still open for a date
    Slots(slots::SlotsArgs),
    /// Check out the cart and place an order
    Checkout(checkout::PlaceOrderArgs),
    /// Look up an address
    Geocode(geocode::GeocodeArgs),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.config.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(command, &self.config).await,
            Commands::Slots(args) => slots::run(&args),
            Commands::Checkout(args) => checkout::run(args, &self.config).await,
            Commands::Geocode(args) => geocode::run(args, &self.config).await,
        }
    }
}

/// Context for commands that talk to the backend. `phone` is what the console
/// shares when checkout asks for the user's contact.
async fn context(config: &AppConfig, phone: Option<String>) -> Result<AppContext, String> {
    AppContext::from_config(
        config,
        Arc::new(ConsoleBridge::new(phone)),
        Arc::new(ConsoleNotifier),
    )
    .await
    .map_err(|error| format!("failed to start: {}", error_chain(&error)))
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
