use async_trait::async_trait;
use clap::{Args, Subcommand};
use posy::prelude::*;
use posy_app::{
    cart::{AddOutcome, CartStore, ConfirmPrompt, add_to_cart},
    config::AppConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,
    /// Add a product
    Add(AddArgs),
    /// Change a line's quantity; zero or less removes it
    Set(SetArgs),
    /// Remove a line
    Remove(LineArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product ID
    #[arg(long)]
    product: i64,

    /// Units to add
    #[arg(long, default_value_t = Quantity::ONE)]
    quantity: Quantity,

    /// Replace a cart from another shop without asking
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Cart line ID
    #[arg(long)]
    item: i64,

    /// New quantity
    #[arg(long, allow_negative_numbers = true)]
    quantity: QuantityUpdate,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Cart line ID
    #[arg(long)]
    item: i64,
}

/// Asks on the terminal before replacing another shop's cart.
struct TerminalPrompt {
    assume_yes: bool,
}

#[async_trait]
impl ConfirmPrompt for TerminalPrompt {
    async fn confirm_replace(&self, current: ShopId, incoming: ShopId) -> bool {
        if self.assume_yes {
            return true;
        }

        eprintln!(
            "Your cart holds products from shop {current}. Clear it and add from shop {incoming}? [y/N]"
        );

        let mut answer = String::new();

        match BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await
        {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

pub(crate) async fn run(command: CartCommand, config: &AppConfig) -> Result<(), String> {
    let ctx = super::context(config, None).await?;
    let mut store = CartStore::new(ctx.cart.clone());

    let cart = match command.command {
        CartSubcommand::Show => store.load().await,
        CartSubcommand::Add(args) => {
            let product = ctx
                .products
                .get_product(ProductId::new(args.product))
                .await
                .map_err(|error| error.user_message())?;

            let prompt = TerminalPrompt {
                assume_yes: args.yes,
            };

            let outcome = add_to_cart(&mut store, &product, args.quantity, &prompt)
                .await
                .map_err(|error| error.user_message())?;

            match outcome {
                AddOutcome::Added => println!("added {}", product.name),
                AddOutcome::Replaced => println!("cart replaced with {}", product.name),
                AddOutcome::Declined => println!("cart left unchanged"),
            }

            Ok(store.cart())
        }
        CartSubcommand::Set(args) => {
            store
                .update_quantity(CartItemId::new(args.item), args.quantity)
                .await
        }
        CartSubcommand::Remove(args) => store.remove(CartItemId::new(args.item)).await,
        CartSubcommand::Clear => store.clear().await,
    }
    .map_err(|error| error.user_message())?;

    print_cart(cart)
}

fn print_cart(cart: &Cart) -> Result<(), String> {
    if cart.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    for item in cart.items() {
        println!(
            "#{} {} x{} @ {}",
            item.id,
            item.product_name,
            item.quantity,
            format_rub(item.effective_price()).map_err(|error| error.to_string())?
        );
    }

    println!(
        "subtotal: {}",
        format_rub(cart.subtotal()).map_err(|error| error.to_string())?
    );

    Ok(())
}
