use clap::Args;
use jiff::{Zoned, civil::Date};
use posy::prelude::*;
use posy_app::{
    config::AppConfig,
    promo::PromoOutcome,
    storefront::{OpenOutcome, Storefront, StorefrontError},
};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct PlaceOrderArgs {
    /// Contact phone to share; the saved one is used when omitted
    #[arg(long)]
    phone: Option<String>,

    /// Delivery address; the saved one is used when omitted
    #[arg(long)]
    address: Option<String>,

    /// Resolve the address through the geocoder instead of using it as typed
    #[arg(long)]
    geocode: bool,

    /// Latitude of a map pin to deliver to; replaces the address
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// Longitude of a map pin to deliver to
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// Recipient name; the saved one is used when omitted
    #[arg(long)]
    recipient: Option<String>,

    /// Note for the courier
    #[arg(long)]
    comment: Option<String>,

    /// Delivery date (YYYY-MM-DD); today when omitted
    #[arg(long)]
    date: Option<Date>,

    /// Delivery slot, e.g. 15:00-18:00; the earliest open slot when omitted
    #[arg(long)]
    slot: Option<TimeSlot>,

    /// Promo code to apply
    #[arg(long)]
    promo: Option<String>,
}

pub(crate) async fn run(args: PlaceOrderArgs, config: &AppConfig) -> Result<(), String> {
    let ctx = super::context(config, args.phone.clone()).await?;
    let mut storefront = Storefront::new(ctx);

    place_order(&mut storefront, args)
        .await
        .map_err(|error| error.user_message())
}

async fn place_order(
    storefront: &mut Storefront,
    args: PlaceOrderArgs,
) -> Result<(), StorefrontError> {
    if let OpenOutcome::CartChanged(_) = storefront.open_checkout().await? {
        println!("your cart was updated to match stock; review it and try again");
        return Ok(());
    }

    storefront.request_contact().await?;

    let now = Zoned::now().datetime();

    storefront.advance(now)?;

    if let Some(address) = &args.address {
        if args.geocode {
            let found = storefront.apply_geocode(address).await?;
            println!("address: {}", found.address);
        } else {
            storefront.checkout_mut()?.set_address(address);
        }
    }

    if let (Some(latitude), Some(longitude)) = (args.latitude, args.longitude) {
        let found = storefront.apply_location(latitude, longitude).await?;
        println!("address: {}", found.address);
    }

    let state = storefront.checkout_mut()?;

    if let Some(recipient) = &args.recipient {
        state.set_recipient_name(recipient);
    }

    if let Some(comment) = &args.comment {
        state.set_delivery_comment(comment);
    }

    storefront.advance(now)?;

    let state = storefront.checkout_mut()?;
    state.select_date(args.date.unwrap_or_else(|| now.date()), now)?;

    let slot = match args.slot {
        Some(slot) => slot,
        None => state
            .available_slots(now)
            .first()
            .copied()
            .ok_or(CheckoutError::SlotMissing)?,
    };

    state.select_time(slot, now)?;
    storefront.advance(now)?;

    if let Some(code) = &args.promo {
        if let PromoOutcome::Rejected(_) = storefront.apply_promo(code).await? {
            println!("continuing without promo code");
        }
    }

    print_totals(&storefront.totals()?);

    let order = storefront.submit(now).await?;

    println!("order #{} placed", order.id);

    Ok(())
}

fn rub(amount: Decimal) -> String {
    format_rub(amount).unwrap_or_else(|_| amount.to_string())
}

fn print_totals(totals: &OrderTotals) {
    println!("subtotal: {}", rub(totals.subtotal));

    if !totals.promo_discount.is_zero() {
        println!("promo: -{}", rub(totals.promo_discount));
    }

    println!("delivery: {}", rub(totals.delivery_fee));
    println!("total: {}", rub(totals.total));
}
