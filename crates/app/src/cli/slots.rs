use clap::Args;
use jiff::{Zoned, civil::Date};
use posy::prelude::*;

#[derive(Debug, Args)]
pub(crate) struct SlotsArgs {
    /// Delivery date (YYYY-MM-DD); today when omitted
    #[arg(long)]
    date: Option<Date>,
}

pub(crate) fn run(args: &SlotsArgs) -> Result<(), String> {
    let now = Zoned::now().datetime();
    let date = args.date.unwrap_or_else(|| now.date());

    if date < now.date() {
        return Err(format!("{date} is in the past"));
    }

    let slots = available_slots(date, now);

    if slots.is_empty() {
        println!("no delivery slots left on {date}");
        return Ok(());
    }

    for slot in slots {
        println!("{slot}");
    }

    Ok(())
}
