use clap::Args;
use posy_app::config::AppConfig;

#[derive(Debug, Args)]
pub(crate) struct GeocodeArgs {
    /// Free-text address to resolve
    #[arg(long)]
    query: String,
}

pub(crate) async fn run(args: GeocodeArgs, config: &AppConfig) -> Result<(), String> {
    let ctx = super::context(config, None).await?;

    let found = ctx
        .geocode
        .forward(&args.query)
        .await
        .map_err(|error| error.user_message())?;

    println!("address: {}", found.address);
    println!("latitude: {}", found.latitude);
    println!("longitude: {}", found.longitude);

    if let Some(city) = found.city {
        println!("city: {city}");
    }

    Ok(())
}
