use clap::{Parser, Subcommand};
use foodcart::sdk::util::{log::init_logging, rate_limit::geocode_limiter};
use foodcart::{
    match_and_rank, GeocoderConfig, LocationCache, LocationStore, Order, Restaurant,
    YandexGeocoder,
};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Back-office tooling for the food delivery service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the persistent location store
    #[arg(long, default_value = "locations.json")]
    cache: PathBuf,

    /// Path to the exported orders file
    #[arg(long, default_value = "orders.json")]
    orders: PathBuf,

    /// Path to the exported restaurant catalog file
    #[arg(long, default_value = "restaurants.json")]
    restaurants: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geocode every address referenced by current orders and restaurants
    UpdateLocations,
    /// Match and rank restaurants for one order, closest first
    Rank {
        /// Order id to assign
        #[arg(long)]
        order: u64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = GeocoderConfig::from_env()?;
    let mut geocoder = YandexGeocoder::new(config.api_key, geocode_limiter());
    if let Some(base_url) = config.base_url {
        geocoder = geocoder.with_base_url(base_url);
    }

    let store = LocationStore::load_from_file(&cli.cache)?;
    let mut cache = LocationCache::new(store, geocoder);

    let orders: Vec<Order> = load_json(&cli.orders)?;
    let restaurants: Vec<Restaurant> = load_json(&cli.restaurants)?;
    log::info!(
        "Loaded {} orders and {} restaurants",
        orders.len(),
        restaurants.len()
    );

    match cli.command {
        Command::UpdateLocations => {
            let addresses: HashSet<&str> = orders
                .iter()
                .map(|order| order.address.as_str())
                .chain(
                    restaurants
                        .iter()
                        .map(|restaurant| restaurant.address.as_str()),
                )
                .collect();
            log::info!("Found {} distinct addresses to geocode", addresses.len());

            let locations = cache.get_or_refresh_many(addresses);
            let resolved = locations
                .iter()
                .filter(|location| location.coords().is_some())
                .count();
            log::info!(
                "Updated {} locations ({} resolved, {} not found)",
                locations.len(),
                resolved,
                locations.len() - resolved
            );
        }
        Command::Rank { order } => {
            let order = orders
                .iter()
                .find(|candidate| candidate.id == order)
                .ok_or_else(|| format!("Unknown order id: {}", order))?;

            let ranking = match_and_rank(order, &restaurants, &mut cache);

            println!("Order #{} -> {}", order.id, order.address);
            if !ranking.order_address_found {
                println!("  (delivery address not found)");
            }
            if ranking.entries.is_empty() {
                println!("  no restaurant can prepare the whole order");
            }
            for entry in &ranking.entries {
                match entry.display_distance_km() {
                    Some(km) => println!("  {:>8.2} km  {}", km, entry.restaurant.name),
                    None => println!("  not found  {}", entry.restaurant.name),
                }
            }
        }
    }

    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))?;
    Ok(serde_json::from_str(&data)?)
}
