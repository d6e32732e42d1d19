pub mod sdk;

pub use sdk::catalog::{matching_restaurants, MenuItem, Order, OrderItem, ProductId, Restaurant};
pub use sdk::config::GeocoderConfig;
pub use sdk::geo::cache::{Location, LocationCache, LocationStore};
pub use sdk::geo::distance::{distance_km, great_circle_km, round_km, Coord};
pub use sdk::geo::geocoder::{Geocoder, YandexGeocoder};
pub use sdk::ranking::{match_and_rank, rank, RankedRestaurant, Ranking};
