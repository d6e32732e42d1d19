pub mod cache;
pub mod distance;
pub mod error;
pub mod geocoder;

pub use cache::{Location, LocationCache, LocationStore};
pub use distance::{distance_km, great_circle_km, round_km, Coord};
pub use error::GeocodeError;
pub use geocoder::{Geocoder, YandexGeocoder};
