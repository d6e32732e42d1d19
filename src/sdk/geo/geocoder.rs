use super::distance::Coord;
use super::error::{GeocodeError, GeocoderErrorPayload};
use crate::sdk::util::rate_limit::{self, Limiter};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Resolves a free-text address to a coordinate pair.
///
/// Implementations must fail silently: every upstream problem (network,
/// bad payload, empty result set) is logged where it happens and comes
/// back to the caller as `None`.
pub trait Geocoder {
    fn resolve(&self, address: &str) -> Option<Coord>;
}

// --- Data structures for parsing geocoder responses ---

#[derive(Deserialize)]
struct GeocodeResponse {
    response: ResponseBody,
}

#[derive(Deserialize)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember")]
    feature_member: Vec<FeatureMember>,
}

#[derive(Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Deserialize)]
struct Point {
    // "lon lat", space-separated
    pos: String,
}

/// HTTP client for the Yandex geocoding API.
pub struct YandexGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
    limiter: Limiter,
}

impl YandexGeocoder {
    pub fn new(api_key: String, limiter: Limiter) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to construct HTTP client"),
            api_key,
            base_url: "https://geocode-maps.yandex.ru/1.x".to_string(),
            limiter,
        }
    }

    /// Overrides the API endpoint, for a self-hosted mirror.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn try_resolve(&self, address: &str) -> Result<Option<Coord>, GeocodeError> {
        rate_limit::wait(&self.limiter);
        log::debug!("[GEOCODER] Calling remote geocoder for \"{}\"", address);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("geocode", address),
                ("apikey", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            // Try to parse the structured error first
            if let Ok(payload) = serde_json::from_str::<GeocoderErrorPayload>(&text) {
                return Err(GeocodeError::ApiError {
                    status: payload.status_code,
                    message: payload.message,
                });
            }
            return Err(GeocodeError::RawApiError {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GeocodeResponse = serde_json::from_str(&text)?;
        match parsed.response.collection.feature_member.first() {
            // The service orders results by relevance; only the first one counts.
            Some(found) => parse_pos(&found.geo_object.point.pos).map(Some),
            None => Ok(None),
        }
    }
}

impl Geocoder for YandexGeocoder {
    fn resolve(&self, address: &str) -> Option<Coord> {
        match self.try_resolve(address) {
            Ok(Some(coord)) => Some(coord),
            Ok(None) => {
                log::warn!("No geocode results for address \"{}\"", address);
                None
            }
            Err(err) => {
                log::error!("Geocoding failed for address \"{}\": {}", address, err);
                None
            }
        }
    }
}

fn parse_pos(pos: &str) -> Result<Coord, GeocodeError> {
    let mut parts = pos.split_whitespace();
    let lon = parts.next().and_then(|p| p.parse::<f64>().ok());
    let lat = parts.next().and_then(|p| p.parse::<f64>().ok());
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Ok(Coord {
            latitude,
            longitude,
        }),
        _ => Err(GeocodeError::MalformedPoint(pos.to_string())),
    }
}
