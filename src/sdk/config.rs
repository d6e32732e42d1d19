use std::env;
use std::error::Error;

/// Geocoder settings read from the environment at process start. A missing
/// API key is fatal here; nothing downstream can recover from it.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl GeocoderConfig {
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        let api_key = env::var("YANDEX_GEOCODER_APIKEY")
            .map_err(|_| "YANDEX_GEOCODER_APIKEY is not set")?;
        let base_url = env::var("YANDEX_GEOCODER_URL").ok();
        Ok(Self {
            api_key,
            base_url,
        })
    }
}
