use super::distance::Coord;
use super::geocoder::Geocoder;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};

/// A geocoded address row. One row per distinct trimmed address; rows are
/// created on first lookup and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_geocode_attempt: Option<DateTime<Utc>>,
}

impl Location {
    pub fn new(address: String, now: DateTime<Utc>) -> Self {
        Self {
            address,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
            last_geocode_attempt: None,
        }
    }

    /// Both coordinates or neither; a row with only one set is unreachable
    /// through this API.
    pub fn coords(&self) -> Option<Coord> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coord {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    pub fn set_coords(&mut self, coord: Coord) {
        self.latitude = Some(coord.latitude);
        self.longitude = Some(coord.longitude);
    }

    /// A row needs a fresh geocode attempt when it has no coordinates, has
    /// never been attempted, or the last attempt is older than `freshness`.
    pub fn needs_geocoding(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        if self.coords().is_none() {
            return true;
        }
        match self.last_geocode_attempt {
            Some(attempted_at) => now - attempted_at >= freshness,
            None => true,
        }
    }
}

/// Address-keyed persistent store of [`Location`] rows, backed by a JSON
/// file when opened from one. Upserts are last-write-wins per address.
///
/// On disk this is a bare address-to-row JSON object.
#[derive(Default)]
pub struct LocationStore {
    locations: HashMap<String, Location>,
    path: Option<PathBuf>,
}

impl LocationStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let locations = if path.as_ref().exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            locations,
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        let data = serde_json::to_string_pretty(&self.locations)?;
        fs::write(path, data)
    }

    pub fn get(&self, address: &str) -> Option<&Location> {
        self.locations.get(address)
    }

    pub fn upsert(&mut self, location: Location) {
        self.locations.insert(location.address.clone(), location);
    }

    /// Flushes to the backing file, if any. IO failures are logged and
    /// swallowed; the in-memory map stays authoritative for this process.
    pub fn persist(&self) {
        if let Some(path) = &self.path {
            if let Err(err) = self.save_to_file(path) {
                log::error!("Failed to persist location store to {:?}: {}", path, err);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Caching layer in front of a [`Geocoder`]: keeps one [`Location`] per
/// distinct trimmed address and re-geocodes it only when stale.
pub struct LocationCache<G> {
    store: LocationStore,
    geocoder: G,
    freshness: Duration,
}

impl<G: Geocoder> LocationCache<G> {
    pub fn new(store: LocationStore, geocoder: G) -> Self {
        Self {
            store,
            geocoder,
            freshness: Duration::days(1),
        }
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Returns the row for `address`, creating it on first sight and
    /// refreshing it per the staleness rule. Geocoder failures are logged
    /// and leave the coordinates as they were; a row is always returned
    /// for a non-blank address.
    pub fn get_or_refresh(&mut self, address: &str) -> Option<Location> {
        let normalized = address.trim();
        if normalized.is_empty() {
            return None;
        }

        let now = Utc::now();
        let mut location = match self.store.get(normalized) {
            Some(existing) => existing.clone(),
            None => Location::new(normalized.to_string(), now),
        };

        if location.needs_geocoding(now, self.freshness) {
            match self.geocoder.resolve(normalized) {
                Some(coord) => {
                    log::debug!("Resolved \"{}\" to {:?}", normalized, coord);
                    location.set_coords(coord);
                }
                None => {
                    log::warn!(
                        "Address \"{}\" not resolved; keeping previous coordinates",
                        normalized
                    );
                }
            }
            location.last_geocode_attempt = Some(now);
            location.updated_at = now;
            self.store.upsert(location.clone());
            self.store.persist();
        }

        Some(location)
    }

    /// Per-address application of [`get_or_refresh`](Self::get_or_refresh),
    /// skipping blank addresses. No ordering guarantee.
    pub fn get_or_refresh_many<'a, I>(&mut self, addresses: I) -> Vec<Location>
    where
        I: IntoIterator<Item = &'a str>,
    {
        addresses
            .into_iter()
            .filter_map(|address| self.get_or_refresh(address))
            .collect()
    }
}
