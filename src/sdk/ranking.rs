use crate::sdk::catalog::{matching_restaurants, Order, Restaurant};
use crate::sdk::geo::cache::LocationCache;
use crate::sdk::geo::distance::{distance_km, round_km, Coord};
use crate::sdk::geo::geocoder::Geocoder;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// One candidate restaurant with its distance to the delivery address.
/// Distance is absent when either endpoint could not be geocoded.
#[derive(Debug)]
pub struct RankedRestaurant<'a> {
    pub restaurant: &'a Restaurant,
    pub distance_km: Option<f64>,
    pub address_found: bool,
}

impl RankedRestaurant<'_> {
    /// Distance rounded for display. Sorting uses the unrounded value.
    pub fn display_distance_km(&self) -> Option<f64> {
        self.distance_km.map(round_km)
    }
}

/// Ranked candidates for one order, closest first, unknown-distance
/// entries last in their original candidate order.
#[derive(Debug)]
pub struct Ranking<'a> {
    pub entries: Vec<RankedRestaurant<'a>>,
    pub order_address_found: bool,
}

/// Resolves every address once through the cache, computes distances, and
/// sorts. Never drops a candidate: a restaurant whose address is unknown
/// still appears, flagged and sorted after all known distances.
pub fn rank<'a, G: Geocoder>(
    order: &Order,
    candidates: &[&'a Restaurant],
    cache: &mut LocationCache<G>,
) -> Ranking<'a> {
    let mut addresses: HashSet<&str> = candidates
        .iter()
        .map(|restaurant| restaurant.address.as_str())
        .collect();
    addresses.insert(order.address.as_str());

    let coords: HashMap<String, Option<Coord>> = cache
        .get_or_refresh_many(addresses)
        .into_iter()
        .map(|location| {
            let coord = location.coords();
            (location.address, coord)
        })
        .collect();
    let resolve = |address: &str| coords.get(address.trim()).copied().flatten();

    let origin = resolve(&order.address);

    let mut entries: Vec<RankedRestaurant<'a>> = candidates
        .iter()
        .map(|restaurant| {
            let destination = resolve(&restaurant.address);
            RankedRestaurant {
                restaurant,
                distance_km: distance_km(origin, destination),
                address_found: destination.is_some(),
            }
        })
        .collect();

    // Stable sort: known distances ascending, absent distances after them
    // in input order.
    entries.sort_by(|a, b| {
        let ka = (a.distance_km.is_none(), a.distance_km.unwrap_or(0.0));
        let kb = (b.distance_km.is_none(), b.distance_km.unwrap_or(0.0));
        ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
    });

    Ranking {
        entries,
        order_address_found: origin.is_some(),
    }
}

/// Matcher and ranking composed: everything a manager needs to assign an
/// order to a restaurant.
pub fn match_and_rank<'a, G: Geocoder>(
    order: &Order,
    catalog: &'a [Restaurant],
    cache: &mut LocationCache<G>,
) -> Ranking<'a> {
    let candidates = matching_restaurants(order, catalog);
    rank(order, &candidates, cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::geo::cache::LocationStore;

    struct ScriptedGeocoder {
        coords: HashMap<String, Coord>,
    }

    impl Geocoder for ScriptedGeocoder {
        fn resolve(&self, address: &str) -> Option<Coord> {
            self.coords.get(address).copied()
        }
    }

    fn restaurant(id: u64, name: &str, address: &str) -> Restaurant {
        Restaurant {
            id,
            name: name.to_string(),
            address: address.to_string(),
            menu: Vec::new(),
        }
    }

    fn order_at(address: &str) -> Order {
        Order {
            id: 1,
            address: address.to_string(),
            items: Vec::new(),
        }
    }

    fn cache_with(coords: &[(&str, Coord)]) -> LocationCache<ScriptedGeocoder> {
        let coords = coords
            .iter()
            .map(|(address, coord)| (address.to_string(), *coord))
            .collect();
        LocationCache::new(LocationStore::in_memory(), ScriptedGeocoder { coords })
    }

    #[test]
    fn sorts_ascending_by_distance() {
        let origin = Coord::new(55.75, 37.62);
        let mut cache = cache_with(&[
            ("origin", origin),
            ("near", Coord::new(55.76, 37.62)),
            ("far", Coord::new(56.75, 37.62)),
            ("mid", Coord::new(55.95, 37.62)),
        ]);
        let far = restaurant(1, "Far", "far");
        let near = restaurant(2, "Near", "near");
        let mid = restaurant(3, "Mid", "mid");

        let ranking = rank(&order_at("origin"), &[&far, &near, &mid], &mut cache);
        let ids: Vec<u64> = ranking.entries.iter().map(|e| e.restaurant.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(ranking.order_address_found);
    }

    #[test]
    fn unknown_addresses_sort_last_in_input_order() {
        let origin = Coord::new(55.75, 37.62);
        let mut cache = cache_with(&[("origin", origin), ("known", Coord::new(55.80, 37.62))]);
        let known = restaurant(1, "Known", "known");
        let lost_b = restaurant(2, "Lost B", "lost b");
        let lost_a = restaurant(3, "Lost A", "lost a");

        let ranking = rank(
            &order_at("origin"),
            &[&lost_b, &known, &lost_a],
            &mut cache,
        );
        let ids: Vec<u64> = ranking.entries.iter().map(|e| e.restaurant.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(ranking.entries[0].address_found);
        assert!(!ranking.entries[1].address_found);
        assert_eq!(ranking.entries[1].distance_km, None);
    }

    #[test]
    fn unresolved_order_address_flags_every_entry_absent() {
        let mut cache = cache_with(&[("known", Coord::new(55.80, 37.62))]);
        let known = restaurant(1, "Known", "known");

        let ranking = rank(&order_at("unknown origin"), &[&known], &mut cache);
        assert!(!ranking.order_address_found);
        assert_eq!(ranking.entries[0].distance_km, None);
        // The restaurant itself geocoded fine.
        assert!(ranking.entries[0].address_found);
    }

    #[test]
    fn repeated_addresses_are_resolved_once() {
        let origin = Coord::new(55.75, 37.62);
        let shared = Coord::new(55.80, 37.62);
        let mut cache = cache_with(&[("origin", origin), ("shared", shared)]);
        let first = restaurant(1, "First", "shared");
        let second = restaurant(2, "Second", "shared");

        let ranking = rank(&order_at("origin"), &[&first, &second], &mut cache);
        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(
            ranking.entries[0].distance_km,
            ranking.entries[1].distance_km
        );
        // origin + one shared restaurant address
        assert_eq!(cache.store().len(), 2);
    }

    #[test]
    fn display_distance_is_rounded() {
        let entry = RankedRestaurant {
            restaurant: &restaurant(1, "A", "a"),
            distance_km: Some(5.2961),
            address_found: true,
        };
        assert_eq!(entry.display_distance_km(), Some(5.3));
    }
}
