//! Free-text filtering over the record set.
//!
//! Matching is a case-insensitive substring test against the string form of every
//! attribute, identifier and timestamps included. There is no ranking: results keep
//! store order, which is also the display order.

use crate::model::Vehicle;
use crate::store::{StorageBackend, VehicleStore};

/// True when any attribute of `vehicle` contains `query_lower`.
/// `query_lower` must already be lowercased.
pub fn matches_query(vehicle: &Vehicle, query_lower: &str) -> bool {
    vehicle
        .attribute_strings()
        .iter()
        .any(|value| value.to_lowercase().contains(query_lower))
}

/// The filtered view for `query`.
///
/// A blank query returns `all` unchanged; anything else is answered by the store.
pub fn filter_vehicles<B: StorageBackend>(
    store: &VehicleStore<B>,
    all: &[Vehicle],
    query: &str,
) -> Vec<Vehicle> {
    if query.trim().is_empty() {
        return all.to_vec();
    }
    store.search(query)
}
