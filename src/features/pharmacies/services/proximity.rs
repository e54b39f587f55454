//! Proximity stage shared by the guard-duty and search planners.
//!
//! Index-backed stores answer the stage in a single round trip. Stores
//! without a spatial index fall back to a filtered scan ranked in process.

use crate::core::error::Result;
use crate::features::pharmacies::models::{Coordinates, Pharmacy};
use crate::features::pharmacies::services::distance::distance_meters;
use crate::features::pharmacies::store::{GeoCandidate, GeoNearQuery, PharmacyStore};

pub async fn geo_near(store: &dyn PharmacyStore, query: &GeoNearQuery) -> Result<Vec<GeoCandidate>> {
    if store.capabilities().geo_index {
        return store.geo_near(query).await;
    }

    tracing::debug!(
        "Store has no geo index, ranking ({}, {}) within {}m by linear scan",
        query.point.latitude,
        query.point.longitude,
        query.max_distance_meters
    );
    let pharmacies = store.find(&query.filter).await?;
    Ok(rank_by_distance(pharmacies, query))
}

/// Annotate, drop everything outside the radius, sort nearest first.
///
/// Distances are measured to the derived `location` point, the same field a
/// spatial index would cover. `filter` is not re-applied here.
pub fn rank_by_distance(pharmacies: Vec<Pharmacy>, query: &GeoNearQuery) -> Vec<GeoCandidate> {
    let mut candidates: Vec<GeoCandidate> = pharmacies
        .into_iter()
        .map(|pharmacy| {
            let position = Coordinates {
                latitude: pharmacy.location.latitude(),
                longitude: pharmacy.location.longitude(),
            };
            GeoCandidate {
                distance_meters: distance_meters(&query.point, &position),
                pharmacy,
            }
        })
        .filter(|c| c.distance_meters <= query.max_distance_meters)
        .collect();

    sort_by_distance(&mut candidates);
    candidates
}

/// Stable ascending sort on distance
pub fn sort_by_distance(candidates: &mut [GeoCandidate]) {
    candidates.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
}
