//! Pharmacy record store.
//!
//! The discovery engine only reads through [`PharmacyStore`]; the CRUD
//! service uses the write half. Two implementations exist:
//!
//! - [`PgPharmacyStore`]: PostgreSQL + PostGIS, spatial index on the derived
//!   `location` column, one round trip per proximity query.
//! - `InMemoryPharmacyStore` (tests only): a `Vec` behind a lock that can
//!   advertise or hide geo support, so both planner paths get exercised.

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::InMemoryPharmacyStore;
pub use postgres::PgPharmacyStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::pharmacies::models::{
    Coordinates, NewPharmacy, Pharmacy, PharmacyChanges,
};

/// What the backing store can do natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// The store answers [`PharmacyStore::geo_near`] from a 2-D sphere index
    pub geo_index: bool,
}

/// Non-geo predicates shared by every read path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PharmacyFilter {
    pub on_duty: Option<bool>,
    /// Literal, case-insensitive substring over name, address, city and services
    pub text: Option<String>,
}

impl PharmacyFilter {
    pub fn on_duty() -> Self {
        Self {
            on_duty: Some(true),
            text: None,
        }
    }

    pub fn matches(&self, pharmacy: &Pharmacy) -> bool {
        if let Some(on_duty) = self.on_duty {
            if pharmacy.is_on_duty != on_duty {
                return false;
            }
        }

        match self.text.as_deref() {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
                contains(&pharmacy.name)
                    || contains(&pharmacy.detailed_address)
                    || contains(&pharmacy.city)
                    || pharmacy.services.iter().any(|s| contains(s))
            }
        }
    }
}

/// Proximity query: spherical metric, radius in meters
#[derive(Debug, Clone, PartialEq)]
pub struct GeoNearQuery {
    pub point: Coordinates,
    pub max_distance_meters: f64,
    pub filter: PharmacyFilter,
}

/// A record annotated with its geodesic distance from the query point
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCandidate {
    pub pharmacy: Pharmacy,
    pub distance_meters: f64,
}

#[async_trait]
pub trait PharmacyStore: Send + Sync {
    fn capabilities(&self) -> StoreCapabilities;

    /// Records within `max_distance_meters` of `point` that pass `filter`,
    /// nearest first.
    async fn geo_near(&self, query: &GeoNearQuery) -> Result<Vec<GeoCandidate>>;

    /// Records passing `filter`, in store order.
    async fn find(&self, filter: &PharmacyFilter) -> Result<Vec<Pharmacy>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>>;

    /// Case-insensitive email lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<Pharmacy>>;

    async fn insert(&self, pharmacy: NewPharmacy) -> Result<Pharmacy>;

    async fn update(&self, id: Uuid, changes: PharmacyChanges) -> Result<Option<Pharmacy>>;

    /// Returns `false` when no record had this id
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn set_on_duty(&self, id: Uuid, on_duty: bool) -> Result<Option<Pharmacy>>;
}
