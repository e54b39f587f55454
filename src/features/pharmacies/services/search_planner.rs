use std::sync::Arc;

use crate::core::error::Result;
use crate::features::pharmacies::models::{Coordinates, Pharmacy};
use crate::features::pharmacies::services::proximity;
use crate::features::pharmacies::store::{GeoNearQuery, PharmacyFilter, PharmacyStore};

/// Optional proximity stage of a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNear {
    pub point: Coordinates,
    pub max_distance_meters: f64,
}

/// Validated search request. Both parts are optional and combine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub near: Option<SearchNear>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub pharmacy: Pharmacy,
    /// Present only when the search had a proximity stage
    pub distance_meters: Option<f64>,
}

/// Free-text and proximity search over all pharmacies
pub struct SearchPlanner {
    store: Arc<dyn PharmacyStore>,
}

impl SearchPlanner {
    pub fn new(store: Arc<dyn PharmacyStore>) -> Self {
        Self { store }
    }

    /// With a proximity stage the results are nearest first and carry the
    /// distance computed by that stage. Without one they come back in store order.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let filter = PharmacyFilter {
            on_duty: None,
            text: query.text.clone(),
        };

        match query.near {
            Some(near) => {
                let geo_query = GeoNearQuery {
                    point: near.point,
                    max_distance_meters: near.max_distance_meters,
                    filter,
                };
                let candidates = proximity::geo_near(self.store.as_ref(), &geo_query).await?;
                Ok(candidates
                    .into_iter()
                    .map(|c| SearchResult {
                        pharmacy: c.pharmacy,
                        distance_meters: Some(c.distance_meters),
                    })
                    .collect())
            }
            None => {
                let pharmacies = self.store.find(&filter).await?;
                Ok(pharmacies
                    .into_iter()
                    .map(|pharmacy| SearchResult {
                        pharmacy,
                        distance_meters: None,
                    })
                    .collect())
            }
        }
    }
}
