use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::error::Result;
use crate::features::pharmacies::models::{Coordinates, OpeningHoursEntry, Pharmacy};
use crate::features::pharmacies::services::opening_hours::resolve_for_date;
use crate::features::pharmacies::services::proximity;
use crate::features::pharmacies::store::{GeoNearQuery, PharmacyFilter, PharmacyStore};

/// Validated guard-duty request
#[derive(Debug, Clone, PartialEq)]
pub struct GuardDutyQuery {
    pub point: Coordinates,
    pub date: NaiveDate,
    pub max_distance_meters: f64,
}

/// An on-duty pharmacy near the query point
#[derive(Debug, Clone, PartialEq)]
pub struct GuardDutyResult {
    pub pharmacy: Pharmacy,
    pub distance_meters: f64,
    /// Slot for the query date's weekday, if the pharmacy has one
    pub opening_hours: Option<OpeningHoursEntry>,
}

/// Finds on-duty pharmacies around a point, nearest first
pub struct GuardDutyPlanner {
    store: Arc<dyn PharmacyStore>,
}

impl GuardDutyPlanner {
    pub fn new(store: Arc<dyn PharmacyStore>) -> Self {
        Self { store }
    }

    pub async fn plan(&self, query: &GuardDutyQuery) -> Result<Vec<GuardDutyResult>> {
        let geo_query = GeoNearQuery {
            point: query.point,
            max_distance_meters: query.max_distance_meters,
            filter: PharmacyFilter::on_duty(),
        };

        let mut candidates = proximity::geo_near(self.store.as_ref(), &geo_query).await?;

        // Stores may ignore the filter on their native geo path
        candidates.retain(|c| geo_query.filter.matches(&c.pharmacy));
        proximity::sort_by_distance(&mut candidates);

        let results: Vec<GuardDutyResult> = candidates
            .into_iter()
            .map(|candidate| {
                let opening_hours =
                    resolve_for_date(&candidate.pharmacy.opening_hours, query.date).cloned();
                GuardDutyResult {
                    pharmacy: candidate.pharmacy,
                    distance_meters: candidate.distance_meters,
                    opening_hours,
                }
            })
            .collect();

        tracing::debug!(
            "Guard-duty query at ({}, {}) on {} matched {} pharmacies",
            query.point.latitude,
            query.point.longitude,
            query.date,
            results.len()
        );

        Ok(results)
    }
}
