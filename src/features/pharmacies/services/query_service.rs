use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use uuid::Uuid;

use crate::core::config::GeoQueryConfig;
use crate::core::error::{AppError, Result};
use crate::features::pharmacies::dtos::{
    GuardDutyQueryParams, GuardDutyResultDto, PharmacyResponseDto, PharmacySearchResultDto,
    SearchQueryParams,
};
use crate::features::pharmacies::models::Coordinates;
use crate::features::pharmacies::services::guard_duty_planner::{GuardDutyPlanner, GuardDutyQuery};
use crate::features::pharmacies::services::search_planner::{
    SearchNear, SearchPlanner, SearchQuery,
};
use crate::features::pharmacies::store::{PharmacyFilter, PharmacyStore};
use crate::shared::constants::MAX_SEARCH_QUERY_LENGTH;
use crate::shared::types::ListResponse;

/// Blank strings count as absent
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_degrees(name: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{} must be a decimal number", name)))
}

fn parse_point(latitude: &str, longitude: &str) -> Result<Coordinates> {
    let latitude = parse_degrees("latitude", latitude)?;
    let longitude = parse_degrees("longitude", longitude)?;
    Coordinates::try_new(latitude, longitude).map_err(|e| AppError::Validation(e.to_string()))
}

fn required_point(latitude: Option<&str>, longitude: Option<&str>) -> Result<Coordinates> {
    let latitude = non_blank(latitude)
        .ok_or_else(|| AppError::Validation("latitude is required".to_string()))?;
    let longitude = non_blank(longitude)
        .ok_or_else(|| AppError::Validation("longitude is required".to_string()))?;
    parse_point(latitude, longitude)
}

fn optional_point(latitude: Option<&str>, longitude: Option<&str>) -> Result<Option<Coordinates>> {
    match (non_blank(latitude), non_blank(longitude)) {
        (None, None) => Ok(None),
        (Some(latitude), Some(longitude)) => parse_point(latitude, longitude).map(Some),
        _ => Err(AppError::Validation(
            "latitude and longitude must be supplied together".to_string(),
        )),
    }
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp taken at its own calendar date.
/// Absent means today on the server clock.
fn parse_date(value: Option<&str>) -> Result<NaiveDate> {
    let Some(value) = non_blank(value) else {
        return Ok(Local::now().date_naive());
    };

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .ok_or_else(|| {
            AppError::Validation(
                "date must be an ISO date (YYYY-MM-DD) or RFC 3339 timestamp".to_string(),
            )
        })
}

fn parse_max_distance(value: Option<&str>, geo: &GeoQueryConfig) -> Result<f64> {
    let Some(value) = non_blank(value) else {
        return Ok(f64::from(geo.default_max_distance_meters));
    };

    let meters = value
        .parse::<u32>()
        .ok()
        .filter(|m| *m > 0)
        .ok_or_else(|| {
            AppError::Validation("maxDistance must be a positive integer (meters)".to_string())
        })?;

    if meters > geo.max_distance_limit_meters {
        return Err(AppError::Validation(format!(
            "maxDistance must not exceed {} meters",
            geo.max_distance_limit_meters
        )));
    }

    Ok(f64::from(meters))
}

fn search_text(value: Option<&str>) -> Result<Option<String>> {
    match non_blank(value) {
        None => Ok(None),
        Some(text) if text.chars().count() > MAX_SEARCH_QUERY_LENGTH => {
            Err(AppError::Validation(format!(
                "query must not exceed {} characters",
                MAX_SEARCH_QUERY_LENGTH
            )))
        }
        Some(text) => Ok(Some(text.to_string())),
    }
}

/// Read-side entry point for pharmacy discovery.
///
/// Coerces raw query parameters, delegates to the planners and shapes the
/// `{ data, count }` envelope. Holds no mutable state.
pub struct PharmacyQueryService {
    store: Arc<dyn PharmacyStore>,
    guard_planner: GuardDutyPlanner,
    search_planner: SearchPlanner,
    geo: GeoQueryConfig,
}

impl PharmacyQueryService {
    pub fn new(store: Arc<dyn PharmacyStore>, geo: GeoQueryConfig) -> Self {
        Self {
            guard_planner: GuardDutyPlanner::new(store.clone()),
            search_planner: SearchPlanner::new(store.clone()),
            store,
            geo,
        }
    }

    pub async fn find_guard_pharmacies(
        &self,
        params: &GuardDutyQueryParams,
    ) -> Result<ListResponse<GuardDutyResultDto>> {
        let query = GuardDutyQuery {
            point: required_point(params.latitude.as_deref(), params.longitude.as_deref())?,
            date: parse_date(params.date.as_deref())?,
            max_distance_meters: parse_max_distance(params.max_distance.as_deref(), &self.geo)?,
        };

        let results = self.guard_planner.plan(&query).await?;
        Ok(results
            .into_iter()
            .map(GuardDutyResultDto::from)
            .collect::<Vec<_>>()
            .into())
    }

    pub async fn search_pharmacies(
        &self,
        params: &SearchQueryParams,
    ) -> Result<ListResponse<PharmacySearchResultDto>> {
        let text = search_text(params.query.as_deref())?;
        let max_distance_meters = parse_max_distance(params.max_distance.as_deref(), &self.geo)?;
        let near = optional_point(params.latitude.as_deref(), params.longitude.as_deref())?
            .map(|point| SearchNear {
                point,
                max_distance_meters,
            });

        let results = self
            .search_planner
            .search(&SearchQuery { text, near })
            .await?;
        Ok(results
            .into_iter()
            .map(PharmacySearchResultDto::from)
            .collect::<Vec<_>>()
            .into())
    }

    /// `None` when no pharmacy has this id
    pub async fn get_pharmacy(&self, id: Uuid) -> Result<Option<PharmacyResponseDto>> {
        Ok(self.store.find_by_id(id).await?.map(Into::into))
    }

    pub async fn list_all(&self) -> Result<ListResponse<PharmacyResponseDto>> {
        self.list(&PharmacyFilter::default()).await
    }

    /// Every on-duty pharmacy, without a proximity stage
    pub async fn list_on_duty(&self) -> Result<ListResponse<PharmacyResponseDto>> {
        self.list(&PharmacyFilter::on_duty()).await
    }

    async fn list(&self, filter: &PharmacyFilter) -> Result<ListResponse<PharmacyResponseDto>> {
        let pharmacies = self.store.find(filter).await?;
        Ok(pharmacies
            .into_iter()
            .map(PharmacyResponseDto::from)
            .collect::<Vec<_>>()
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pharmacies::models::NewPharmacy;
    use crate::features::pharmacies::store::InMemoryPharmacyStore;
    use crate::shared::test_helpers::new_pharmacy;

    fn guard_params(latitude: Option<&str>, longitude: Option<&str>) -> GuardDutyQueryParams {
        GuardDutyQueryParams {
            latitude: latitude.map(String::from),
            longitude: longitude.map(String::from),
            ..Default::default()
        }
    }

    async fn service_with(pharmacies: Vec<NewPharmacy>) -> PharmacyQueryService {
        let store = InMemoryPharmacyStore::new().with_geo_index(true);
        for pharmacy in pharmacies {
            store.insert(pharmacy).await.unwrap();
        }
        PharmacyQueryService::new(Arc::new(store), GeoQueryConfig::default())
    }

    #[test]
    fn test_parse_date_formats() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_date(Some("2024-01-01")).unwrap(), monday);
        assert_eq!(parse_date(Some("2024-01-01T23:30:00+01:00")).unwrap(), monday);
        assert_eq!(parse_date(None).unwrap(), Local::now().date_naive());
        assert!(matches!(
            parse_date(Some("01/01/2024")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_max_distance_bounds() {
        let geo = GeoQueryConfig::default();
        assert_eq!(parse_max_distance(None, &geo).unwrap(), 10_000.0);
        assert_eq!(parse_max_distance(Some(" 1500 "), &geo).unwrap(), 1_500.0);
        assert!(parse_max_distance(Some("0"), &geo).is_err());
        assert!(parse_max_distance(Some("-5"), &geo).is_err());
        assert!(parse_max_distance(Some("1.5"), &geo).is_err());
        assert!(parse_max_distance(Some("100001"), &geo).is_err());
    }

    #[tokio::test]
    async fn test_guard_query_requires_coordinates() {
        let service = service_with(Vec::new()).await;

        for params in [
            guard_params(None, Some("-8.5")),
            guard_params(Some("32.2"), None),
            guard_params(Some("abc"), Some("-8.5")),
            guard_params(Some("32.2"), Some("NaN")),
            guard_params(Some("95"), Some("-8.5")),
        ] {
            let err = service.find_guard_pharmacies(&params).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{:?}", params);
        }
    }

    #[tokio::test]
    async fn test_guard_query_envelope_rounds_distance() {
        let service = service_with(vec![
            new_pharmacy("Centrale", 32.2462, -8.5298, true),
            new_pharmacy("Closed", 32.2462, -8.5298, false),
        ])
        .await;

        let mut params = guard_params(Some("32.2462"), Some("-8.5198"));
        params.date = Some("2024-01-01".to_string());

        let response = service.find_guard_pharmacies(&params).await.unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.data[0].pharmacy.name, "Centrale");
        // 0.01 degrees of longitude at 32.2462N
        assert_eq!(response.data[0].distance, 940);
        assert!(response.data[0].resolved_opening_hours.is_some());
    }

    #[tokio::test]
    async fn test_guard_query_with_nothing_on_duty_is_empty() {
        let service = service_with(vec![new_pharmacy("Closed", 0.0, 0.0, false)]).await;

        let response = service
            .find_guard_pharmacies(&guard_params(Some("0"), Some("0")))
            .await
            .unwrap();
        assert_eq!(response.count, 0);
        assert!(response.data.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_half_coordinates_and_long_text() {
        let service = service_with(Vec::new()).await;

        let half = SearchQueryParams {
            latitude: Some("32.0".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.search_pharmacies(&half).await,
            Err(AppError::Validation(_))
        ));

        let long = SearchQueryParams {
            query: Some("x".repeat(MAX_SEARCH_QUERY_LENGTH + 1)),
            ..Default::default()
        };
        assert!(matches!(
            service.search_pharmacies(&long).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_text_search_rejects_malformed_max_distance() {
        let service = service_with(vec![new_pharmacy("Centrale", 32.2462, -8.5298, true)]).await;

        for max_distance in ["abc", "0", "100001"] {
            let params = SearchQueryParams {
                query: Some("centr".to_string()),
                max_distance: Some(max_distance.to_string()),
                ..Default::default()
            };
            let err = service.search_pharmacies(&params).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{}", max_distance);
        }

        let valid = SearchQueryParams {
            query: Some("centr".to_string()),
            max_distance: Some("500".to_string()),
            ..Default::default()
        };
        assert_eq!(service.search_pharmacies(&valid).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_blank_search_returns_all_without_distance() {
        let service = service_with(vec![
            new_pharmacy("A", 0.0, 0.0, false),
            new_pharmacy("B", 1.0, 1.0, true),
        ])
        .await;

        let params = SearchQueryParams {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        let response = service.search_pharmacies(&params).await.unwrap();
        assert_eq!(response.count, 2);
        assert!(response.data.iter().all(|r| r.distance.is_none()));
    }

    #[tokio::test]
    async fn test_lists_and_lookup() {
        let service = service_with(vec![
            new_pharmacy("A", 0.0, 0.0, false),
            new_pharmacy("B", 1.0, 1.0, true),
        ])
        .await;

        assert_eq!(service.list_all().await.unwrap().count, 2);
        let on_duty = service.list_on_duty().await.unwrap();
        assert_eq!(on_duty.count, 1);
        assert_eq!(on_duty.data[0].name, "B");

        let id = on_duty.data[0].id;
        assert!(service.get_pharmacy(id).await.unwrap().is_some());
        assert!(service.get_pharmacy(Uuid::now_v7()).await.unwrap().is_none());
    }
}
