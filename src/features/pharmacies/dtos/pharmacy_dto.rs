use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::pharmacies::models::{
    parse_weekday, GeoJsonPoint, OpeningHoursEntry, Pharmacy,
};
use crate::features::pharmacies::services::distance::round_meters;
use crate::features::pharmacies::services::{GuardDutyResult, SearchResult};
use crate::shared::validation::{PHONE_REGEX, TIME_HHMM_REGEX};

fn validate_weekday(day: &str) -> Result<(), ValidationError> {
    match parse_weekday(day) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("weekday")
            .with_message("day must be a full English or French day name".into())),
    }
}

/// Opening-hours slot as sent by clients. `day` may be English or French.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OpeningHoursEntryDto {
    #[validate(custom(function = validate_weekday))]
    #[schema(example = "Monday")]
    pub day: String,

    #[validate(regex(path = *TIME_HHMM_REGEX, message = "open must be HH:MM"))]
    #[schema(example = "08:00")]
    pub open: String,

    #[validate(regex(path = *TIME_HHMM_REGEX, message = "close must be HH:MM"))]
    #[schema(example = "20:00")]
    pub close: String,
}

/// Request DTO for creating a pharmacy
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePharmacyDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "City must be 1-255 characters"))]
    pub city: String,

    #[validate(length(min = 1, max = 1000, message = "Address must be 1-1000 characters"))]
    pub detailed_address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,

    #[serde(default)]
    pub is_on_duty: bool,

    #[validate(nested)]
    #[serde(default)]
    pub opening_hours: Vec<OpeningHoursEntryDto>,

    #[serde(default)]
    pub services: Vec<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    #[validate(url(message = "Mobile image must be a valid URL"))]
    pub image_mobile: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
}

/// Request DTO for a partial update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePharmacyDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 255, message = "City must be 1-255 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 1000, message = "Address must be 1-1000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_address: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_on_duty: Option<bool>,

    #[validate(nested)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<Vec<OpeningHoursEntryDto>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,

    #[validate(url(message = "Image must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[validate(url(message = "Mobile image must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_mobile: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response DTO for pharmacy data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyResponseDto {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub detailed_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location: GeoJsonPoint,
    pub is_on_duty: bool,
    pub opening_hours: Vec<OpeningHoursEntry>,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_mobile: Option<String>,
    /// Average review rating, 0 when unrated
    #[schema(value_type = String, example = "4.5")]
    pub rating: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Pharmacy> for PharmacyResponseDto {
    fn from(pharmacy: Pharmacy) -> Self {
        Self {
            id: pharmacy.id,
            name: pharmacy.name,
            phone: pharmacy.phone,
            email: pharmacy.email,
            city: pharmacy.city,
            detailed_address: pharmacy.detailed_address,
            latitude: pharmacy.latitude,
            longitude: pharmacy.longitude,
            location: pharmacy.location,
            is_on_duty: pharmacy.is_on_duty,
            opening_hours: pharmacy.opening_hours,
            services: pharmacy.services,
            image: pharmacy.image,
            image_mobile: pharmacy.image_mobile,
            rating: pharmacy.rating,
            description: pharmacy.description,
            created_at: pharmacy.created_at,
            updated_at: pharmacy.updated_at,
        }
    }
}

/// On-duty pharmacy with its distance and the opening hours for the queried day
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuardDutyResultDto {
    #[serde(flatten)]
    pub pharmacy: PharmacyResponseDto,
    /// Distance from the query point in meters
    #[schema(example = 420)]
    pub distance: i64,
    pub resolved_opening_hours: Option<OpeningHoursEntry>,
}

impl From<GuardDutyResult> for GuardDutyResultDto {
    fn from(result: GuardDutyResult) -> Self {
        Self {
            pharmacy: result.pharmacy.into(),
            distance: round_meters(result.distance_meters),
            resolved_opening_hours: result.opening_hours,
        }
    }
}

/// Search hit. `distance` (meters) is set only for searches with coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PharmacySearchResultDto {
    #[serde(flatten)]
    pub pharmacy: PharmacyResponseDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
}

impl From<SearchResult> for PharmacySearchResultDto {
    fn from(result: SearchResult) -> Self {
        Self {
            pharmacy: result.pharmacy.into(),
            distance: result.distance_meters.map(round_meters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreatePharmacyDto {
        serde_json::from_value(serde_json::json!({
            "name": "Pharmacie Centrale",
            "phone": "+212 524 46 12 34",
            "email": "centrale@pharma.ma",
            "city": "Youssoufia",
            "detailedAddress": "12 Bd Mohammed V",
            "latitude": 32.2462,
            "longitude": -8.5298,
            "openingHours": [{ "day": "Lundi", "open": "08:00", "close": "20:00" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_create_dto_defaults_and_validates() {
        let dto = valid_create();
        assert!(!dto.is_on_duty);
        assert!(dto.services.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_bad_fields() {
        let mut dto = valid_create();
        dto.latitude = 91.0;
        assert!(dto.validate().is_err());

        let mut dto = valid_create();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid_create();
        dto.opening_hours[0].close = "24:00".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid_create();
        dto.opening_hours[0].day = "Mon".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_empty_is_valid() {
        assert!(UpdatePharmacyDto::default().validate().is_ok());

        let dto = UpdatePharmacyDto {
            longitude: Some(-200.0),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_search_result_omits_distance_without_coordinates() {
        let pharmacy = PharmacyResponseDto {
            id: Uuid::nil(),
            name: "P".to_string(),
            phone: "0524000000".to_string(),
            email: "p@example.com".to_string(),
            city: "C".to_string(),
            detailed_address: "A".to_string(),
            latitude: 1.0,
            longitude: 2.0,
            location: GeoJsonPoint::new(2.0, 1.0),
            is_on_duty: true,
            opening_hours: Vec::new(),
            services: Vec::new(),
            image: None,
            image_mobile: None,
            rating: Decimal::ZERO,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(PharmacySearchResultDto {
            pharmacy,
            distance: None,
        })
        .unwrap();
        assert!(json.get("distance").is_none());
        assert_eq!(json["detailedAddress"], "A");
        assert_eq!(json["location"]["coordinates"], serde_json::json!([2.0, 1.0]));
    }
}
