use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Coordinates, GeoJsonPoint, OpeningHoursEntry};

/// Pharmacy record as read back from the store.
///
/// `latitude`/`longitude` are the source of truth; `location` is the derived
/// `[longitude, latitude]` point the store maintains for its spatial index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
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
    pub image: Option<String>,
    pub image_mobile: Option<String>,
    pub rating: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a pharmacy
#[derive(Debug, Clone, PartialEq)]
pub struct NewPharmacy {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub detailed_address: String,
    pub coordinates: Coordinates,
    pub is_on_duty: bool,
    pub opening_hours: Vec<OpeningHoursEntry>,
    pub services: Vec<String>,
    pub image: Option<String>,
    pub image_mobile: Option<String>,
    pub description: Option<String>,
}

/// Partial update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PharmacyChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub detailed_address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub is_on_duty: Option<bool>,
    pub opening_hours: Option<Vec<OpeningHoursEntry>>,
    pub services: Option<Vec<String>>,
    pub image: Option<String>,
    pub image_mobile: Option<String>,
    pub description: Option<String>,
}
