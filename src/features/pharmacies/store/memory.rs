use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{GeoCandidate, GeoNearQuery, PharmacyFilter, PharmacyStore, StoreCapabilities};
use crate::core::error::{AppError, Result};
use crate::features::pharmacies::models::{NewPharmacy, Pharmacy, PharmacyChanges};
use crate::features::pharmacies::services::proximity::rank_by_distance;

/// Process-local store. Every write re-derives `location` from the raw
/// coordinates and enforces case-insensitive email uniqueness.
pub struct InMemoryPharmacyStore {
    pharmacies: RwLock<Vec<Pharmacy>>,
    geo_index: bool,
}

impl Default for InMemoryPharmacyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPharmacyStore {
    /// Store without native geo support; planners take the linear-scan path.
    pub fn new() -> Self {
        Self {
            pharmacies: RwLock::new(Vec::new()),
            geo_index: false,
        }
    }

    /// Advertise (or hide) native geo support so planners call `geo_near` directly
    pub fn with_geo_index(mut self, geo_index: bool) -> Self {
        self.geo_index = geo_index;
        self
    }

    fn email_taken(pharmacies: &[Pharmacy], email: &str, except: Option<Uuid>) -> bool {
        pharmacies
            .iter()
            .any(|p| Some(p.id) != except && p.email.eq_ignore_ascii_case(email))
    }
}

#[async_trait]
impl PharmacyStore for InMemoryPharmacyStore {
    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities {
            geo_index: self.geo_index,
        }
    }

    async fn geo_near(&self, query: &GeoNearQuery) -> Result<Vec<GeoCandidate>> {
        let matching = self.find(&query.filter).await?;
        Ok(rank_by_distance(matching, query))
    }

    async fn find(&self, filter: &PharmacyFilter) -> Result<Vec<Pharmacy>> {
        let pharmacies = self.pharmacies.read().await;
        Ok(pharmacies
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>> {
        let pharmacies = self.pharmacies.read().await;
        Ok(pharmacies.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Pharmacy>> {
        let pharmacies = self.pharmacies.read().await;
        Ok(pharmacies
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, new: NewPharmacy) -> Result<Pharmacy> {
        let mut pharmacies = self.pharmacies.write().await;

        if Self::email_taken(&pharmacies, &new.email, None) {
            return Err(AppError::Conflict(
                "Pharmacy with this email already exists.".to_string(),
            ));
        }

        let now = Utc::now();
        let pharmacy = Pharmacy {
            id: Uuid::now_v7(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            city: new.city,
            detailed_address: new.detailed_address,
            latitude: new.coordinates.latitude,
            longitude: new.coordinates.longitude,
            location: new.coordinates.to_point(),
            is_on_duty: new.is_on_duty,
            opening_hours: new.opening_hours,
            services: new.services,
            image: new.image,
            image_mobile: new.image_mobile,
            rating: Decimal::ZERO,
            description: new.description,
            created_at: now,
            updated_at: now,
        };

        pharmacies.push(pharmacy.clone());
        Ok(pharmacy)
    }

    async fn update(&self, id: Uuid, changes: PharmacyChanges) -> Result<Option<Pharmacy>> {
        let mut pharmacies = self.pharmacies.write().await;

        if let Some(email) = changes.email.as_deref() {
            if Self::email_taken(&pharmacies, email, Some(id)) {
                return Err(AppError::Conflict(
                    "Pharmacy with this email already exists.".to_string(),
                ));
            }
        }

        let Some(pharmacy) = pharmacies.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            pharmacy.name = name;
        }
        if let Some(phone) = changes.phone {
            pharmacy.phone = phone;
        }
        if let Some(email) = changes.email {
            pharmacy.email = email;
        }
        if let Some(city) = changes.city {
            pharmacy.city = city;
        }
        if let Some(detailed_address) = changes.detailed_address {
            pharmacy.detailed_address = detailed_address;
        }
        if let Some(coordinates) = changes.coordinates {
            pharmacy.latitude = coordinates.latitude;
            pharmacy.longitude = coordinates.longitude;
            pharmacy.location = coordinates.to_point();
        }
        if let Some(is_on_duty) = changes.is_on_duty {
            pharmacy.is_on_duty = is_on_duty;
        }
        if let Some(opening_hours) = changes.opening_hours {
            pharmacy.opening_hours = opening_hours;
        }
        if let Some(services) = changes.services {
            pharmacy.services = services;
        }
        if let Some(image) = changes.image {
            pharmacy.image = Some(image);
        }
        if let Some(image_mobile) = changes.image_mobile {
            pharmacy.image_mobile = Some(image_mobile);
        }
        if let Some(description) = changes.description {
            pharmacy.description = Some(description);
        }
        pharmacy.updated_at = Utc::now();

        Ok(Some(pharmacy.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut pharmacies = self.pharmacies.write().await;
        let before = pharmacies.len();
        pharmacies.retain(|p| p.id != id);
        Ok(pharmacies.len() != before)
    }

    async fn set_on_duty(&self, id: Uuid, on_duty: bool) -> Result<Option<Pharmacy>> {
        let mut pharmacies = self.pharmacies.write().await;
        Ok(pharmacies.iter_mut().find(|p| p.id == id).map(|pharmacy| {
            pharmacy.is_on_duty = on_duty;
            pharmacy.updated_at = Utc::now();
            pharmacy.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pharmacies::models::Coordinates;
    use crate::shared::test_helpers::new_pharmacy;

    #[tokio::test]
    async fn test_insert_derives_location_from_raw_coordinates() {
        let store = InMemoryPharmacyStore::new();
        let saved = store
            .insert(new_pharmacy("Centrale", 32.2462, -8.5298, true))
            .await
            .unwrap();

        assert_eq!(saved.location.coordinates, [-8.5298, 32.2462]);
    }

    #[tokio::test]
    async fn test_update_coordinates_rederives_location() {
        let store = InMemoryPharmacyStore::new();
        let saved = store
            .insert(new_pharmacy("Centrale", 32.2462, -8.5298, true))
            .await
            .unwrap();

        let updated = store
            .update(
                saved.id,
                PharmacyChanges {
                    coordinates: Some(Coordinates::try_new(31.6295, -7.9811).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.latitude, 31.6295);
        assert_eq!(updated.location.coordinates, [-7.9811, 31.6295]);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = InMemoryPharmacyStore::new();
        let mut first = new_pharmacy("A", 0.0, 0.0, false);
        first.email = "Contact@Pharma.ma".to_string();
        store.insert(first).await.unwrap();

        let mut second = new_pharmacy("B", 1.0, 1.0, false);
        second.email = "contact@pharma.ma".to_string();
        let err = store.insert(second).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_may_keep_own_email() {
        let store = InMemoryPharmacyStore::new();
        let saved = store
            .insert(new_pharmacy("A", 0.0, 0.0, false))
            .await
            .unwrap();

        let updated = store
            .update(
                saved.id,
                PharmacyChanges {
                    email: Some(saved.email.to_uppercase()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_some());
    }

    #[tokio::test]
    async fn test_missing_ids_are_reported_not_raised() {
        let store = InMemoryPharmacyStore::new();
        let id = Uuid::now_v7();

        assert!(store.find_by_id(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.set_on_duty(id, true).await.unwrap().is_none());
        assert!(store
            .update(id, PharmacyChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_applies_text_filter_case_insensitively() {
        let store = InMemoryPharmacyStore::new();
        let mut with_service = new_pharmacy("Pharmacie Atlas", 0.0, 0.0, false);
        with_service.services = vec!["Vaccination".to_string()];
        store.insert(with_service).await.unwrap();
        store
            .insert(new_pharmacy("Pharmacie Nord", 0.0, 0.0, false))
            .await
            .unwrap();

        let found = store
            .find(&PharmacyFilter {
                on_duty: None,
                text: Some("VACCIN".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Pharmacie Atlas");
    }
}
