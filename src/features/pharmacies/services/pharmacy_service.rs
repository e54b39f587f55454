use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::pharmacies::dtos::{
    CreatePharmacyDto, OpeningHoursEntryDto, PharmacyResponseDto, UpdatePharmacyDto,
};
use crate::features::pharmacies::models::{
    parse_weekday, weekday_name, Coordinates, NewPharmacy, OpeningHoursEntry, PharmacyChanges,
};
use crate::features::pharmacies::store::PharmacyStore;

/// Store weekdays under their English name whatever locale the client used
fn normalize_opening_hours(entries: Vec<OpeningHoursEntryDto>) -> Result<Vec<OpeningHoursEntry>> {
    entries
        .into_iter()
        .map(|entry| {
            let weekday = parse_weekday(&entry.day).ok_or_else(|| {
                AppError::Validation(format!("Unknown day name: {}", entry.day))
            })?;
            Ok(OpeningHoursEntry {
                day: weekday_name(weekday).to_string(),
                open: entry.open,
                close: entry.close,
            })
        })
        .collect()
}

fn coordinates(latitude: f64, longitude: f64) -> Result<Coordinates> {
    Coordinates::try_new(latitude, longitude).map_err(|e| AppError::Validation(e.to_string()))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Pharmacy {} not found", id))
}

/// Administrative writes on pharmacy records
pub struct PharmacyService {
    store: Arc<dyn PharmacyStore>,
}

impl PharmacyService {
    pub fn new(store: Arc<dyn PharmacyStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, dto: CreatePharmacyDto) -> Result<PharmacyResponseDto> {
        if self.store.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::Conflict(
                "Pharmacy with this email already exists.".to_string(),
            ));
        }

        let new = NewPharmacy {
            coordinates: coordinates(dto.latitude, dto.longitude)?,
            opening_hours: normalize_opening_hours(dto.opening_hours)?,
            name: dto.name,
            phone: dto.phone,
            email: dto.email,
            city: dto.city,
            detailed_address: dto.detailed_address,
            is_on_duty: dto.is_on_duty,
            services: dto.services,
            image: dto.image,
            image_mobile: dto.image_mobile,
            description: dto.description,
        };

        let pharmacy = self.store.insert(new).await?;
        tracing::info!("Created pharmacy {} ({})", pharmacy.id, pharmacy.name);

        Ok(pharmacy.into())
    }

    /// Partial update. Changing either coordinate re-derives the location point.
    pub async fn update(&self, id: Uuid, dto: UpdatePharmacyDto) -> Result<PharmacyResponseDto> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(email) = dto.email.as_deref() {
            if let Some(other) = self.store.find_by_email(email).await? {
                if other.id != id {
                    return Err(AppError::Conflict(
                        "Pharmacy with this email already exists.".to_string(),
                    ));
                }
            }
        }

        let coordinates = match (dto.latitude, dto.longitude) {
            (None, None) => None,
            (latitude, longitude) => Some(coordinates(
                latitude.unwrap_or(current.latitude),
                longitude.unwrap_or(current.longitude),
            )?),
        };

        let opening_hours = dto.opening_hours.map(normalize_opening_hours).transpose()?;

        let changes = PharmacyChanges {
            name: dto.name,
            phone: dto.phone,
            email: dto.email,
            city: dto.city,
            detailed_address: dto.detailed_address,
            coordinates,
            is_on_duty: dto.is_on_duty,
            opening_hours,
            services: dto.services,
            image: dto.image,
            image_mobile: dto.image_mobile,
            description: dto.description,
        };

        let pharmacy = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Updated pharmacy {}", id);

        Ok(pharmacy.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!("Deleted pharmacy {}", id);
        Ok(())
    }

    pub async fn set_on_duty(&self, id: Uuid, on_duty: bool) -> Result<PharmacyResponseDto> {
        let pharmacy = self
            .store
            .set_on_duty(id, on_duty)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Pharmacy {} on duty: {}", id, on_duty);

        Ok(pharmacy.into())
    }
}
