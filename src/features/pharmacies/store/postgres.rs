use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{GeoCandidate, GeoNearQuery, PharmacyFilter, PharmacyStore, StoreCapabilities};
use crate::core::error::{AppError, Result};
use crate::features::pharmacies::models::{
    Coordinates, NewPharmacy, OpeningHoursEntry, Pharmacy, PharmacyChanges,
};

const PHARMACY_COLUMNS: &str = r#"
    id, name, phone, email, city, detailed_address, latitude, longitude,
    is_on_duty, opening_hours, services, image, image_mobile, rating, description,
    created_at, updated_at
"#;

#[derive(Debug, FromRow)]
struct PharmacyRow {
    id: Uuid,
    name: String,
    phone: String,
    email: String,
    city: String,
    detailed_address: String,
    latitude: f64,
    longitude: f64,
    is_on_duty: bool,
    opening_hours: Json<Vec<OpeningHoursEntry>>,
    services: Vec<String>,
    image: Option<String>,
    image_mobile: Option<String>,
    rating: Decimal,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PharmacyRow> for Pharmacy {
    fn from(row: PharmacyRow) -> Self {
        // `location` is a generated column over the same two values
        let location = Coordinates {
            latitude: row.latitude,
            longitude: row.longitude,
        }
        .to_point();
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            city: row.city,
            detailed_address: row.detailed_address,
            latitude: row.latitude,
            longitude: row.longitude,
            location,
            is_on_duty: row.is_on_duty,
            opening_hours: row.opening_hours.0,
            services: row.services,
            image: row.image,
            image_mobile: row.image_mobile,
            rating: row.rating,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct GeoCandidateRow {
    #[sqlx(flatten)]
    pharmacy: PharmacyRow,
    distance_meters: f64,
}

/// Escape LIKE metacharacters so user text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Convert database error to more specific AppError with user-friendly messages
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique violation (PostgreSQL error code 23505)
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("Pharmacy with this email already exists.".to_string());
        }

        // Check violation, e.g. coordinates outside their range
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23514")) {
            return AppError::Validation(db_err.message().to_string());
        }
    }

    tracing::error!("Pharmacy store query failed: {:?}", e);
    AppError::Database(e)
}

/// Append `AND ...` predicates for a filter to a query that already has a WHERE clause
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PharmacyFilter) {
    if let Some(on_duty) = filter.on_duty {
        builder.push(" AND is_on_duty = ").push_bind(on_duty);
    }

    if let Some(text) = filter.text.as_deref() {
        let pattern = format!("%{}%", escape_like(text));
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR detailed_address ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR city ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM unnest(services) AS service WHERE service ILIKE ")
            .push_bind(pattern)
            .push("))");
    }
}

/// PostgreSQL + PostGIS store. Distances use the sphere (`use_spheroid = false`).
/// PostGIS takes a mean radius of 6371008.8 m where the in-process haversine
/// uses 6371 km, so the two paths differ by about 0.00014%.
pub struct PgPharmacyStore {
    pool: PgPool,
}

impl PgPharmacyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PharmacyStore for PgPharmacyStore {
    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities { geo_index: true }
    }

    async fn geo_near(&self, query: &GeoNearQuery) -> Result<Vec<GeoCandidate>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder
            .push(PHARMACY_COLUMNS)
            .push(", ST_Distance(location, ST_SetSRID(ST_MakePoint(")
            .push_bind(query.point.longitude)
            .push(", ")
            .push_bind(query.point.latitude)
            .push("), 4326)::geography, false) AS distance_meters FROM pharmacies")
            .push(" WHERE ST_DWithin(location, ST_SetSRID(ST_MakePoint(")
            .push_bind(query.point.longitude)
            .push(", ")
            .push_bind(query.point.latitude)
            .push("), 4326)::geography, ")
            .push_bind(query.max_distance_meters)
            .push(", false)");
        push_filter(&mut builder, &query.filter);
        builder.push(" ORDER BY distance_meters ASC, id ASC");

        let rows = builder
            .build_query_as::<GeoCandidateRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| GeoCandidate {
                pharmacy: row.pharmacy.into(),
                distance_meters: row.distance_meters,
            })
            .collect())
    }

    async fn find(&self, filter: &PharmacyFilter) -> Result<Vec<Pharmacy>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder
            .push(PHARMACY_COLUMNS)
            .push(" FROM pharmacies WHERE TRUE");
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at ASC, id ASC");

        let rows = builder
            .build_query_as::<PharmacyRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pharmacy>> {
        let sql = format!("SELECT {} FROM pharmacies WHERE id = $1", PHARMACY_COLUMNS);
        let row = sqlx::query_as::<_, PharmacyRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Pharmacy>> {
        let sql = format!(
            "SELECT {} FROM pharmacies WHERE LOWER(email) = LOWER($1)",
            PHARMACY_COLUMNS
        );
        let row = sqlx::query_as::<_, PharmacyRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, pharmacy: NewPharmacy) -> Result<Pharmacy> {
        let sql = format!(
            r#"
            INSERT INTO pharmacies (
                id, name, phone, email, city, detailed_address, latitude, longitude,
                is_on_duty, opening_hours, services, image, image_mobile, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            PHARMACY_COLUMNS
        );

        let row = sqlx::query_as::<_, PharmacyRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(pharmacy.name)
            .bind(pharmacy.phone)
            .bind(pharmacy.email)
            .bind(pharmacy.city)
            .bind(pharmacy.detailed_address)
            .bind(pharmacy.coordinates.latitude)
            .bind(pharmacy.coordinates.longitude)
            .bind(pharmacy.is_on_duty)
            .bind(Json(pharmacy.opening_hours))
            .bind(pharmacy.services)
            .bind(pharmacy.image)
            .bind(pharmacy.image_mobile)
            .bind(pharmacy.description)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, changes: PharmacyChanges) -> Result<Option<Pharmacy>> {
        let sql = format!(
            r#"
            UPDATE pharmacies SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                city = COALESCE($5, city),
                detailed_address = COALESCE($6, detailed_address),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                is_on_duty = COALESCE($9, is_on_duty),
                opening_hours = COALESCE($10, opening_hours),
                services = COALESCE($11, services),
                image = COALESCE($12, image),
                image_mobile = COALESCE($13, image_mobile),
                description = COALESCE($14, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PHARMACY_COLUMNS
        );

        let row = sqlx::query_as::<_, PharmacyRow>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.phone)
            .bind(changes.email)
            .bind(changes.city)
            .bind(changes.detailed_address)
            .bind(changes.coordinates.map(|c| c.latitude))
            .bind(changes.coordinates.map(|c| c.longitude))
            .bind(changes.is_on_duty)
            .bind(changes.opening_hours.map(Json))
            .bind(changes.services)
            .bind(changes.image)
            .bind(changes.image_mobile)
            .bind(changes.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pharmacies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_on_duty(&self, id: Uuid, on_duty: bool) -> Result<Option<Pharmacy>> {
        let sql = format!(
            "UPDATE pharmacies SET is_on_duty = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            PHARMACY_COLUMNS
        );
        let row = sqlx::query_as::<_, PharmacyRow>(&sql)
            .bind(id)
            .bind(on_duty)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_location_follows_raw_coordinates() {
        let now = Utc::now();
        let row = PharmacyRow {
            id: Uuid::now_v7(),
            name: "Centrale".to_string(),
            phone: "+212 524 000 000".to_string(),
            email: "centrale@pharma.ma".to_string(),
            city: "Youssoufia".to_string(),
            detailed_address: "1 Avenue Hassan II".to_string(),
            latitude: 32.2462,
            longitude: -8.5298,
            is_on_duty: true,
            opening_hours: Json(Vec::new()),
            services: vec!["vaccination".to_string()],
            image: None,
            image_mobile: None,
            rating: Decimal::ZERO,
            description: None,
            created_at: now,
            updated_at: now,
        };

        let pharmacy = Pharmacy::from(row);
        assert_eq!(pharmacy.location.coordinates, [-8.5298, 32.2462]);
    }

    #[test]
    fn test_escape_like_makes_wildcards_literal() {
        assert_eq!(escape_like("vaccination"), "vaccination");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\d"), "c:\\\\d");
    }

    #[test]
    fn test_find_query_with_both_predicates() {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id FROM pharmacies WHERE TRUE");
        push_filter(
            &mut builder,
            &PharmacyFilter {
                on_duty: Some(true),
                text: Some("atlas".to_string()),
            },
        );

        let sql = builder.sql();
        assert!(sql.contains("is_on_duty = $1"));
        assert!(sql.contains("name ILIKE $2"));
        assert!(sql.contains("service ILIKE $5"));
    }
}
