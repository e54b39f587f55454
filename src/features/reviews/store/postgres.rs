use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RatedReview, ReviewStore};
use crate::core::error::{AppError, Result};
use crate::features::reviews::models::{NewReview, Review};
use crate::features::reviews::services::rating::average_rating;

/// PostgreSQL review store
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn pharmacy_exists(&self, pharmacy_id: Uuid) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pharmacies WHERE id = $1)")
            .bind(pharmacy_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check pharmacy existence: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_for_pharmacy(&self, pharmacy_id: Uuid) -> Result<Vec<Review>> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, pharmacy_id, user_id, rating, comment, created_at
            FROM pharmacy_reviews
            WHERE pharmacy_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(pharmacy_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reviews: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Locks the pharmacy row so concurrent reviews serialize their rating
    /// updates. Dropping the transaction early rolls it back.
    async fn insert_and_rerate(&self, new: NewReview) -> Result<Option<RatedReview>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM pharmacies WHERE id = $1 FOR UPDATE")
                .bind(new.pharmacy_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to lock pharmacy: {:?}", e);
                    AppError::Database(e)
                })?;

        if locked.is_none() {
            return Ok(None);
        }

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO pharmacy_reviews (id, pharmacy_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, pharmacy_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(new.pharmacy_id)
        .bind(&new.user_id)
        .bind(new.rating)
        .bind(&new.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert review: {:?}", e);
            AppError::Database(e)
        })?;

        let ratings: Vec<i16> =
            sqlx::query_scalar("SELECT rating FROM pharmacy_reviews WHERE pharmacy_id = $1")
                .bind(new.pharmacy_id)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to load pharmacy ratings: {:?}", e);
                    AppError::Database(e)
                })?;
        let pharmacy_rating = average_rating(&ratings);

        sqlx::query("UPDATE pharmacies SET rating = $2, updated_at = NOW() WHERE id = $1")
            .bind(new.pharmacy_id)
            .bind(pharmacy_rating)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update pharmacy rating: {:?}", e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit review: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Some(RatedReview {
            review,
            pharmacy_rating,
        }))
    }
}
