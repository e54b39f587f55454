use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reviews::dtos::{CreateReviewDto, ReviewResponseDto};
use crate::features::reviews::models::NewReview;
use crate::features::reviews::store::ReviewStore;

fn pharmacy_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Pharmacy {} not found", id))
}

/// Service for pharmacy reviews and the ratings derived from them
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }

    /// Reviews for a pharmacy, newest first
    pub async fn list_for_pharmacy(&self, pharmacy_id: Uuid) -> Result<Vec<ReviewResponseDto>> {
        if !self.store.pharmacy_exists(pharmacy_id).await? {
            return Err(pharmacy_not_found(pharmacy_id));
        }

        let reviews = self.store.list_for_pharmacy(pharmacy_id).await?;
        Ok(reviews.into_iter().map(Into::into).collect())
    }

    /// Insert a review and recompute the pharmacy rating
    pub async fn create(
        &self,
        pharmacy_id: Uuid,
        user: &AuthenticatedUser,
        dto: CreateReviewDto,
    ) -> Result<ReviewResponseDto> {
        let rated = self
            .store
            .insert_and_rerate(NewReview {
                pharmacy_id,
                user_id: user.sub.clone(),
                rating: dto.rating,
                comment: dto.comment,
            })
            .await?
            .ok_or_else(|| pharmacy_not_found(pharmacy_id))?;

        tracing::info!(
            "User {} rated pharmacy {} with {} (rating now {})",
            user.sub,
            pharmacy_id,
            rated.review.rating,
            rated.pharmacy_rating
        );

        Ok(rated.review.into())
    }
}
