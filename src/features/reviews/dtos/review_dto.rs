use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reviews::models::Review;
use crate::shared::constants::{MAX_REVIEW_COMMENT_LENGTH, MAX_REVIEW_RATING, MIN_REVIEW_RATING};

/// Request DTO for reviewing a pharmacy
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewDto {
    #[validate(range(
        min = MIN_REVIEW_RATING,
        max = MAX_REVIEW_RATING,
        message = "Rating must be between 1 and 5"
    ))]
    #[schema(example = 4)]
    pub rating: i16,

    #[validate(length(max = MAX_REVIEW_COMMENT_LENGTH, message = "Comment must not exceed 2000 characters"))]
    pub comment: Option<String>,
}

/// Response DTO for review data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub user_id: String,
    pub rating: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponseDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            pharmacy_id: review.pharmacy_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}
