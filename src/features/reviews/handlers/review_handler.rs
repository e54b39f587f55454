use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reviews::dtos::{CreateReviewDto, ReviewResponseDto};
use crate::features::reviews::services::ReviewService;
use crate::shared::types::{ApiResponse, ListResponse};

/// List reviews of a pharmacy, newest first
#[utoipa::path(
    get,
    path = "/api/pharmacies/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID")
    ),
    responses(
        (status = 200, description = "Reviews", body = ListResponse<ReviewResponseDto>),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(service): State<Arc<ReviewService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListResponse<ReviewResponseDto>>> {
    let reviews = service.list_for_pharmacy(id).await?;
    Ok(Json(reviews.into()))
}

/// Review a pharmacy
///
/// The pharmacy rating becomes the average of all its reviews, rounded to
/// one decimal.
#[utoipa::path(
    post,
    path = "/api/pharmacies/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID")
    ),
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "reviews",
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    user: AuthenticatedUser,
    State(service): State<Arc<ReviewService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let review = service.create(id, &user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(review),
            Some("Review added".to_string()),
            None,
        )),
    ))
}
