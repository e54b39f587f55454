use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::pharmacies::dtos::{
    CreatePharmacyDto, GuardDutyQueryParams, GuardDutyResultDto, PharmacyResponseDto,
    PharmacySearchResultDto, SearchQueryParams, UpdatePharmacyDto,
};
use crate::features::pharmacies::services::{PharmacyQueryService, PharmacyService};
use crate::shared::types::{ApiResponse, ListResponse};

// ==================== Public Handlers ====================

/// List all pharmacies
#[utoipa::path(
    get,
    path = "/api/pharmacies",
    responses(
        (status = 200, description = "All pharmacies", body = ListResponse<PharmacyResponseDto>)
    ),
    tag = "pharmacies"
)]
pub async fn list_pharmacies(
    State(service): State<Arc<PharmacyQueryService>>,
) -> Result<Json<ListResponse<PharmacyResponseDto>>> {
    Ok(Json(service.list_all().await?))
}

/// Find on-duty pharmacies near a point, nearest first
///
/// Each entry carries its distance in meters and the opening hours that
/// apply on `date` (today when omitted).
#[utoipa::path(
    get,
    path = "/api/pharmacies/guard",
    params(GuardDutyQueryParams),
    responses(
        (status = 200, description = "On-duty pharmacies within range", body = ListResponse<GuardDutyResultDto>),
        (status = 400, description = "Missing or malformed parameter")
    ),
    tag = "pharmacies"
)]
pub async fn find_guard_pharmacies(
    State(service): State<Arc<PharmacyQueryService>>,
    AppQuery(params): AppQuery<GuardDutyQueryParams>,
) -> Result<Json<ListResponse<GuardDutyResultDto>>> {
    Ok(Json(service.find_guard_pharmacies(&params).await?))
}

/// List every on-duty pharmacy
#[utoipa::path(
    get,
    path = "/api/pharmacies/on-duty",
    responses(
        (status = 200, description = "On-duty pharmacies", body = ListResponse<PharmacyResponseDto>)
    ),
    tag = "pharmacies"
)]
pub async fn list_on_duty_pharmacies(
    State(service): State<Arc<PharmacyQueryService>>,
) -> Result<Json<ListResponse<PharmacyResponseDto>>> {
    Ok(Json(service.list_on_duty().await?))
}

/// Search pharmacies by text and/or proximity
#[utoipa::path(
    get,
    path = "/api/pharmacies/search",
    params(SearchQueryParams),
    responses(
        (status = 200, description = "Matching pharmacies", body = ListResponse<PharmacySearchResultDto>),
        (status = 400, description = "Malformed parameter")
    ),
    tag = "pharmacies"
)]
pub async fn search_pharmacies(
    State(service): State<Arc<PharmacyQueryService>>,
    AppQuery(params): AppQuery<SearchQueryParams>,
) -> Result<Json<ListResponse<PharmacySearchResultDto>>> {
    Ok(Json(service.search_pharmacies(&params).await?))
}

/// Get a pharmacy by id
#[utoipa::path(
    get,
    path = "/api/pharmacies/{id}",
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID")
    ),
    responses(
        (status = 200, description = "Pharmacy details", body = ApiResponse<PharmacyResponseDto>),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies"
)]
pub async fn get_pharmacy(
    State(service): State<Arc<PharmacyQueryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    let pharmacy = service
        .get_pharmacy(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pharmacy {} not found", id)))?;

    Ok(Json(ApiResponse::success(Some(pharmacy), None, None)))
}

// ==================== Admin Handlers ====================

/// Create a pharmacy
#[utoipa::path(
    post,
    path = "/api/pharmacies",
    request_body = CreatePharmacyDto,
    responses(
        (status = 201, description = "Pharmacy created", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already used by another pharmacy")
    ),
    tag = "pharmacies",
    security(("bearer_auth" = []))
)]
pub async fn create_pharmacy(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PharmacyService>>,
    AppJson(dto): AppJson<CreatePharmacyDto>,
) -> Result<(StatusCode, Json<ApiResponse<PharmacyResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let pharmacy = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(pharmacy),
            Some("Pharmacy created".to_string()),
            None,
        )),
    ))
}

/// Update a pharmacy (partial)
#[utoipa::path(
    put,
    path = "/api/pharmacies/{id}",
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID")
    ),
    request_body = UpdatePharmacyDto,
    responses(
        (status = 200, description = "Pharmacy updated", body = ApiResponse<PharmacyResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Pharmacy not found"),
        (status = 409, description = "Email already used by another pharmacy")
    ),
    tag = "pharmacies",
    security(("bearer_auth" = []))
)]
pub async fn update_pharmacy(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePharmacyDto>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let pharmacy = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(pharmacy),
        Some("Pharmacy updated".to_string()),
        None,
    )))
}

/// Delete a pharmacy
#[utoipa::path(
    delete,
    path = "/api/pharmacies/{id}",
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID")
    ),
    responses(
        (status = 200, description = "Pharmacy deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies",
    security(("bearer_auth" = []))
)]
pub async fn delete_pharmacy(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Pharmacy deleted".to_string()),
        None,
    )))
}

/// Put a pharmacy on duty
#[utoipa::path(
    patch,
    path = "/api/pharmacies/{id}/set-on-duty",
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID")
    ),
    responses(
        (status = 200, description = "Pharmacy is on duty", body = ApiResponse<PharmacyResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies",
    security(("bearer_auth" = []))
)]
pub async fn set_on_duty(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    let pharmacy = service.set_on_duty(id, true).await?;
    Ok(Json(ApiResponse::success(Some(pharmacy), None, None)))
}

/// Take a pharmacy off duty
#[utoipa::path(
    patch,
    path = "/api/pharmacies/{id}/set-off-duty",
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID")
    ),
    responses(
        (status = 200, description = "Pharmacy is off duty", body = ApiResponse<PharmacyResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Pharmacy not found")
    ),
    tag = "pharmacies",
    security(("bearer_auth" = []))
)]
pub async fn set_off_duty(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PharmacyService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PharmacyResponseDto>>> {
    let pharmacy = service.set_on_duty(id, false).await?;
    Ok(Json(ApiResponse::success(Some(pharmacy), None, None)))
}
