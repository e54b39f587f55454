use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::pharmacies::{
    dtos as pharmacies_dtos, handlers as pharmacies_handlers, models as pharmacies_models,
};
use crate::features::reviews::{dtos as reviews_dtos, handlers as reviews_handlers};
use crate::shared::types::{ApiResponse, ListResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Pharmacies (public)
        pharmacies_handlers::list_pharmacies,
        pharmacies_handlers::find_guard_pharmacies,
        pharmacies_handlers::list_on_duty_pharmacies,
        pharmacies_handlers::search_pharmacies,
        pharmacies_handlers::get_pharmacy,
        // Pharmacies (admin)
        pharmacies_handlers::create_pharmacy,
        pharmacies_handlers::update_pharmacy,
        pharmacies_handlers::delete_pharmacy,
        pharmacies_handlers::set_on_duty,
        pharmacies_handlers::set_off_duty,
        // Reviews
        reviews_handlers::list_reviews,
        reviews_handlers::create_review,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Pharmacies
            pharmacies_models::GeoJsonPoint,
            pharmacies_models::OpeningHoursEntry,
            pharmacies_dtos::OpeningHoursEntryDto,
            pharmacies_dtos::CreatePharmacyDto,
            pharmacies_dtos::UpdatePharmacyDto,
            pharmacies_dtos::PharmacyResponseDto,
            pharmacies_dtos::GuardDutyResultDto,
            pharmacies_dtos::PharmacySearchResultDto,
            ApiResponse<pharmacies_dtos::PharmacyResponseDto>,
            ListResponse<pharmacies_dtos::PharmacyResponseDto>,
            ListResponse<pharmacies_dtos::GuardDutyResultDto>,
            ListResponse<pharmacies_dtos::PharmacySearchResultDto>,
            // Reviews
            reviews_dtos::CreateReviewDto,
            reviews_dtos::ReviewResponseDto,
            ApiResponse<reviews_dtos::ReviewResponseDto>,
            ListResponse<reviews_dtos::ReviewResponseDto>,
        )
    ),
    tags(
        (name = "pharmacies", description = "Pharmacy directory and guard-duty search"),
        (name = "reviews", description = "Pharmacy reviews and ratings"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Pharmacy Guard API",
        version = "0.1.0",
        description = "Locate on-duty pharmacies, search and review them",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_pharmacy_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/pharmacies",
            "/api/pharmacies/guard",
            "/api/pharmacies/search",
            "/api/pharmacies/{id}",
            "/api/pharmacies/{id}/set-on-duty",
            "/api/pharmacies/{id}/reviews",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_pharmacy_item_path_has_admin_operations() {
        let doc = ApiDoc::openapi();
        let item = &doc.paths.paths["/api/pharmacies/{id}"];
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "d".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
