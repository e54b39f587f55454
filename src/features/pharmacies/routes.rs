use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::pharmacies::handlers;
use crate::features::pharmacies::services::{PharmacyQueryService, PharmacyService};

/// Public read routes
pub fn public_routes(service: Arc<PharmacyQueryService>) -> Router {
    Router::new()
        .route("/api/pharmacies", get(handlers::list_pharmacies))
        // Static segments must come before {id}
        .route("/api/pharmacies/guard", get(handlers::find_guard_pharmacies))
        .route("/api/pharmacies/on-duty", get(handlers::list_on_duty_pharmacies))
        .route("/api/pharmacies/search", get(handlers::search_pharmacies))
        .route("/api/pharmacies/{id}", get(handlers::get_pharmacy))
        .with_state(service)
}

/// Mutation routes. Handlers require an admin principal; the caller adds the
/// token-validating layer.
pub fn admin_routes(service: Arc<PharmacyService>) -> Router {
    Router::new()
        .route("/api/pharmacies", post(handlers::create_pharmacy))
        .route(
            "/api/pharmacies/{id}",
            put(handlers::update_pharmacy).delete(handlers::delete_pharmacy),
        )
        .route(
            "/api/pharmacies/{id}/set-on-duty",
            patch(handlers::set_on_duty),
        )
        .route(
            "/api/pharmacies/{id}/set-off-duty",
            patch(handlers::set_off_duty),
        )
        .with_state(service)
}
