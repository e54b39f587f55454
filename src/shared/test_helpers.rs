#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::features::pharmacies::models::{Coordinates, NewPharmacy, OpeningHoursEntry};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-admin-sub".to_string(),
        email: Some("admin@example.com".to_string()),
        roles: vec!["admin".to_string()],
        is_admin: true,
    }
}

#[cfg(test)]
pub fn create_regular_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-user-sub".to_string(),
        email: None,
        roles: vec!["user".to_string()],
        is_admin: false,
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
async fn inject_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_regular_user());
    next.run(request).await
}

#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

#[cfg(test)]
pub fn with_user_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_user_middleware))
}

/// A valid pharmacy open Monday 08:00-20:00, with an email unique per call
#[cfg(test)]
pub fn new_pharmacy(name: &str, latitude: f64, longitude: f64, is_on_duty: bool) -> NewPharmacy {
    NewPharmacy {
        name: name.to_string(),
        phone: "+212 524 00 00 00".to_string(),
        email: format!("{}@pharmacies.test", uuid::Uuid::now_v7()),
        city: "Youssoufia".to_string(),
        detailed_address: format!("{} street", name),
        coordinates: Coordinates {
            latitude,
            longitude,
        },
        is_on_duty,
        opening_hours: vec![OpeningHoursEntry {
            day: "Monday".to_string(),
            open: "08:00".to_string(),
            close: "20:00".to_string(),
        }],
        services: Vec::new(),
        image: None,
        image_mobile: None,
        description: None,
    }
}
