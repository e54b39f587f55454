use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reviews::handlers;
use crate::features::reviews::services::ReviewService;

/// Public review listing
pub fn public_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route("/api/pharmacies/{id}/reviews", get(handlers::list_reviews))
        .with_state(service)
}

/// Review submission; requires an authenticated principal
pub fn protected_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route("/api/pharmacies/{id}/reviews", post(handlers::create_review))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reviews::store::InMemoryReviewStore;
    use crate::shared::test_helpers::with_user_auth;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    async fn setup() -> (Arc<ReviewService>, Uuid) {
        let store = Arc::new(InMemoryReviewStore::default());
        let pharmacy_id = Uuid::now_v7();
        store.add_pharmacy(pharmacy_id).await;
        (Arc::new(ReviewService::new(store)), pharmacy_id)
    }

    fn review_path(pharmacy_id: Uuid) -> String {
        format!("/api/pharmacies/{}/reviews", pharmacy_id)
    }

    fn server(service: Arc<ReviewService>) -> TestServer {
        let app = Router::new()
            .merge(with_user_auth(protected_routes(service.clone())))
            .merge(public_routes(service));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_review_is_unauthorized() {
        let (service, pharmacy_id) = setup().await;
        let server = TestServer::new(protected_routes(service)).unwrap();

        let response = server
            .post(&review_path(pharmacy_id))
            .json(&json!({ "rating": 5 }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_rejected() {
        let (service, pharmacy_id) = setup().await;
        let server = server(service);

        let response = server
            .post(&review_path(pharmacy_id))
            .json(&json!({ "rating": 6, "comment": "great" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_pharmacy_id_is_rejected() {
        let (service, _) = setup().await;
        let server = server(service);

        let response = server.get("/api/pharmacies/not-a-uuid/reviews").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_review_of_unknown_pharmacy_is_not_found() {
        let (service, _) = setup().await;
        let server = server(service);

        let response = server
            .post(&review_path(Uuid::now_v7()))
            .json(&json!({ "rating": 4 }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server.get(&review_path(Uuid::now_v7())).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_created_review_is_listed() {
        let (service, pharmacy_id) = setup().await;
        let server = server(service);

        let response = server
            .post(&review_path(pharmacy_id))
            .json(&json!({ "rating": 4, "comment": "Friendly staff" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["rating"], 4);
        assert_eq!(body["data"]["userId"], "test-user-sub");

        let listed: Value = server.get(&review_path(pharmacy_id)).await.json();
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["data"][0]["comment"], "Friendly staff");
    }
}
