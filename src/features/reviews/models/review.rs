use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a pharmacy review
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    /// Subject of the reviewer's token
    pub user_id: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A review about to be inserted
#[derive(Debug, Clone)]
pub struct NewReview {
    pub pharmacy_id: Uuid,
    pub user_id: String,
    pub rating: i16,
    pub comment: Option<String>,
}
