//! Review persistence.
//!
//! Inserting a review and recomputing the pharmacy rating happen as one unit,
//! so the trait exposes them as a single operation.

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::InMemoryReviewStore;
pub use postgres::PgReviewStore;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reviews::models::{NewReview, Review};

/// A stored review with the pharmacy rating it produced
#[derive(Debug, Clone)]
pub struct RatedReview {
    pub review: Review,
    pub pharmacy_rating: Decimal,
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn pharmacy_exists(&self, pharmacy_id: Uuid) -> Result<bool>;

    /// Newest first
    async fn list_for_pharmacy(&self, pharmacy_id: Uuid) -> Result<Vec<Review>>;

    /// Store the review and set the pharmacy rating to the average of all its
    /// reviews. `None` when the pharmacy does not exist.
    async fn insert_and_rerate(&self, review: NewReview) -> Result<Option<RatedReview>>;
}
