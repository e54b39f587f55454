use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RatedReview, ReviewStore};
use crate::core::error::Result;
use crate::features::reviews::models::{NewReview, Review};
use crate::features::reviews::services::rating::average_rating;

#[derive(Default)]
struct State {
    /// Known pharmacies and their current rating
    ratings: HashMap<Uuid, Decimal>,
    /// Insertion order
    reviews: Vec<Review>,
}

/// Process-local review store. One lock covers reviews and ratings, so an
/// insert and its rating update are never observed apart.
#[derive(Default)]
pub struct InMemoryReviewStore {
    state: RwLock<State>,
}

impl InMemoryReviewStore {
    pub async fn add_pharmacy(&self, pharmacy_id: Uuid) {
        self.state
            .write()
            .await
            .ratings
            .insert(pharmacy_id, Decimal::ZERO);
    }

    pub async fn rating(&self, pharmacy_id: Uuid) -> Option<Decimal> {
        self.state.read().await.ratings.get(&pharmacy_id).copied()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn pharmacy_exists(&self, pharmacy_id: Uuid) -> Result<bool> {
        Ok(self.state.read().await.ratings.contains_key(&pharmacy_id))
    }

    async fn list_for_pharmacy(&self, pharmacy_id: Uuid) -> Result<Vec<Review>> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .iter()
            .rev()
            .filter(|r| r.pharmacy_id == pharmacy_id)
            .cloned()
            .collect())
    }

    async fn insert_and_rerate(&self, new: NewReview) -> Result<Option<RatedReview>> {
        let mut state = self.state.write().await;
        if !state.ratings.contains_key(&new.pharmacy_id) {
            return Ok(None);
        }

        let review = Review {
            id: Uuid::now_v7(),
            pharmacy_id: new.pharmacy_id,
            user_id: new.user_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        state.reviews.push(review.clone());

        let ratings: Vec<i16> = state
            .reviews
            .iter()
            .filter(|r| r.pharmacy_id == review.pharmacy_id)
            .map(|r| r.rating)
            .collect();
        let pharmacy_rating = average_rating(&ratings);
        state.ratings.insert(review.pharmacy_id, pharmacy_rating);

        Ok(Some(RatedReview {
            review,
            pharmacy_rating,
        }))
    }
}
