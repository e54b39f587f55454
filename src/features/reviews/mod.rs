//! Pharmacy reviews.
//!
//! Authenticated users rate a pharmacy from 1 to 5 with an optional comment.
//! The pharmacy's `rating` is the average of its reviews rounded to one
//! decimal, recomputed in the same transaction as each insert.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/pharmacies/{id}/reviews` | No | List reviews |
//! | POST | `/api/pharmacies/{id}/reviews` | Yes | Add review |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::ReviewService;
pub use store::PgReviewStore;
