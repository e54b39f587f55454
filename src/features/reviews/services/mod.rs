pub mod rating;
mod review_service;

pub use review_service::ReviewService;
