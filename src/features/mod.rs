pub mod auth;
pub mod pharmacies;
pub mod reviews;
