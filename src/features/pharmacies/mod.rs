//! Pharmacy directory and guard-duty discovery.
//!
//! Locates on-duty ("de garde") pharmacies around a point, resolves the
//! opening hours that apply on a given day, and offers free-text search
//! combined with an optional proximity stage. Administrators maintain the
//! records.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/pharmacies` | No | List all pharmacies |
//! | GET | `/api/pharmacies/guard` | No | On-duty pharmacies near a point |
//! | GET | `/api/pharmacies/on-duty` | No | All on-duty pharmacies |
//! | GET | `/api/pharmacies/search` | No | Text and/or proximity search |
//! | GET | `/api/pharmacies/{id}` | No | Get pharmacy by id |
//! | POST | `/api/pharmacies` | Admin | Create pharmacy |
//! | PUT | `/api/pharmacies/{id}` | Admin | Partial update |
//! | DELETE | `/api/pharmacies/{id}` | Admin | Delete pharmacy |
//! | PATCH | `/api/pharmacies/{id}/set-on-duty` | Admin | Put on duty |
//! | PATCH | `/api/pharmacies/{id}/set-off-duty` | Admin | Take off duty |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::{PharmacyQueryService, PharmacyService};
pub use store::{PgPharmacyStore, PharmacyStore};
