pub mod distance;
pub mod guard_duty_planner;
pub mod opening_hours;
mod pharmacy_service;
pub mod proximity;
mod query_service;
pub mod search_planner;

pub use guard_duty_planner::GuardDutyResult;
pub use pharmacy_service::PharmacyService;
pub use query_service::PharmacyQueryService;
pub use search_planner::SearchResult;
