use chrono::Weekday;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One weekly opening-hours slot. `day` is stored as an English day name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OpeningHoursEntry {
    #[schema(example = "Monday")]
    pub day: String,
    #[schema(example = "08:00")]
    pub open: String,
    #[schema(example = "20:00")]
    pub close: String,
}

impl OpeningHoursEntry {
    pub fn weekday(&self) -> Option<Weekday> {
        parse_weekday(&self.day)
    }
}

/// Parse an English or French day name, ignoring case and surrounding spaces.
///
/// Legacy rows were written with French names; both resolve to the same weekday.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim().to_lowercase();
    let weekday = match name.as_str() {
        "monday" | "lundi" => Weekday::Mon,
        "tuesday" | "mardi" => Weekday::Tue,
        "wednesday" | "mercredi" => Weekday::Wed,
        "thursday" | "jeudi" => Weekday::Thu,
        "friday" | "vendredi" => Weekday::Fri,
        "saturday" | "samedi" => Weekday::Sat,
        "sunday" | "dimanche" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Canonical stored name for a weekday
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
