use chrono::{Datelike, NaiveDate};

use crate::features::pharmacies::models::OpeningHoursEntry;

/// The slot that applies on `date`'s weekday, if any.
///
/// Entries whose `day` does not parse are skipped. When several entries share
/// a weekday the first one in stored order wins.
pub fn resolve_for_date(entries: &[OpeningHoursEntry], date: NaiveDate) -> Option<&OpeningHoursEntry> {
    let weekday = date.weekday();
    entries.iter().find(|entry| entry.weekday() == Some(weekday))
}
