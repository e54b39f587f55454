mod coordinates;
mod opening_hours;
mod pharmacy;

pub use coordinates::{Coordinates, GeoJsonPoint};
pub use opening_hours::{parse_weekday, weekday_name, OpeningHoursEntry};
pub use pharmacy::{NewPharmacy, Pharmacy, PharmacyChanges};
