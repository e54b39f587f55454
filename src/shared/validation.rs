use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 24-hour clock time used by opening hours
    /// - Valid: "08:00", "23:59", "00:00"
    /// - Invalid: "8:00", "24:00", "12:60", "12h30"
    pub static ref TIME_HHMM_REGEX: Regex = Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();

    /// Phone numbers: digits with optional leading "+" and spaces, dots or dashes
    /// - Valid: "+212 5 24 46 12 34", "0524-461234", "0600000000"
    /// - Invalid: "call me", "12", "+"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 .\-]{5,19}$").unwrap();
}
