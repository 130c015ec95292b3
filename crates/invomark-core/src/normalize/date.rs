use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// German month names and their English counterparts.
const GERMAN_MONTHS: [(&str, &str); 12] = [
    ("Januar", "January"),
    ("Februar", "February"),
    ("März", "March"),
    ("April", "April"),
    ("Mai", "May"),
    ("Juni", "June"),
    ("Juli", "July"),
    ("August", "August"),
    ("September", "September"),
    ("Oktober", "October"),
    ("November", "November"),
    ("Dezember", "December"),
];

/// Accepted layouts, tried in order: "1. März 2024", "Nov  26, 2016".
const DATE_FORMATS: [&str; 2] = ["%d. %B %Y", "%b %d, %Y"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedDate {
    Date(NaiveDate),
    /// The keyword for the date was not found in the document.
    NotFound,
    UnknownFormat,
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            NormalizedDate::NotFound => write!(f, "N/A"),
            NormalizedDate::UnknownFormat => write!(f, "Unknown Format"),
        }
    }
}

impl Serialize for NormalizedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse an invoice date into a calendar date.
///
/// The first German month name found is translated to English before parsing.
pub fn normalize_date(raw: &str) -> NormalizedDate {
    let mut s = raw.trim().to_string();
    if let Some((german, english)) = GERMAN_MONTHS.iter().find(|(g, _)| s.contains(g)) {
        s = s.replacen(german, english, 1);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
        .map(NormalizedDate::Date)
        .unwrap_or(NormalizedDate::UnknownFormat)
}
