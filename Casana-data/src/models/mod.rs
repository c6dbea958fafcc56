pub mod alerts;
pub mod vitals;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub use alerts::VendorAlert;
pub use vitals::VendorVitalReading;

/// Parse a timestamp as the vendor sends it.
///
/// The vendor is not consistent: most records carry RFC 3339 strings, older
/// ones use `YYYY-MM-DD HH:MM:SS` (assumed UTC) or a bare date. Anything else
/// yields `None`.
pub fn parse_vendor_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
