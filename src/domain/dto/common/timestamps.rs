use chrono::{DateTime, Utc};

/// Converts a stored BSON timestamp into a UTC `chrono` value for responses.
pub fn to_utc(value: mongodb::bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}
