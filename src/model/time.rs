//! Timestamp encoding and display formatting.
//!
//! Timestamps are local date-times with no timezone offset, persisted
//! with second precision. Encode and decode share one format string so
//! a decoded value re-encodes byte-identically.

use chrono::{Local, NaiveDateTime, Timelike};

/// Canonical on-disk timestamp format (second precision, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time, truncated to whole seconds.
///
/// Truncation keeps in-memory timestamps identical to what a save/load
/// cycle would produce.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Serde codec for [`NaiveDateTime`] using [`TIMESTAMP_FORMAT`].
///
/// Attach with `#[serde(with = "crate::model::time::timestamp")]`.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Format a timestamp for display (e.g. "Mar 04, 2026 09:15").
pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format("%b %d, %Y %H:%M").to_string()
}

/// Format a timestamp as a short date (e.g. "Mar 04, 2026").
pub fn format_date(value: NaiveDateTime) -> String {
    value.format("%b %d, %Y").to_string()
}

/// Relative time string (e.g. "2 hours ago").
pub fn relative_time(value: NaiveDateTime) -> String {
    let minutes = (now() - value).num_minutes();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if minutes < 1_440 {
        plural(minutes / 60, "hour")
    } else if minutes < 10_080 {
        plural(minutes / 1_440, "day")
    } else {
        format_date(value)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super::timestamp")]
        at: NaiveDateTime,
    }

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(9, 15, 42)
            .unwrap()
    }

    #[test]
    fn test_timestamp_round_trip_is_byte_identical() {
        let json = serde_json::to_string(&Stamped { at: sample() }).unwrap();
        assert_eq!(json, r#"{"at":"2026-03-04T09:15:42"}"#);

        let parsed: Stamped = serde_json::from_str(&json).unwrap();
        let reencoded = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, reencoded);
    }

    #[test]
    fn test_timestamp_rejects_offset_suffix() {
        let result: Result<Stamped, _> =
            serde_json::from_str(r#"{"at":"2026-03-04T09:15:42+02:00"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_now_has_no_subsecond_component() {
        assert_eq!(now().and_utc().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(format_date_time(sample()), "Mar 04, 2026 09:15");
        assert_eq!(format_date(sample()), "Mar 04, 2026");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = now();
        assert_eq!(relative_time(now), "Just now");
        assert_eq!(relative_time(now - chrono::Duration::minutes(5)), "5 minutes ago");
        assert_eq!(relative_time(now - chrono::Duration::hours(3)), "3 hours ago");
        assert_eq!(relative_time(now - chrono::Duration::days(2)), "2 days ago");
    }
}
