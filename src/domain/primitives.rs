//! Domain primitives: ContactId and timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl ContactId {
    /// Create a ContactId from a raw integer.
    pub fn new(id: i64) -> Self {
        ContactId(id)
    }

    /// Get the underlying integer value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an ISO-8601 / RFC 3339 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    s.parse::<DateTime<Utc>>()
}

/// Render a timestamp as RFC 3339 text, keeping only the sub-second digits it needs.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_contact_id_display() {
        assert_eq!(ContactId::new(42).to_string(), "42");
    }

    #[test]
    fn test_contact_id_serializes_as_integer() {
        let json = serde_json::to_string(&ContactId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_parse_timestamp_normalizes_offset() {
        let ts = parse_timestamp("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_format_timestamp_is_parseable() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let text = format_timestamp(ts);
        assert_eq!(text, "2024-03-01T10:00:00Z");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }
}
