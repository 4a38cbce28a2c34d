use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A UTC instant. Records carry these; conversation turns keep epoch
/// milliseconds taken from [`Timestamp::as_unix_millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self < other
    }

    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> Timestamp {
        Timestamp::from_datetime(Utc.timestamp_millis_opt(millis).unwrap())
    }

    #[test]
    fn now_lies_between_surrounding_reads() {
        let before = Utc::now();
        let ts = Timestamp::now();
        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &Utc::now());
    }

    #[test]
    fn ordering_is_strict() {
        let earlier = at(1_000);
        let later = at(2_000);

        assert!(earlier.is_before(&later));
        assert!(!later.is_before(&earlier));
        assert!(!earlier.is_before(&earlier));
    }

    #[test]
    fn millis_and_rfc3339_views_agree() {
        let ts = at(1_705_276_800_123);
        assert_eq!(ts.as_unix_millis(), 1_705_276_800_123);
        assert!(ts.to_rfc3339().starts_with("2024-01-15T00:00:00.123"));
    }

    #[test]
    fn deserializes_from_rfc3339_string() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(ts.as_unix_millis(), 1_705_314_600_000);
    }
}
