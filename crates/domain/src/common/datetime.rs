//! Date parsing utilities for draft fields.
//!
//! Cached drafts may carry dates either as plain `YYYY-MM-DD` strings or as
//! full RFC3339 timestamps (what a browser's `Date.toJSON()` produces). Both
//! are accepted and rehydrated as a calendar date.

use chrono::{DateTime, NaiveDate, Utc};

/// Parses a calendar date from either `YYYY-MM-DD` or an RFC3339 timestamp.
///
/// # Examples
///
/// ```
/// use storykin_domain::common::parse_date_lenient;
/// use chrono::Datelike;
///
/// let d = parse_date_lenient("2019-05-03").unwrap();
/// assert_eq!(d.year(), 2019);
///
/// let d = parse_date_lenient("2019-05-03T00:00:00.000Z").unwrap();
/// assert_eq!(d.day(), 3);
/// ```
///
/// # Errors
///
/// Returns `chrono::ParseError` if neither format matches.
pub fn parse_date_lenient(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    let s = s.trim();
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc).date_naive()),
    }
}

/// Serde adapter for `Option<NaiveDate>` fields that tolerates timestamp strings.
///
/// Always serializes as `YYYY-MM-DD`. Empty strings deserialize as `None`.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_date_lenient(s)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", s, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(default, with = "lenient_date")]
        date: Option<NaiveDate>,
    }

    #[test]
    fn parses_plain_date() {
        let d = parse_date_lenient("2020-02-29").expect("leap day");
        assert_eq!((d.year(), d.month(), d.day()), (2020, 2, 29));
    }

    #[test]
    fn parses_timestamp_as_utc_date() {
        let d = parse_date_lenient("2018-07-01T23:30:00-02:00").expect("rfc3339");
        // 23:30 at -02:00 is already the next day in UTC
        assert_eq!((d.month(), d.day()), (7, 2));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date_lenient("yesterday").is_err());
    }

    #[test]
    fn serde_rehydrates_timestamp_strings() {
        let h: Holder =
            serde_json::from_str(r#"{"date":"2017-11-20T00:00:00.000Z"}"#).expect("deserialize");
        assert_eq!(h.date, NaiveDate::from_ymd_opt(2017, 11, 20));
        let json = serde_json::to_string(&h).expect("serialize");
        assert_eq!(json, r#"{"date":"2017-11-20"}"#);
    }

    #[test]
    fn serde_treats_empty_and_missing_as_none() {
        let h: Holder = serde_json::from_str(r#"{"date":""}"#).expect("empty");
        assert_eq!(h.date, None);
        let h: Holder = serde_json::from_str(r#"{}"#).expect("missing");
        assert_eq!(h.date, None);
    }
}
