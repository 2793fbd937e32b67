// src/infrastructure/repositories/json/model.rs

use crate::domain::bookmark::Bookmark;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// On-disk form of a bookmark, one object of the stored JSON array.
///
/// `created_at` keeps the offset it was written with, so records the store
/// only passes through are rewritten with the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonBookmark {
    pub title: String,
    pub content: String,
    #[serde(with = "rfc3339_nanos")]
    pub created_at: DateTime<FixedOffset>,
}

impl From<&Bookmark> for JsonBookmark {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            title: bookmark.title.clone(),
            content: bookmark.content.clone(),
            created_at: bookmark.created_at.fixed_offset(),
        }
    }
}

impl From<JsonBookmark> for Bookmark {
    fn from(record: JsonBookmark) -> Self {
        Bookmark {
            title: record.title,
            content: record.content,
            created_at: record.created_at.with_timezone(&Utc),
        }
    }
}

/// RFC 3339 with up to nine fractional digits, trailing zeros dropped.
/// A zero offset is written as `Z`.
///
/// `2021-01-01T00:00:00Z`, `2021-01-01T00:00:00.5Z`,
/// `2021-01-01T02:00:00.000000002+02:00`
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    let mut out = ts.to_rfc3339_opts(SecondsFormat::Secs, true);
    // leap seconds carry the extra second in the nanosecond field
    let nanos = ts.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        // the fraction goes before the offset: `Z` or `+HH:MM`
        let at = if out.ends_with('Z') {
            out.len() - 1
        } else {
            out.len() - 6
        };
        out.insert_str(at, &format!(".{}", fraction.trim_end_matches('0')));
    }
    out
}

/// Accepts any RFC 3339 offset and keeps it
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
}

mod rfc3339_nanos {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_timestamp(&s).map_err(|e| de::Error::custom(format!("invalid timestamp '{}': {}", s, e)))
    }
}
