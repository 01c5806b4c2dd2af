//! Date handling for feed elements and `newznab:attr` values

use chrono::{DateTime, ParseError, Utc};

/// RFC 1123 with a numeric zone, e.g. `Mon, 02 Jan 2006 15:04:05 -0700`
pub const RFC1123Z: &str = "%a, %d %b %Y %H:%M:%S %z";

/// [`RFC1123Z`] after the `"Mon, "` prefix
const RFC1123Z_DATE: &str = "%d %b %Y %H:%M:%S %z";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    Rfc3339,
    Rfc1123Z,
}

impl DateFormat {
    pub fn parse(self, s: &str) -> Result<DateTime<Utc>, ParseError> {
        let s = s.trim();
        let parsed = match self {
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(s)?,
            // weekday is checked for spelling only, the date decides
            DateFormat::Rfc1123Z => match s.split_once(',') {
                Some((day, rest)) if WEEKDAYS.iter().any(|w| w.eq_ignore_ascii_case(day)) => {
                    DateTime::parse_from_str(rest.trim_start(), RFC1123Z_DATE)?
                }
                _ => DateTime::parse_from_str(s, RFC1123Z)?,
            },
        };
        Ok(parsed.with_timezone(&Utc))
    }
}

/// Formats tried, in order, for date-valued attributes
pub const ATTRIBUTE_DATE_FORMATS: &[DateFormat] = &[DateFormat::Rfc3339, DateFormat::Rfc1123Z];

/// Strict parse used for `<pubDate>` elements
pub fn parse_rfc1123z(s: &str) -> Result<DateTime<Utc>, ParseError> {
    DateFormat::Rfc1123Z.parse(s)
}

/// First format that accepts `s` wins; `None` when none do.
pub fn parse_first(s: &str, formats: &[DateFormat]) -> Option<DateTime<Utc>> {
    formats.iter().find_map(|format| format.parse(s).ok())
}
