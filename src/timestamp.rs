//! Response-date parsing and key timestamp rendering.
//!
//! Capture records carry the HTTP `date` header in RFC 1123 form
//! (`Mon, 02 Jan 2006 15:04:05 GMT`). Keys carry it as 14 digits.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use regex::Regex;

use crate::error::{Error, Result};

/// Historical key layout: year, minute, day, 12-hour clock, minute, second.
const LEGACY_PATTERN: &str = "%Y%M%d%I%M%S";

/// Calendar layout: year, month, day, 24-hour clock, minute, second.
const CALENDAR_PATTERN: &str = "%Y%m%d%H%M%S";

/// Date and time fields of an HTTP date, before the zone token.
const HTTP_DATE_PATTERN: &str = "%a, %d %b %Y %H:%M:%S";

/// `Ddd, d Mon yyyy HH:mm:ss zzz`, split into the local part and the zone.
#[allow(clippy::expect_used)]
static HTTP_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][a-z]{2}, \d{1,2} [A-Z][a-z]{2} \d{4} \d{2}:\d{2}:\d{2}) (\S+)$")
        .expect("valid regex")
});

/// Numeric zone offset, `+hhmm` or `+hh:mm`.
#[allow(clippy::expect_used)]
static NUMERIC_ZONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("valid regex"));

/// Zone abbreviations seen in HTTP `date` headers, with their UTC offset in seconds.
const ZONE_ABBREVIATIONS: &[(&str, i32)] = &[
    ("GMT", 0),
    ("UTC", 0),
    ("UT", 0),
    ("Z", 0),
    ("WET", 0),
    ("WEST", 3600),
    ("BST", 3600),
    ("CET", 3600),
    ("CEST", 2 * 3600),
    ("EET", 2 * 3600),
    ("EEST", 3 * 3600),
    ("MSK", 3 * 3600),
    ("HKT", 8 * 3600),
    ("JST", 9 * 3600),
    ("KST", 9 * 3600),
    ("AEST", 10 * 3600),
    ("AEDT", 11 * 3600),
    ("EST", -5 * 3600),
    ("EDT", -4 * 3600),
    ("CST", -6 * 3600),
    ("CDT", -5 * 3600),
    ("MST", -7 * 3600),
    ("MDT", -6 * 3600),
    ("PST", -8 * 3600),
    ("PDT", -7 * 3600),
];

/// Digit layout of the timestamp field in record keys.
///
/// Keys produced by earlier runs of this pipeline place the minute-of-hour
/// where the month would be expected and use a 12-hour clock. `Legacy`
/// renders the timestamp field exactly as those keys did; `Calendar` renders
/// the real calendar month and a 24-hour clock. The other key fields come
/// from the parsed URL (lowercased host, `/` for an empty path) and are not
/// affected by this choice. Switching layouts changes every key, so pick one
/// per dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimestampLayout {
    /// `yyyy` `mm`(minute) `dd` `hh`(01-12) `mm`(minute) `ss`.
    #[default]
    Legacy,
    /// `yyyy` `MM`(month) `dd` `HH`(00-23) `mm` `ss`.
    Calendar,
}

impl TimestampLayout {
    /// Render `datetime` in its own zone using this layout.
    ///
    /// # Example
    ///
    /// ```
    /// use warc_html::timestamp::{parse_http_date, TimestampLayout};
    ///
    /// let date = parse_http_date("Mon, 02 Jan 2006 15:04:05 GMT")?;
    /// assert_eq!(TimestampLayout::Calendar.format(&date), "20060102150405");
    /// assert_eq!(TimestampLayout::Legacy.format(&date), "20060402030405");
    /// # Ok::<(), warc_html::Error>(())
    /// ```
    #[must_use]
    pub fn format(self, datetime: &DateTime<FixedOffset>) -> String {
        let pattern = match self {
            Self::Legacy => LEGACY_PATTERN,
            Self::Calendar => CALENDAR_PATTERN,
        };
        datetime.format(pattern).to_string()
    }
}

/// Parse an HTTP `date` header value (`Ddd, d Mon yyyy HH:mm:ss zzz`).
///
/// Weekday, four-digit year and seconds are required, and the weekday must
/// match the date. The zone is either an abbreviation such as `GMT`, `UTC`
/// or `CEST`, or a numeric offset like `-0500`. It is kept as a fixed offset
/// so that formatting renders the same wall-clock fields the header carried.
///
/// # Errors
///
/// Returns `Error::InvalidDate` when the value does not have that shape,
/// names an unknown zone, or describes an impossible date.
pub fn parse_http_date(value: &str) -> Result<DateTime<FixedOffset>> {
    let invalid = |reason: String| Error::InvalidDate {
        value: value.to_string(),
        reason,
    };

    let captures = HTTP_DATE_RE
        .captures(value)
        .ok_or_else(|| invalid("expected `Ddd, d Mon yyyy HH:mm:ss zzz`".to_string()))?;
    let (local, zone) = (&captures[1], &captures[2]);

    let offset = zone_offset(zone).ok_or_else(|| invalid(format!("unknown zone {zone:?}")))?;
    let naive = NaiveDateTime::parse_from_str(local, HTTP_DATE_PATTERN)
        .map_err(|e| invalid(e.to_string()))?;

    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| invalid("ambiguous local time".to_string()))
}

/// Resolve a zone token to a fixed offset.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    if let Some((_, seconds)) = ZONE_ABBREVIATIONS.iter().find(|(name, _)| *name == zone) {
        return FixedOffset::east_opt(*seconds);
    }

    let captures = NUMERIC_ZONE_RE.captures(zone)?;
    let hours: i32 = captures[2].parse().ok()?;
    let minutes: i32 = captures[3].parse().ok()?;
    let seconds = hours * 3600 + minutes * 60;
    FixedOffset::east_opt(if &captures[1] == "-" { -seconds } else { seconds })
}
