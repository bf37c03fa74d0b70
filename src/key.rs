//! Composite record keys.
//!
//! A key joins the URL protocol, hostname, path, query and the capture
//! timestamp with `::`:
//!
//! ```text
//! http::example.com::/page::x=1::20060402030405
//! ```

use std::fmt;

use url::Url;

use crate::error::{Error, Result};
use crate::timestamp::{parse_http_date, TimestampLayout};

/// Separator placed between key fields.
pub const KEY_SEPARATOR: &str = "::";

/// The five fields of a record key.
///
/// Fields are joined verbatim. A URL whose path or query itself contains
/// `::` yields a key that cannot be split back into its fields, so treat
/// rendered keys as opaque identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// URL scheme, e.g. `http`.
    pub protocol: String,
    /// Host name, empty for URLs without one.
    pub hostname: String,
    /// URL path, e.g. `/page`.
    pub path: String,
    /// Query string without the leading `?`, empty when absent.
    pub query: String,
    /// Capture timestamp, 14 digits.
    pub timestamp: String,
}

impl RecordKey {
    /// Build a key from a target URI and the response `date` header.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if `target_uri` is not an absolute URL,
    /// or `Error::InvalidDate` if `date` is not an RFC 1123 date.
    pub fn build(target_uri: &str, date: &str, layout: TimestampLayout) -> Result<Self> {
        let url = parse_target_uri(target_uri)?;
        let datetime = parse_http_date(date)?;
        Ok(Self::from_parts(&url, layout.format(&datetime)))
    }

    /// Assemble a key from an already parsed URL and a formatted timestamp.
    #[must_use]
    pub fn from_parts(url: &Url, timestamp: String) -> Self {
        Self {
            protocol: url.scheme().to_string(),
            hostname: url.host_str().unwrap_or_default().to_string(),
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
            timestamp,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.protocol,
            self.hostname,
            self.path,
            self.query,
            self.timestamp,
            sep = KEY_SEPARATOR
        )
    }
}

/// Parse a record's target URI as an absolute URL.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` with the parser's reason on failure.
pub fn parse_target_uri(target_uri: &str) -> Result<Url> {
    Url::parse(target_uri).map_err(|source| Error::InvalidUrl {
        uri: target_uri.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "Mon, 02 Jan 2006 15:04:05 GMT";

    #[test]
    fn joins_all_five_fields() {
        let key = RecordKey::build("http://example.com/page?x=1", DATE, TimestampLayout::Legacy)
            .expect("valid key");
        assert_eq!(key.to_string(), "http::example.com::/page::x=1::20060402030405");
    }

    #[test]
    fn missing_query_is_an_empty_field() {
        let key = RecordKey::build("https://example.com/a/b.html", DATE, TimestampLayout::Calendar)
            .expect("valid key");
        assert_eq!(key.query, "");
        assert_eq!(key.to_string(), "https::example.com::/a/b.html::::20060102150405");
    }

    #[test]
    fn bare_host_has_root_path() {
        let key = RecordKey::build("http://example.com", DATE, TimestampLayout::Calendar)
            .expect("valid key");
        assert_eq!(key.path, "/");
    }

    #[test]
    fn legacy_layout_leaves_host_and_path_normalised() {
        let key = RecordKey::build("http://EXAMPLE.com", DATE, TimestampLayout::Legacy)
            .expect("valid key");
        assert_eq!(key.to_string(), "http::example.com::/::::20060402030405");
    }

    #[test]
    fn fragment_is_not_part_of_the_key() {
        let key = RecordKey::build("http://example.com/p?q=1#top", DATE, TimestampLayout::Calendar)
            .expect("valid key");
        assert_eq!(key.query, "q=1");
        assert!(!key.to_string().contains("top"));
    }

    #[test]
    fn separator_inside_query_is_not_escaped() {
        let key = RecordKey::build("http://example.com/p?a::b", DATE, TimestampLayout::Calendar)
            .expect("valid key");
        assert_eq!(key.to_string().matches(KEY_SEPARATOR).count(), 5);
    }

    #[test]
    fn rejects_relative_uri() {
        let err = RecordKey::build("not a url", DATE, TimestampLayout::Legacy).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_bad_date() {
        let err = RecordKey::build("http://example.com/", "2006-01-02", TimestampLayout::Legacy)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }
}
