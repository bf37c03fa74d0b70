//! Configuration options for record extraction.
//!
//! The `Options` struct is built once at startup and shared read-only by
//! every worker.

use crate::timestamp::TimestampLayout;

/// Charset used when a content type declares none.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Configuration options for extraction and pipeline runs.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use warc_html::{Options, TimestampLayout};
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     default_charset: "windows-1252".to_string(),
///     timestamp_layout: TimestampLayout::Calendar,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Charset label used when the content type has no `charset` parameter,
    /// or when that parameter cannot be parsed.
    ///
    /// Default: `"UTF-8"`
    pub default_charset: String,

    /// Digit layout of the timestamp field in record keys.
    ///
    /// Default: `TimestampLayout::Legacy`
    pub timestamp_layout: TimestampLayout,

    /// Number of records extracted in parallel per pipeline batch.
    ///
    /// Larger batches keep more worker threads busy at the cost of holding
    /// more payloads in memory. Values of `0` are treated as `1`.
    ///
    /// Default: `1024`
    pub batch_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_charset: DEFAULT_CHARSET.to_string(),
            timestamp_layout: TimestampLayout::default(),
            batch_size: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_utf8_and_legacy_layout() {
        let options = Options::default();
        assert_eq!(options.default_charset, "UTF-8");
        assert_eq!(options.timestamp_layout, TimestampLayout::Legacy);
        assert_eq!(options.batch_size, 1024);
    }

    #[test]
    fn struct_update_keeps_remaining_defaults() {
        let options = Options {
            batch_size: 8,
            ..Options::default()
        };
        assert_eq!(options.batch_size, 8);
        assert_eq!(options.default_charset, DEFAULT_CHARSET);
    }
}
