//! Per-record HTML extraction.
//!
//! [`HtmlExtractor`] turns one capture record into a `(key, text)` pair or
//! [`ExtractionResult::Empty`]. It holds only read-only configuration, so a
//! single instance can be shared by any number of worker threads.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::charset::{decode_payload, CharsetResolver};
use crate::error::{Error, Result};
use crate::key::{parse_target_uri, RecordKey};
use crate::options::Options;
use crate::record::CaptureRecord;
use crate::timestamp::parse_http_date;

/// Media type a record must declare to be extracted.
const HTML_CONTENT_TYPE: &str = "text/html";

/// Outcome of extracting one capture record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExtractionResult {
    /// The record held HTML that was keyed and decoded.
    Extracted {
        /// Composite record key, never empty.
        key: String,
        /// Decoded payload.
        text: String,
    },
    /// The record held no usable HTML.
    Empty,
}

impl ExtractionResult {
    /// Whether this result carries a pair.
    #[must_use]
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }

    /// The `(key, text)` pair, if any.
    #[must_use]
    pub fn into_pair(self) -> Option<(String, String)> {
        match self {
            Self::Extracted { key, text } => Some((key, text)),
            Self::Empty => None,
        }
    }
}

/// Extracts keyed HTML text from capture records.
#[derive(Debug, Clone, Default)]
pub struct HtmlExtractor {
    options: Options,
    charsets: CharsetResolver,
}

impl HtmlExtractor {
    /// Create an extractor with the given options.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let charsets = CharsetResolver::new(options.default_charset.clone());
        Self { options, charsets }
    }

    /// The options this extractor was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Extract a record, mapping every failure to `ExtractionResult::Empty`.
    ///
    /// # Example
    ///
    /// ```
    /// use warc_html::{CaptureRecord, ExtractionResult, HtmlExtractor};
    ///
    /// let response = b"HTTP/1.1 200 OK\r\n\
    ///     Content-Type: text/html; charset=UTF-8\r\n\
    ///     Date: Mon, 02 Jan 2006 15:04:05 GMT\r\n\r\n\
    ///     <html></html>".to_vec();
    /// let record = CaptureRecord::from_http_response(
    ///     Some("http://example.com/page?x=1".to_string()),
    ///     response,
    /// );
    ///
    /// let result = HtmlExtractor::default().extract(record);
    /// assert_eq!(
    ///     result,
    ///     ExtractionResult::Extracted {
    ///         key: "http::example.com::/page::x=1::20060402030405".to_string(),
    ///         text: "<html></html>".to_string(),
    ///     }
    /// );
    /// ```
    #[must_use]
    pub fn extract(&self, record: CaptureRecord) -> ExtractionResult {
        let target_uri = record.target_uri.clone();
        match self.try_extract(record) {
            Ok((key, text)) => {
                log::trace!("extracted {key} ({} chars)", text.len());
                ExtractionResult::Extracted { key, text }
            }
            Err(err) => {
                log::debug!("skipping record {target_uri:?}: {err}");
                ExtractionResult::Empty
            }
        }
    }

    /// Extract a record, reporting the first step that failed.
    ///
    /// # Errors
    ///
    /// Returns the `Error` of the first failing step: missing or non-HTML
    /// metadata, an invalid URL or date, an unknown charset, an unreadable
    /// payload, or a payload that is not valid in the resolved charset.
    pub fn try_extract(&self, record: CaptureRecord) -> Result<(String, String)> {
        let CaptureRecord {
            target_uri,
            http_header,
            mut payload,
        } = record;

        let header = http_header.ok_or(Error::MissingHttpHeader)?;
        let content_type = header.content_type.as_deref().ok_or(Error::MissingContentType)?;
        if !content_type.contains(HTML_CONTENT_TYPE) {
            return Err(Error::NotHtml(content_type.to_string()));
        }
        let target_uri = target_uri.ok_or(Error::MissingTargetUri)?;

        let url = parse_target_uri(&target_uri)?;
        let date = header.header("date").ok_or(Error::MissingDate)?;
        let datetime = parse_http_date(date)?;
        let key = RecordKey::from_parts(&url, self.options.timestamp_layout.format(&datetime));

        let charset = self.charsets.resolve(Some(content_type));
        let mut bytes = Vec::new();
        payload.read_to_end(&mut bytes)?;
        let text = decode_payload(&bytes, &charset)?;

        Ok((key.to_string(), text))
    }
}
