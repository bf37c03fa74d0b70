//! # warc-html
//!
//! Extracts HTML documents from web-archive capture records and re-emits
//! them as `(key, text)` pairs for downstream storage.
//!
//! Each record is handled on its own: records without an HTML content type,
//! a parseable target URI or a valid response date are dropped, the rest are
//! keyed by `protocol::host::path::query::timestamp` and decoded with the
//! charset declared in their content type.
//!
//! ## Quick Start
//!
//! ```rust
//! use warc_html::{CaptureRecord, HtmlExtractor};
//!
//! let response = b"HTTP/1.1 200 OK\r\n\
//!     Content-Type: text/html; charset=ISO-8859-1\r\n\
//!     Date: Mon, 02 Jan 2006 15:04:05 GMT\r\n\r\n\
//!     <p>Caf\xE9</p>".to_vec();
//! let record = CaptureRecord::from_http_response(
//!     Some("https://example.com/menu".to_string()),
//!     response,
//! );
//!
//! let (key, text) = HtmlExtractor::default().extract(record).into_pair().unwrap();
//! assert_eq!(key, "https::example.com::/menu::::20060402030405");
//! assert_eq!(text, "<p>Café</p>");
//! ```
//!
//! ## Runs
//!
//! [`pipeline::run`] drives a whole record stream through an extractor on
//! the rayon thread pool and hands surviving pairs to a [`Sink`].

mod error;
mod options;

/// Capture records and HTTP response headers.
pub mod record;

/// Response-date parsing and key timestamp layouts.
pub mod timestamp;

/// Composite record keys.
pub mod key;

/// Charset resolution and strict payload decoding.
pub mod charset;

/// Per-record extraction.
pub mod extractor;

/// Filtering of empty results.
pub mod filter;

/// Batched parallel runs and sinks.
pub mod pipeline;

// Public API - re-exports
pub use charset::CharsetResolver;
pub use error::{Error, Result};
pub use extractor::{ExtractionResult, HtmlExtractor};
pub use key::RecordKey;
pub use options::{Options, DEFAULT_CHARSET};
pub use pipeline::{JsonLinesSink, PipelineStats, Sink, VecSink};
pub use record::{CaptureRecord, HttpHeader};
pub use timestamp::TimestampLayout;

/// Extracts one record using default options.
///
/// Equivalent to `HtmlExtractor::default().extract(record)`.
#[must_use]
pub fn extract(record: CaptureRecord) -> ExtractionResult {
    HtmlExtractor::default().extract(record)
}
