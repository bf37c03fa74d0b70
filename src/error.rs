//! Error types for warc-html.
//!
//! Every step of record extraction reports its failure through this enum.
//! The extractor collapses any of them into an empty result; only I/O on the
//! output side escapes a pipeline run.

/// Error type for extraction and pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The record carries no parsed HTTP header.
    #[error("record has no HTTP header")]
    MissingHttpHeader,

    /// The HTTP header block could not be parsed.
    #[error("malformed HTTP header: {0}")]
    MalformedHttpHeader(String),

    /// The HTTP header has no content type.
    #[error("record has no content type")]
    MissingContentType,

    /// The content type does not declare an HTML document.
    #[error("content type is not text/html: {0}")]
    NotHtml(String),

    /// The record has no target URI.
    #[error("record has no target URI")]
    MissingTargetUri,

    /// The target URI is not a parseable absolute URL.
    #[error("invalid target URI {uri:?}: {source}")]
    InvalidUrl {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP header has no `date` field.
    #[error("record has no date header")]
    MissingDate,

    /// The `date` header is not an RFC 1123 date.
    #[error("invalid date header {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },

    /// The resolved charset label names no known encoding.
    #[error("unknown charset {0:?}")]
    UnknownCharset(String),

    /// The payload bytes are not valid in the resolved charset.
    #[error("payload is not valid {charset}")]
    Decode { charset: String },

    /// Reading a payload or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing an output pair failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
