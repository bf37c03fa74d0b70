//! Charset resolution and payload decoding.
//!
//! The charset comes from the `charset` parameter of the HTTP content type,
//! falling back to a configured default. Decoding is strict: a payload that
//! is not valid in the resolved charset produces an error, never a partially
//! replaced string.

use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::error::{Error, Result};
use crate::options::DEFAULT_CHARSET;

/// Resolves the charset label for a record's content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetResolver {
    default: String,
}

impl Default for CharsetResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CHARSET)
    }
}

impl CharsetResolver {
    /// Create a resolver falling back to `default`.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
        }
    }

    /// The label returned when no charset can be read from a content type.
    #[must_use]
    pub fn default_charset(&self) -> &str {
        &self.default
    }

    /// Resolve the charset label for `content_type`.
    ///
    /// The label is everything after the first `=` of the last block that
    /// mentions `charset`, untrimmed and unvalidated. A block without `=` is
    /// returned whole. Unknown labels surface later as decode failures.
    ///
    /// ```
    /// use warc_html::CharsetResolver;
    ///
    /// let resolver = CharsetResolver::default();
    /// assert_eq!(resolver.resolve(Some("text/html; charset=ISO-8859-1")), "ISO-8859-1");
    /// assert_eq!(resolver.resolve(Some("text/html")), "UTF-8");
    /// assert_eq!(resolver.resolve(None), "UTF-8");
    /// ```
    #[must_use]
    pub fn resolve(&self, content_type: Option<&str>) -> String {
        content_type
            .filter(|ct| ct.contains("charset"))
            .and_then(charset_parameter)
            .map_or_else(|| self.default.clone(), str::to_string)
    }
}

/// Read the value of the last `charset` parameter block.
fn charset_parameter(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .filter(|block| block.contains("charset"))
        .last()
        .map(|block| block.split_once('=').map_or(block, |(_, value)| value))
}

/// Labels naming true ISO-8859-1, where every byte maps to the code point
/// of the same value.
const LATIN1_LABELS: &[&str] = &[
    "ISO-8859-1",
    "ISO8859-1",
    "ISO_8859-1",
    "ISO8859_1",
    "ISO_8859_1",
    "ISO_8859-1:1987",
    "8859_1",
    "latin1",
    "l1",
    "IBM819",
    "IBM-819",
    "cp819",
    "819",
    "iso-ir-100",
    "csISOLatin1",
];

/// Look up the encoding for a charset label.
///
/// Lookup is case-insensitive and follows the WHATWG encoding standard,
/// except that labels with surrounding whitespace are rejected rather than
/// trimmed.
///
/// # Errors
///
/// Returns `Error::UnknownCharset` for empty, padded or unrecognized labels.
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    if label.trim() != label {
        return Err(Error::UnknownCharset(label.to_string()));
    }
    Encoding::for_label_no_replacement(label.as_bytes())
        .ok_or_else(|| Error::UnknownCharset(label.to_string()))
}

fn is_latin1_label(label: &str) -> bool {
    LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label))
}

/// Decode a whole payload with the charset named by `label`.
///
/// ISO-8859-1 labels decode byte for byte, so 0x80-0x9F stay C1 controls
/// instead of becoming windows-1252 punctuation. A byte order mark is kept
/// as U+FEFF rather than being allowed to switch the encoding.
///
/// # Errors
///
/// Returns `Error::UnknownCharset` if the label is not recognized, or
/// `Error::Decode` if the payload contains malformed sequences.
///
/// # Example
///
/// ```
/// use warc_html::charset::decode_payload;
///
/// let text = decode_payload(b"Caf\xE9", "ISO-8859-1")?;
/// assert_eq!(text, "Café");
/// assert!(decode_payload(b"Caf\xE9", "UTF-8").is_err());
/// # Ok::<(), warc_html::Error>(())
/// ```
pub fn decode_payload(bytes: &[u8], label: &str) -> Result<String> {
    if is_latin1_label(label) {
        return Ok(encoding_rs::mem::decode_latin1(bytes).into_owned());
    }

    let encoding = encoding_for_label(label)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| Error::Decode {
            charset: encoding.name().to_string(),
        })
}
