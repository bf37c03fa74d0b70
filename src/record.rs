//! Capture records as handed over by an archive reader.
//!
//! A record bundles the captured URL, the parsed HTTP response header and a
//! read-once payload stream. Archive readers that only expose the raw HTTP
//! response can build records with [`CaptureRecord::from_http_response`].

use std::fmt;
use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Match an HTTP response status line, e.g. `HTTP/1.1 200 OK`.
#[allow(clippy::expect_used)]
static STATUS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^HTTP/\d(?:\.\d)?\s+(\d{3})(?:\s+(.*))?$").expect("valid regex")
});

/// Parsed HTTP response header of a capture record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeader {
    /// Status code from the status line, if one was present.
    pub status_code: Option<u16>,

    /// Value of the `Content-Type` field.
    pub content_type: Option<String>,

    /// All header fields in wire order, names as written.
    pub fields: Vec<(String, String)>,
}

impl HttpHeader {
    /// Parse an HTTP response header block (status line plus fields, without
    /// the terminating blank line).
    ///
    /// Lines without a `:` are ignored; lines starting with whitespace
    /// continue the previous field.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedHttpHeader` if the block does not start with
    /// an HTTP status line.
    ///
    /// # Example
    ///
    /// ```
    /// use warc_html::HttpHeader;
    ///
    /// let header = HttpHeader::parse("HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n")?;
    /// assert_eq!(header.status_code, Some(200));
    /// assert_eq!(header.content_type.as_deref(), Some("text/html"));
    /// # Ok::<(), warc_html::Error>(())
    /// ```
    pub fn parse(block: &str) -> Result<Self> {
        let mut lines = block.lines();
        let status_line = lines.next().unwrap_or_default().trim_end();
        let status_code = STATUS_LINE_RE
            .captures(status_line)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .ok_or_else(|| {
                Error::MalformedHttpHeader(format!("invalid status line {status_line:?}"))
            })?;

        let mut header = Self {
            status_code: Some(status_code),
            ..Self::default()
        };

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with([' ', '\t']) {
                if let Some((_, value)) = header.fields.last_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) => header
                    .fields
                    .push((name.trim().to_string(), value.trim().to_string())),
                None => log::debug!("ignoring header line without a colon: {line:?}"),
            }
        }

        header.content_type = header.header("content-type").map(str::to_string);
        Ok(header)
    }

    /// Append a field, keeping `content_type` in sync.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name.eq_ignore_ascii_case("content-type") && self.content_type.is_none() {
            self.content_type = Some(value.clone());
        }
        self.fields.push((name, value));
        self
    }

    /// Value of the first field named `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// One archived response: target URI, HTTP header and payload stream.
pub struct CaptureRecord {
    /// The URL that was requested to produce this capture.
    pub target_uri: Option<String>,

    /// The parsed HTTP response header, `None` if the reader could not parse it.
    pub http_header: Option<HttpHeader>,

    /// Response body; read at most once.
    pub payload: Box<dyn Read + Send>,
}

impl CaptureRecord {
    /// Build a record from its parts.
    pub fn new(
        target_uri: Option<String>,
        http_header: Option<HttpHeader>,
        payload: impl Read + Send + 'static,
    ) -> Self {
        Self {
            target_uri,
            http_header,
            payload: Box::new(payload),
        }
    }

    /// Build a record from a raw HTTP response (header block, blank line, body).
    ///
    /// When no header block can be parsed the record has no HTTP header and
    /// the whole response becomes its payload.
    #[must_use]
    pub fn from_http_response(target_uri: Option<String>, mut response: Vec<u8>) -> Self {
        let Some((header_end, body_start)) = find_header_end(&response) else {
            log::debug!("no header terminator in response for {target_uri:?}");
            return Self::new(target_uri, None, Cursor::new(response));
        };

        let http_header = match HttpHeader::parse(&String::from_utf8_lossy(&response[..header_end])) {
            Ok(header) => Some(header),
            Err(err) => {
                log::debug!("unparsed HTTP header for {target_uri:?}: {err}");
                None
            }
        };

        let body = response.split_off(body_start);
        Self::new(target_uri, http_header, Cursor::new(body))
    }
}

impl fmt::Debug for CaptureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureRecord")
            .field("target_uri", &self.target_uri)
            .field("http_header", &self.http_header)
            .finish_non_exhaustive()
    }
}

/// Locate the blank line ending the header block.
///
/// Returns the end of the header block and the start of the body, using
/// whichever of `\r\n\r\n` and `\n\n` occurs first.
fn find_header_end(response: &[u8]) -> Option<(usize, usize)> {
    let crlf = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| (pos, pos + 4));
    let lf = response
        .windows(2)
        .position(|w| w == b"\n\n")
        .map(|pos| (pos, pos + 2));

    match (crlf, lf) {
        (Some(crlf), Some(lf)) => Some(if crlf.0 < lf.0 { crlf } else { lf }),
        (crlf, lf) => crlf.or(lf),
    }
}
