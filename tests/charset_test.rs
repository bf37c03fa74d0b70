use warc_html::{extract, CaptureRecord, CharsetResolver, ExtractionResult, HtmlExtractor, Options};

fn record(content_type: &str, body: &[u8]) -> CaptureRecord {
    let mut bytes = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nDate: Mon, 02 Jan 2006 15:04:05 GMT\r\n\r\n"
    )
    .into_bytes();
    bytes.extend_from_slice(body);
    CaptureRecord::from_http_response(Some("http://example.com/".to_string()), bytes)
}

fn text_of(result: ExtractionResult) -> String {
    result.into_pair().expect("record should be extracted").1
}

#[test]
fn resolver_examples() {
    let resolver = CharsetResolver::default();
    assert_eq!(resolver.resolve(Some("text/html; charset=ISO-8859-1")), "ISO-8859-1");
    assert_eq!(resolver.resolve(Some("text/html")), resolver.default_charset());
    assert_eq!(resolver.resolve(Some("text/html; charset=")), "");
}

#[test]
fn latin1_payload_decoded_with_declared_charset() {
    let text = text_of(extract(record(
        "text/html; charset=ISO-8859-1",
        b"<p>Caf\xE9 espa\xF1ol</p>",
    )));
    assert_eq!(text, "<p>Café español</p>");
}

#[test]
fn windows1252_payload_decoded() {
    // 0x93/0x94 are left/right double quotes in windows-1252
    let text = text_of(extract(record("text/html; charset=windows-1252", b"\x93Smart\x94")));
    assert_eq!(text, "\u{201C}Smart\u{201D}");
}

#[test]
fn utf8_default_applies_without_charset() {
    let text = text_of(extract(record("text/html", "中文 ü".as_bytes())));
    assert_eq!(text, "中文 ü");
}

#[test]
fn configured_default_charset_is_used() {
    let extractor = HtmlExtractor::new(Options {
        default_charset: "ISO-8859-1".to_string(),
        ..Options::default()
    });
    let text = text_of(extractor.extract(record("text/html", b"M\xFCnchen")));
    assert_eq!(text, "München");
}

#[test]
fn empty_charset_value_is_empty_not_a_panic() {
    assert_eq!(
        extract(record("text/html; charset=", b"<html></html>")),
        ExtractionResult::Empty
    );
}

#[test]
fn unknown_charset_is_empty() {
    assert_eq!(
        extract(record("text/html; charset=x-no-such-encoding", b"<html></html>")),
        ExtractionResult::Empty
    );
}

#[test]
fn bytes_invalid_for_charset_drop_the_record() {
    assert_eq!(
        extract(record("text/html; charset=UTF-8", b"<p>Caf\xE9</p>")),
        ExtractionResult::Empty
    );
}

#[test]
fn charset_without_equals_drops_the_record() {
    assert_eq!(
        extract(record("text/html; charset", b"<p>ok</p>")),
        ExtractionResult::Empty
    );
}

#[test]
fn padded_charset_value_drops_the_record() {
    for content_type in ["text/html; charset = utf-8", "text/html; charset=utf-8 "] {
        assert_eq!(
            extract(record(content_type, b"<p>ok</p>")),
            ExtractionResult::Empty,
            "{content_type}"
        );
    }
}

#[test]
fn latin1_payload_keeps_c1_bytes() {
    let text = text_of(extract(record("text/html; charset=ISO-8859-1", b"<p>\x93x\x94</p>")));
    assert_eq!(text, "<p>\u{93}x\u{94}</p>");
}
