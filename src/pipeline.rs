//! Fan-out/fan-in runs over a record stream.
//!
//! Records are pulled from the source in batches, extracted in parallel on
//! the rayon pool, filtered, and written to a [`Sink`] in input order. A
//! record that fails extraction is dropped; a sink that fails aborts the run.

use std::io::Write;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extractor::{ExtractionResult, HtmlExtractor};
use crate::filter::extracted_pairs;
use crate::record::CaptureRecord;

/// Destination for extracted `(key, text)` pairs.
pub trait Sink {
    /// Store one pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair cannot be stored; the run stops.
    fn accept(&mut self, key: &str, text: &str) -> Result<()>;

    /// Flush anything buffered once the run is complete.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered pairs cannot be persisted.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One output line of a [`JsonLinesSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPair {
    /// Composite record key.
    pub key: String,
    /// Decoded payload.
    pub text: String,
}

#[derive(Serialize)]
struct PairRef<'a> {
    key: &'a str,
    text: &'a str,
}

/// Writes each pair as a `{"key": .., "text": ..}` JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Write pairs to `writer`; wrap files in a `BufWriter`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn accept(&mut self, key: &str, text: &str) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &PairRef { key, text })?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects pairs in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecSink {
    /// Pairs in the order they were accepted.
    pub pairs: Vec<(String, String)>,
}

impl Sink for VecSink {
    fn accept(&mut self, key: &str, text: &str) -> Result<()> {
        self.pairs.push((key.to_string(), text.to_string()));
        Ok(())
    }
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Records read from the source.
    pub records: usize,
    /// Pairs handed to the sink.
    pub extracted: usize,
    /// Records dropped as `Empty`.
    pub skipped: usize,
}

/// Extract a batch of records in parallel, keeping input order.
#[must_use]
pub fn extract_batch(extractor: &HtmlExtractor, records: Vec<CaptureRecord>) -> Vec<ExtractionResult> {
    records
        .into_par_iter()
        .map(|record| extractor.extract(record))
        .collect()
}

/// Run every record of `records` through `extractor` into `sink`.
///
/// # Errors
///
/// Returns the first error raised by `sink`. Extraction failures never
/// surface here; they are counted in `PipelineStats::skipped`.
pub fn run<I, S>(extractor: &HtmlExtractor, records: I, sink: &mut S) -> Result<PipelineStats>
where
    I: IntoIterator<Item = CaptureRecord>,
    S: Sink + ?Sized,
{
    let batch_size = extractor.options().batch_size.max(1);
    let mut records = records.into_iter();
    let mut stats = PipelineStats::default();

    loop {
        let batch: Vec<CaptureRecord> = records.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        stats.records += batch.len();

        for (key, text) in extracted_pairs(extract_batch(extractor, batch)) {
            sink.accept(&key, &text)?;
            stats.extracted += 1;
        }
        log::debug!("processed {} records, {} extracted", stats.records, stats.extracted);
    }

    stats.skipped = stats.records - stats.extracted;
    sink.finish()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::record::HttpHeader;
    use std::io::Cursor;

    fn html_record(path: &str) -> CaptureRecord {
        let header = HttpHeader::default()
            .with_field("Content-Type", "text/html")
            .with_field("Date", "Mon, 02 Jan 2006 15:04:05 GMT");
        CaptureRecord::new(
            Some(format!("http://example.com{path}")),
            Some(header),
            Cursor::new(format!("<p>{path}</p>").into_bytes()),
        )
    }

    fn empty_record() -> CaptureRecord {
        CaptureRecord::new(None, None, Cursor::new(Vec::new()))
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn accept(&mut self, _key: &str, _text: &str) -> Result<()> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn counts_extracted_and_skipped() {
        let records = vec![html_record("/a"), empty_record(), html_record("/b"), empty_record()];
        let mut sink = VecSink::default();
        let stats = run(&HtmlExtractor::default(), records, &mut sink).expect("run succeeds");
        assert_eq!(
            stats,
            PipelineStats {
                records: 4,
                extracted: 2,
                skipped: 2
            }
        );
        assert_eq!(sink.pairs[0].1, "<p>/a</p>");
        assert_eq!(sink.pairs[1].1, "<p>/b</p>");
    }

    #[test]
    fn order_is_kept_across_small_batches() {
        let extractor = HtmlExtractor::new(Options {
            batch_size: 3,
            ..Options::default()
        });
        let paths: Vec<String> = (0..20).map(|i| format!("/{i}")).collect();
        let records = paths.iter().map(|p| html_record(p));
        let mut sink = VecSink::default();
        run(&extractor, records, &mut sink).expect("run succeeds");

        let texts: Vec<String> = sink.pairs.into_iter().map(|(_, text)| text).collect();
        let expected: Vec<String> = paths.iter().map(|p| format!("<p>{p}</p>")).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn zero_batch_size_still_progresses() {
        let extractor = HtmlExtractor::new(Options {
            batch_size: 0,
            ..Options::default()
        });
        let mut sink = VecSink::default();
        let stats = run(&extractor, vec![html_record("/a")], &mut sink).expect("run succeeds");
        assert_eq!(stats.extracted, 1);
    }

    #[test]
    fn sink_errors_abort_the_run() {
        let result = run(&HtmlExtractor::default(), vec![html_record("/a")], &mut FailingSink);
        assert!(result.is_err());
    }

    #[test]
    fn json_lines_sink_writes_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.accept("k1", "<p>\"quoted\"</p>").expect("write");
        sink.accept("k2", "line\nbreak").expect("write");
        sink.finish().expect("flush");

        let output = String::from_utf8(sink.into_inner()).expect("utf-8 output");
        let pairs: Vec<OutputPair> = output
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid json"))
            .collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].text, "<p>\"quoted\"</p>");
        assert_eq!(pairs[1].text, "line\nbreak");
    }
}
