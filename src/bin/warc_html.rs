//! Reads a JSON Lines dump of capture records and writes the extracted
//! `(key, text)` pairs as JSON Lines.
//!
//! Each input line is `{"target_uri": "...", "http_response": [bytes]}`,
//! where `http_response` is the raw HTTP response (header block and body).

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use warc_html::{CaptureRecord, HtmlExtractor, JsonLinesSink, Options, TimestampLayout};

#[derive(Parser, Debug)]
#[command(name = "warc-html")]
#[command(about = "Extract keyed HTML documents from capture records")]
#[command(version)]
struct Args {
    /// JSON Lines file of capture records
    input: PathBuf,

    /// JSON Lines file to write (key, text) pairs to
    output: PathBuf,

    /// Charset used when a content type declares none
    #[arg(long, default_value = warc_html::DEFAULT_CHARSET)]
    default_charset: String,

    /// Digit layout of the key timestamp
    #[arg(long, value_enum, default_value_t = LayoutArg::Legacy)]
    timestamp_layout: LayoutArg,

    /// Records extracted in parallel per batch
    #[arg(long, default_value_t = 1024)]
    batch_size: usize,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Legacy,
    Calendar,
}

impl From<LayoutArg> for TimestampLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Legacy => Self::Legacy,
            LayoutArg::Calendar => Self::Calendar,
        }
    }
}

#[derive(Deserialize)]
struct RecordDump {
    target_uri: Option<String>,
    #[serde(default)]
    http_response: Vec<u8>,
}

fn parse_record_line(line_no: usize, line: &str) -> Option<CaptureRecord> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<RecordDump>(line) {
        Ok(dump) => Some(CaptureRecord::from_http_response(dump.target_uri, dump.http_response)),
        Err(e) => {
            log::warn!("skipping input line {line_no}: {e}");
            None
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    let extractor = HtmlExtractor::new(Options {
        default_charset: args.default_charset,
        timestamp_layout: args.timestamp_layout.into(),
        batch_size: args.batch_size,
    });

    let input = BufReader::new(File::open(&args.input)?);
    let mut sink = JsonLinesSink::new(BufWriter::new(File::create(&args.output)?));

    log::info!("Extracting {} into {}", args.input.display(), args.output.display());
    let start_time = Instant::now();

    let mut read_error: Option<io::Error> = None;
    let records = input
        .lines()
        .map_while(|line| match line {
            Ok(line) => Some(line),
            Err(e) => {
                read_error = Some(e);
                None
            }
        })
        .enumerate()
        .filter_map(|(i, line)| parse_record_line(i + 1, &line));

    let stats = warc_html::pipeline::run(&extractor, records, &mut sink)?;
    if let Some(e) = read_error {
        return Err(format!("Failed to read {}: {e}", args.input.display()).into());
    }

    log::info!(
        "Processed {} records in {:.2} seconds: {} extracted, {} skipped",
        stats.records,
        start_time.elapsed().as_secs_f64(),
        stats.extracted,
        stats.skipped
    );
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
