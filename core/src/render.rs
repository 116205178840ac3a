//! Turning results into output documents.
//!
//! Two completion policies are supported:
//!
//! * **Batch** waits for the whole [`ScanBatch`], sorts it by title and writes
//!   a single document: a pretty-printed JSON array or a CSV table. Rendering
//!   the same batch twice produces the same bytes.
//! * **Streaming** writes one record per result as soon as it arrives: a CSV
//!   row, or one JSON object per line. Records appear in arrival order, which
//!   is **not** sorted and differs between runs.
//!
//! A CSV document always has one row per result; unavailable results leave
//! the metadata columns empty.

use std::io::{self, Write};

use sdstatus_common::config::{Format, OutputMode};
use sdstatus_common::scan::{batch::ScanBatch, result::ScanResult};
use serde::Serialize;
use thiserror::Error;

use crate::scanner::ScanStream;

pub const CSV_COLUMNS: [&str; 7] = [
    "title",
    "url",
    "available",
    "error",
    "sd_version",
    "gpg_fpr",
    "supported_languages",
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not write output: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode results as json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not write the result for {title}: {reason}")]
    Record { title: String, reason: String },
}

/// Renders a running scan according to `mode`, returning the collected batch.
pub async fn render<W: Write>(
    mut stream: ScanStream,
    mode: OutputMode,
    format: Format,
    out: W,
) -> Result<ScanBatch, RenderError> {
    match mode {
        OutputMode::Batch => {
            let batch: ScanBatch = stream.collect().await;
            write_batch(&batch, format, out)?;
            Ok(batch)
        }
        OutputMode::Streaming => {
            let mut writer = RecordWriter::new(format, out)?;
            let mut results: Vec<ScanResult> = Vec::with_capacity(stream.expected());
            while let Some(result) = stream.next().await {
                writer.write(&result)?;
                results.push(result);
            }
            writer.finish()?;
            Ok(results.into_iter().collect())
        }
    }
}

/// Writes a complete batch as one document, sorted by title.
pub fn write_batch<W: Write>(batch: &ScanBatch, format: Format, mut out: W) -> Result<(), RenderError> {
    let sorted: Vec<&ScanResult> = batch.sorted();
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &sorted)?;
            out.write_all(b"\n")?;
            out.flush()?;
        }
        Format::Csv => {
            let mut writer = RecordWriter::new(Format::Csv, out)?;
            for result in sorted {
                writer.write(result)?;
            }
            writer.finish()?;
        }
    }
    Ok(())
}

/// Renders a batch into a string. Handy for tests and small outputs.
pub fn batch_to_string(batch: &ScanBatch, format: Format) -> Result<String, RenderError> {
    let mut buf: Vec<u8> = Vec::new();
    write_batch(batch, format, &mut buf)?;
    String::from_utf8(buf).map_err(|e| RenderError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Writes results one record at a time, flushing after each.
pub struct RecordWriter<W: Write> {
    sink: Sink<W>,
}

enum Sink<W: Write> {
    Csv(csv::Writer<W>),
    JsonLines(W),
}

impl<W: Write> RecordWriter<W> {
    /// CSV output starts with the header row, so an empty scan is header only.
    pub fn new(format: Format, out: W) -> Result<Self, RenderError> {
        let sink = match format {
            Format::Csv => {
                let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
                writer.write_record(CSV_COLUMNS).map_err(io::Error::from)?;
                writer.flush()?;
                Sink::Csv(writer)
            }
            Format::Json => Sink::JsonLines(out),
        };
        Ok(Self { sink })
    }

    /// Writes and flushes one record. Failures name the result being written.
    pub fn write(&mut self, result: &ScanResult) -> Result<(), RenderError> {
        self.write_record(result).map_err(|reason| RenderError::Record {
            title: result.title().to_string(),
            reason,
        })
    }

    fn write_record(&mut self, result: &ScanResult) -> Result<(), String> {
        match &mut self.sink {
            Sink::Csv(writer) => {
                writer
                    .serialize(CsvRow::from(result))
                    .map_err(|e| e.to_string())?;
                writer.flush().map_err(|e| e.to_string())
            }
            Sink::JsonLines(out) => {
                serde_json::to_writer(&mut *out, result).map_err(|e| e.to_string())?;
                out.write_all(b"\n")
                    .and_then(|()| out.flush())
                    .map_err(|e| e.to_string())
            }
        }
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(self) -> Result<W, RenderError> {
        match self.sink {
            Sink::Csv(writer) => writer
                .into_inner()
                .map_err(|e| RenderError::Io(e.into_error())),
            Sink::JsonLines(mut out) => {
                out.flush()?;
                Ok(out)
            }
        }
    }
}

/// One CSV row; field order follows [`CSV_COLUMNS`].
#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    url: &'a str,
    available: bool,
    error: &'a str,
    sd_version: &'a str,
    gpg_fpr: &'a str,
    supported_languages: String,
}

impl<'a> From<&'a ScanResult> for CsvRow<'a> {
    fn from(result: &'a ScanResult) -> Self {
        let metadata = result.metadata();
        Self {
            title: result.title(),
            url: result.url(),
            available: result.is_available(),
            error: result.error().unwrap_or(""),
            sd_version: metadata.map(|md| md.version.as_str()).unwrap_or(""),
            gpg_fpr: metadata.map(|md| md.fingerprint.as_str()).unwrap_or(""),
            supported_languages: metadata.map(|md| md.languages_joined()).unwrap_or_default(),
        }
    }
}
