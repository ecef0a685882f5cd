//! Purpose: Durable benchmark records and human-readable operator output.
//! Exports: `ReportSink`, `CsvReport`, `REPORT_HEADER`, `format_record`, progress writers.
//! Role: The only place that decides how records and verdicts look on the wire and terminal.
//! Invariants: CSV header is fixed; rows are appended and flushed one at a time, in order.
//! Invariants: Operator output is for people; nothing parses it.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::bench::{BenchmarkRecord, Operation};
use crate::core::error::{Error, ErrorKind};
use crate::core::verify::VerifyReport;

pub const REPORT_HEADER: &str = "Type,Library,Filename,Time(ms)";

/// Append-only destination for benchmark records.
pub trait ReportSink {
    fn append(&mut self, record: &BenchmarkRecord) -> Result<(), Error>;
}

impl ReportSink for Vec<BenchmarkRecord> {
    fn append(&mut self, record: &BenchmarkRecord) -> Result<(), Error> {
        self.push(record.clone());
        Ok(())
    }
}

/// CSV report streamed to any writer.
pub struct CsvReport<W: Write> {
    writer: W,
    path: Option<PathBuf>,
    rows: usize,
}

impl CsvReport<BufWriter<File>> {
    /// Creates (truncating) the report file and writes the header.
    pub fn create(path: &Path) -> Result<Self, Error> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("cannot create report directory")
                    .with_path(parent)
                    .with_source(err)
            })?;
        }
        let file = File::create(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("cannot open report for writing")
                .with_path(path)
                .with_source(err)
        })?;
        let mut report = Self::new(BufWriter::new(file))?;
        report.path = Some(path.to_path_buf());
        Ok(report)
    }
}

impl<W: Write> CsvReport<W> {
    pub fn new(writer: W) -> Result<Self, Error> {
        let mut report = Self {
            writer,
            path: None,
            rows: 0,
        };
        report.write_line(REPORT_HEADER)?;
        Ok(report)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) -> Result<(), Error> {
        writeln!(self.writer, "{line}")
            .and_then(|()| self.writer.flush())
            .map_err(|err| {
                let mut error = Error::new(ErrorKind::Io)
                    .with_message("failed to write report row")
                    .with_source(err);
                if let Some(path) = &self.path {
                    error = error.with_path(path);
                }
                error
            })
    }
}

impl<W: Write> ReportSink for CsvReport<W> {
    fn append(&mut self, record: &BenchmarkRecord) -> Result<(), Error> {
        self.write_line(&format_record(record))?;
        self.rows += 1;
        Ok(())
    }
}

/// One CSV row, without the trailing newline.
pub fn format_record(record: &BenchmarkRecord) -> String {
    format!(
        "{},{},{},{:.6}",
        record.operation,
        csv_field(&record.backend),
        csv_field(&record.entry),
        record.min_ms
    )
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub(crate) fn write_progress_line(
    out: &mut dyn Write,
    record: &BenchmarkRecord,
    throughput: f64,
) -> io::Result<()> {
    writeln!(
        out,
        "{:<10} {:<20} ... {:6.3} ms  {:3.3} MB/s",
        record.operation, record.entry, record.min_ms, throughput
    )
}

pub(crate) fn write_skip_line(
    out: &mut dyn Write,
    operation: Operation,
    entry: &str,
    reason: &str,
) -> io::Result<()> {
    writeln!(out, "{:<10} {:<20} ... skipped ({reason})", operation, entry)
}

/// Writes the verdict for one backend, including per-entry failure detail.
pub fn write_verify_report(out: &mut dyn Write, report: &VerifyReport) -> io::Result<()> {
    write!(out, "Verifying {} ... ", report.backend)?;
    for failure in &report.failures {
        write!(out, "\n{} '{}'", capitalize(failure.kind.label()), failure.entry)?;
        if let Some(detail) = &failure.detail {
            write!(out, ": {detail}")?;
        }
        if let Some((first, second)) = &failure.stats {
            write!(out, "\n1st time\n--------\n{first}\n2nd time\n--------\n{second}")?;
        }
        if let Some(artifact) = &failure.artifact {
            write!(out, "\nwrote {}", artifact.display())?;
        }
    }
    if report.passed() {
        writeln!(out, "OK")
    } else {
        writeln!(out, "\nFailed ({}/{} entries)", report.failures.len(), report.checked)
    }
}

fn capitalize(text: &str) -> Cow<'_, str> {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            Cow::Owned(first.to_uppercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(text),
    }
}
