// Timing harness for JSON backends.
//
// Purpose:
// - Measure parse, stringify, prettify and statistics latency per corpus entry.
// - Stream one record per (operation, backend, entry) to the report sink as soon as it exists.
//
// Design notes:
// - Minimum of N trials is the measurement of record; mean and median are never reported.
// - Only the single operation call sits inside the timed region. Document setup happens once
//   before the trials, and each trial's output is released after the clock stops.
// - Single-threaded and strictly sequential so trials never interfere with each other.

use std::fmt;
use std::hint::black_box;
use std::io::Write;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::backend::JsonBackend;
use crate::core::corpus::{Corpus, CorpusEntry};
use crate::core::error::{Error, ErrorKind};
use crate::core::report::{ReportSink, write_progress_line, write_skip_line};

pub const DEFAULT_TRIALS: usize = 10;

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Operation {
    Parse,
    Stringify,
    Prettify,
    Statistics,
}

impl Operation {
    /// Per-backend sequencing order.
    pub const ALL: [Operation; 4] = [
        Operation::Parse,
        Operation::Stringify,
        Operation::Prettify,
        Operation::Statistics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Operation::Parse => "Parse",
            Operation::Stringify => "Stringify",
            Operation::Prettify => "Prettify",
            Operation::Statistics => "Statistics",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One line of the report; serialized with the report's column names.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    #[serde(rename = "type")]
    pub operation: Operation,
    #[serde(rename = "library")]
    pub backend: String,
    #[serde(rename = "filename")]
    pub entry: String,
    pub min_ms: f64,
}

/// Raw samples of one measured operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialTiming {
    samples: Vec<Duration>,
}

impl TrialTiming {
    pub fn from_samples(samples: Vec<Duration>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    /// Smallest sample, exactly as recorded.
    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn min_ms(&self) -> f64 {
        self.min().as_secs_f64() * 1000.0
    }
}

/// Runs `op` `trials` times (at least once), timing each call on its own.
///
/// `release` receives every trial's output after the clock stops. The first failing
/// trial aborts the measurement.
pub fn time_trials<T, E>(
    trials: usize,
    mut op: impl FnMut() -> Result<T, E>,
    mut release: impl FnMut(T),
) -> Result<TrialTiming, E> {
    let trials = trials.max(1);
    let mut samples = Vec::with_capacity(trials);
    for _ in 0..trials {
        let start = Instant::now();
        let output = op();
        let elapsed = start.elapsed();
        release(output?);
        samples.push(elapsed);
    }
    Ok(TrialTiming::from_samples(samples))
}

/// Informational throughput in MB/s (MiB based).
pub fn throughput_mb_per_sec(bytes: usize, min_ms: f64) -> f64 {
    let secs = (min_ms * 0.001).max(1e-9);
    bytes as f64 / MIB / secs
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BenchOptions {
    trials: usize,
}

impl BenchOptions {
    pub fn new(trials: usize) -> Self {
        Self { trials }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TRIALS)
    }
}

/// A measurement that produced no record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedMeasurement {
    pub operation: Operation,
    pub entry: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchSummary {
    pub records: Vec<BenchmarkRecord>,
    pub skipped: Vec<SkippedMeasurement>,
}

/// Benchmarks one backend: every entry for parse, then stringify, prettify, statistics.
///
/// Errors come only from the sink or the progress stream; backend failures become skips.
pub fn bench<B: JsonBackend>(
    backend: &B,
    corpus: &Corpus,
    options: &BenchOptions,
    sink: &mut dyn ReportSink,
    progress: &mut dyn Write,
) -> Result<BenchSummary, Error> {
    writeln!(progress, "Benchmarking {}", backend.name()).map_err(progress_error)?;

    let mut summary = BenchSummary::default();
    for operation in Operation::ALL {
        for entry in corpus {
            match measure(backend, operation, entry, options.trials()) {
                Ok(timing) => {
                    let record = BenchmarkRecord {
                        operation,
                        backend: backend.name().to_string(),
                        entry: entry.name().to_string(),
                        min_ms: timing.min_ms(),
                    };
                    let throughput = throughput_mb_per_sec(entry.len(), record.min_ms);
                    debug!(
                        backend = backend.name(),
                        entry = entry.name(),
                        operation = operation.label(),
                        min_ms = record.min_ms,
                        throughput,
                        "measured"
                    );
                    write_progress_line(progress, &record, throughput).map_err(progress_error)?;
                    sink.append(&record)?;
                    summary.records.push(record);
                }
                Err(err) => {
                    let err = err.with_backend(backend.name()).with_entry(entry.name());
                    let reason = err.message().unwrap_or("backend failure").to_string();
                    warn!(
                        backend = backend.name(),
                        entry = entry.name(),
                        operation = operation.label(),
                        error = %err,
                        "measurement skipped"
                    );
                    write_skip_line(progress, operation, entry.name(), &reason)
                        .map_err(progress_error)?;
                    summary.skipped.push(SkippedMeasurement {
                        operation,
                        entry: entry.name().to_string(),
                        reason,
                    });
                }
            }
        }
    }
    writeln!(progress).map_err(progress_error)?;
    Ok(summary)
}

fn measure<B: JsonBackend>(
    backend: &B,
    operation: Operation,
    entry: &CorpusEntry,
    trials: usize,
) -> Result<TrialTiming, Error> {
    match operation {
        Operation::Parse => time_trials(
            trials,
            || backend.parse(entry.content()),
            |doc| backend.free(doc),
        ),
        Operation::Stringify => with_document(backend, entry, |doc| {
            time_trials(trials, || backend.stringify(doc), drop)
        }),
        Operation::Prettify => with_document(backend, entry, |doc| {
            time_trials(trials, || backend.prettify(doc), drop)
        }),
        Operation::Statistics => with_document(backend, entry, |doc| {
            time_trials(
                trials,
                || Ok::<_, Error>(backend.statistics(doc)),
                |stat| {
                    black_box(stat);
                },
            )
        }),
    }
}

/// Parses `entry` outside any timed region, runs `f`, and frees the document afterwards.
fn with_document<B: JsonBackend, T>(
    backend: &B,
    entry: &CorpusEntry,
    f: impl FnOnce(&B::Document) -> Result<T, Error>,
) -> Result<T, Error> {
    let doc = backend.parse(entry.content())?;
    let out = f(&doc);
    backend.free(doc);
    out
}

fn progress_error(err: std::io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to write benchmark progress")
        .with_source(err)
}
