//! Purpose: Drive one full harness run: verify every backend, then benchmark every backend.
//! Exports: `run`, `verify_all`, `bench_all`, `RunOutcome`.
//! Role: Orchestrator between the registry, the corpus, the report sink, and the operator.
//! Invariants: Both phases visit backends in the frozen registry order.
//! Invariants: Verification always completes before the report sink is opened.
//! Invariants: A sink or progress failure ends only the benchmark phase; it is kept in
//! `RunOutcome::bench_error` next to the finished verification results.

use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::core::bench::{BenchOptions, BenchSummary, BenchmarkRecord};
use crate::core::corpus::Corpus;
use crate::core::error::{Error, ErrorKind};
use crate::core::registry::{Backends, Registry};
use crate::core::report::{CsvReport, ReportSink, write_verify_report};
use crate::core::verify::{VerifyOptions, VerifyReport};

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub backends: Vec<String>,
    pub corpus_dir: Option<PathBuf>,
    pub corpus_entries: usize,
    pub corpus_bytes: usize,
    pub verification: Vec<VerifyReport>,
    pub records: Vec<BenchmarkRecord>,
    pub skipped_measurements: usize,
    pub report_path: Option<PathBuf>,
    /// Why the benchmark phase stopped early, if it did.
    pub bench_error: Option<Error>,
}

impl RunOutcome {
    pub fn all_passed(&self) -> bool {
        self.verification.iter().all(VerifyReport::passed)
    }

    pub fn failed_backends(&self) -> Vec<&str> {
        self.verification
            .iter()
            .filter(|report| !report.passed())
            .map(|report| report.backend.as_str())
            .collect()
    }
}

/// Runs the whole sequence and releases the corpus when done.
pub fn run(
    config: &HarnessConfig,
    registry: Registry,
    corpus: Corpus,
    console: &mut dyn Write,
) -> Result<RunOutcome, Error> {
    config.validate()?;
    let backends = registry.freeze().select(config.backends())?;
    if corpus.is_empty() {
        warn!("corpus is empty; nothing to verify or benchmark");
    }
    info!(
        backends = backends.len(),
        entries = corpus.len(),
        trials = config.trials(),
        "starting run"
    );

    let mut outcome = RunOutcome {
        backends: backends.names().into_iter().map(str::to_string).collect(),
        corpus_dir: corpus.source_dir().map(|dir| dir.to_path_buf()),
        corpus_entries: corpus.len(),
        corpus_bytes: corpus.total_bytes(),
        ..RunOutcome::default()
    };

    if !config.skip_verify() {
        outcome.verification = verify_all(&backends, &corpus, &config.verify_options(), console)?;
    }

    if !config.skip_bench() {
        if let Err(err) = bench_phase(config, &backends, &corpus, console, &mut outcome) {
            warn!(error = %err, "benchmark phase aborted");
            outcome.bench_error = Some(err);
        }
    }

    drop(corpus);
    Ok(outcome)
}

fn bench_phase(
    config: &HarnessConfig,
    backends: &Backends,
    corpus: &Corpus,
    console: &mut dyn Write,
    outcome: &mut RunOutcome,
) -> Result<(), Error> {
    let path = config.report_path();
    let mut sink = CsvReport::create(&path)
        .map_err(|err| err.with_hint("Pass --out with a writable report path."))?;
    outcome.report_path = Some(path.clone());
    let summary = bench_all(backends, corpus, &config.bench_options(), &mut sink, console)?;
    info!(path = %path.display(), rows = sink.rows(), "report written");
    outcome.records = summary.records;
    outcome.skipped_measurements = summary.skipped.len();
    Ok(())
}

pub fn verify_all(
    backends: &Backends,
    corpus: &Corpus,
    options: &VerifyOptions,
    console: &mut dyn Write,
) -> Result<Vec<VerifyReport>, Error> {
    let mut reports = Vec::with_capacity(backends.len());
    for backend in backends.all() {
        let report = backend.verify(corpus, options);
        write_verify_report(console, &report).map_err(console_error)?;
        reports.push(report);
    }
    writeln!(console).map_err(console_error)?;
    Ok(reports)
}

pub fn bench_all(
    backends: &Backends,
    corpus: &Corpus,
    options: &BenchOptions,
    sink: &mut dyn ReportSink,
    console: &mut dyn Write,
) -> Result<BenchSummary, Error> {
    let mut total = BenchSummary::default();
    for backend in backends.all() {
        let summary = backend.bench(corpus, options, sink, console)?;
        total.records.extend(summary.records);
        total.skipped.extend(summary.skipped);
    }
    Ok(total)
}

fn console_error(err: std::io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to write operator output")
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::config::HarnessConfig;
    use crate::core::corpus::{Corpus, CorpusEntry};
    use crate::core::error::ErrorKind;
    use crate::core::registry::Registry;

    #[test]
    fn unknown_backend_filter_fails_before_any_work() {
        let mut registry = Registry::new();
        crate::backends::register_builtin(&mut registry);
        let config = HarnessConfig::new().with_backends(vec!["nope".to_string()]);
        let mut console: Vec<u8> = Vec::new();
        let err = run(&config, registry, Corpus::default(), &mut console).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(console.is_empty());
    }

    #[test]
    fn unwritable_report_keeps_verification_results() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, b"").expect("blocker");

        let mut registry = Registry::new();
        crate::backends::register_builtin(&mut registry);
        let corpus = Corpus::new(vec![CorpusEntry::new("a.json", b"[1]".to_vec())]);
        let config = HarnessConfig::new()
            .with_trials(1)
            .with_artifact_dir(temp.path())
            .with_report_path(blocker.join("report.csv"));

        let mut console: Vec<u8> = Vec::new();
        let outcome = run(&config, registry, corpus, &mut console).expect("run");
        assert_eq!(outcome.verification.len(), outcome.backends.len());
        assert!(outcome.all_passed());
        assert!(outcome.records.is_empty());
        assert!(outcome.report_path.is_none());
        let err = outcome.bench_error.expect("bench error kept");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.hint().is_some());
        let text = String::from_utf8(console).expect("utf8");
        assert!(text.contains("Verifying serde_json ... OK"));
        assert!(!text.contains("Benchmarking"));
    }
}
