//! Purpose: Round-trip verification of one backend against the whole corpus.
//! Exports: `verify`, `VerifyOptions`, `VerifyReport`, `VerifyFailure`, `FailureKind`.
//! Role: Correctness gate run before any timing.
//! Invariants: Stat(parse(x)) must equal Stat(parse(stringify(parse(x)))) for every parsed entry.
//! Invariants: Failures are recorded once and the sweep continues (no fail-fast, no retry).
//! Invariants: Every document handle is released on every path, failure branches included.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::core::backend::JsonBackend;
use crate::core::corpus::{Corpus, CorpusEntry};
use crate::core::stat::Stat;
use crate::paths::artifact_file_name;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ParseFailed,
    StringifyFailed,
    SecondParseFailed,
    RoundTripMismatch,
}

impl FailureKind {
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::ParseFailed => "parse failed",
            FailureKind::StringifyFailed => "stringify failed",
            FailureKind::SecondParseFailed => "second parse failed",
            FailureKind::RoundTripMismatch => "round-trip mismatch",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyFailure {
    pub entry: String,
    pub kind: FailureKind,
    /// Backend error text, when the backend gave one.
    pub detail: Option<String>,
    /// First and second parse digests of a mismatch.
    pub stats: Option<(Stat, Stat)>,
    /// Where the first rendering was persisted, when that succeeded.
    pub artifact: Option<PathBuf>,
}

impl VerifyFailure {
    fn new(entry: &CorpusEntry, kind: FailureKind) -> Self {
        Self {
            entry: entry.name().to_string(),
            kind,
            detail: None,
            stats: None,
            artifact: None,
        }
    }

    fn with_detail(mut self, detail: impl fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyReport {
    pub backend: String,
    pub checked: usize,
    pub failures: Vec<VerifyFailure>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct VerifyOptions {
    artifact_dir: Option<PathBuf>,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory receiving mismatch artifacts. Without one, nothing is written.
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    pub fn artifact_dir(&self) -> Option<&Path> {
        self.artifact_dir.as_deref()
    }
}

pub fn verify<B: JsonBackend>(backend: &B, corpus: &Corpus, options: &VerifyOptions) -> VerifyReport {
    let mut failures = Vec::new();
    for entry in corpus {
        if let Err(failure) = check_entry(backend, entry, options) {
            warn!(
                backend = backend.name(),
                entry = entry.name(),
                failure = %failure.kind,
                detail = failure.detail.as_deref().unwrap_or(""),
                "verification failed"
            );
            failures.push(failure);
        }
    }
    VerifyReport {
        backend: backend.name().to_string(),
        checked: corpus.len(),
        failures,
    }
}

fn check_entry<B: JsonBackend>(
    backend: &B,
    entry: &CorpusEntry,
    options: &VerifyOptions,
) -> Result<(), VerifyFailure> {
    let doc1 = backend
        .parse(entry.content())
        .map_err(|err| VerifyFailure::new(entry, FailureKind::ParseFailed).with_detail(err))?;
    let stat1 = backend.statistics(&doc1);
    let json1 = backend.stringify(&doc1);
    backend.free(doc1);
    let json1 = json1
        .map_err(|err| VerifyFailure::new(entry, FailureKind::StringifyFailed).with_detail(err))?;

    let doc2 = backend.parse(&json1).map_err(|err| {
        VerifyFailure::new(entry, FailureKind::SecondParseFailed).with_detail(err)
    })?;
    let stat2 = backend.statistics(&doc2);
    let _json2 = backend.stringify(&doc2);
    backend.free(doc2);

    if stat1 == stat2 {
        return Ok(());
    }

    let diff = stat1
        .differences(&stat2)
        .into_iter()
        .map(|(name, first, second)| format!("{name} {first} != {second}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut failure = VerifyFailure::new(entry, FailureKind::RoundTripMismatch).with_detail(diff);
    failure.stats = Some((stat1, stat2));
    failure.artifact = options
        .artifact_dir()
        .and_then(|dir| persist_artifact(dir, backend.name(), entry.name(), &json1));
    Err(failure)
}

fn persist_artifact(dir: &Path, backend: &str, entry: &str, json: &[u8]) -> Option<PathBuf> {
    let path = dir.join(artifact_file_name(backend, entry));
    let written = std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&path, json));
    match written {
        Ok(()) => Some(path),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot write round-trip artifact");
            None
        }
    }
}
