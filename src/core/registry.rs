//! Purpose: Hold the backends under test and hand them out in a deterministic order.
//! Exports: `Registry`, `Backends`, `Contender`.
//! Role: Explicitly constructed registration phase, then a frozen read-only set.
//! Invariants: Order is by `name()` byte order; equal names keep registration order.
//! Invariants: Nothing can be registered after `freeze`.
//! Notes: `Contender` erases the backend type only at this boundary; verification and
//! benchmarking stay monomorphized per backend, so documents never cross backends.

use std::io::Write;

use tracing::warn;

use crate::core::backend::JsonBackend;
use crate::core::bench::{self, BenchOptions, BenchSummary};
use crate::core::corpus::Corpus;
use crate::core::error::{Error, ErrorKind};
use crate::core::report::ReportSink;
use crate::core::verify::{self, VerifyOptions, VerifyReport};

/// Object-safe view of a registered backend.
pub trait Contender {
    fn name(&self) -> &str;

    fn verify(&self, corpus: &Corpus, options: &VerifyOptions) -> VerifyReport;

    fn bench(
        &self,
        corpus: &Corpus,
        options: &BenchOptions,
        sink: &mut dyn ReportSink,
        progress: &mut dyn Write,
    ) -> Result<BenchSummary, Error>;
}

impl<B: JsonBackend> Contender for B {
    fn name(&self) -> &str {
        JsonBackend::name(self)
    }

    fn verify(&self, corpus: &Corpus, options: &VerifyOptions) -> VerifyReport {
        verify::verify(self, corpus, options)
    }

    fn bench(
        &self,
        corpus: &Corpus,
        options: &BenchOptions,
        sink: &mut dyn ReportSink,
        progress: &mut dyn Write,
    ) -> Result<BenchSummary, Error> {
        bench::bench(self, corpus, options, sink, progress)
    }
}

#[derive(Default)]
pub struct Registry {
    backends: Vec<Box<dyn Contender>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<B: JsonBackend + 'static>(&mut self, backend: B) -> &mut Self {
        self.backends.push(Box::new(backend));
        self
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Ends registration and sorts once; the order is cached in the returned set.
    pub fn freeze(self) -> Backends {
        let mut ordered = self.backends;
        ordered.sort_by(|a, b| a.name().as_bytes().cmp(b.name().as_bytes()));
        for pair in ordered.windows(2) {
            if pair[0].name() == pair[1].name() {
                warn!(backend = pair[0].name(), "duplicate backend name registered");
            }
        }
        Backends { ordered }
    }
}

pub struct Backends {
    ordered: Vec<Box<dyn Contender>>,
}

impl Backends {
    pub fn all(&self) -> &[Box<dyn Contender>] {
        &self.ordered
    }

    pub fn names(&self) -> Vec<&str> {
        self.ordered.iter().map(|backend| backend.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Keeps only the named backends, preserving sorted order. An empty filter keeps all.
    pub fn select(self, names: &[String]) -> Result<Self, Error> {
        if names.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.ordered.iter().any(|backend| backend.name() == name.as_str()))
        {
            let known = self.names().join(", ");
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown backend `{unknown}`"))
                .with_hint(format!("Registered backends: {known}")));
        }
        let ordered = self
            .ordered
            .into_iter()
            .filter(|backend| names.iter().any(|name| name == backend.name()))
            .collect();
        Ok(Self { ordered })
    }
}
