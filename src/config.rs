//! Purpose: Run configuration for the harness with defaults and validation.
//! Exports: `HarnessConfig`.
//! Role: Single place the CLI maps flags onto; the orchestrator reads only this.
//! Invariants: `validate` rejects zero trials and an empty corpus search list.
//! Invariants: Defaults reproduce the conventional layout (`../data`, `../result`).

use std::path::{Path, PathBuf};

use crate::core::bench::{BenchOptions, DEFAULT_TRIALS};
use crate::core::error::{Error, ErrorKind};
use crate::core::verify::VerifyOptions;
use crate::paths::{
    RESULTS_MARKER, default_data_dirs, default_result_dirs, resolve_report_path, result_file_name,
};

/// Harness settings.
///
/// ```
/// use jsonbench::config::HarnessConfig;
///
/// let config = HarnessConfig::new()
///     .with_trials(3)
///     .with_data_dirs(vec!["corpus".into()]);
/// assert_eq!(config.trials(), 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    trials: usize,
    data_dirs: Vec<PathBuf>,
    report_path: Option<PathBuf>,
    result_dirs: Vec<PathBuf>,
    results_marker: String,
    artifact_dir: PathBuf,
    backends: Vec<String>,
    skip_verify: bool,
    skip_bench: bool,
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            data_dirs: default_data_dirs(),
            report_path: None,
            result_dirs: default_result_dirs(),
            results_marker: RESULTS_MARKER.to_string(),
            artifact_dir: PathBuf::from("."),
            backends: Vec::new(),
            skip_verify: false,
            skip_bench: false,
        }
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Corpus directories, tried in order until one holds a manifest.
    pub fn with_data_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.data_dirs = dirs;
        self
    }

    /// Writes the report here instead of resolving a results directory.
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    pub fn with_result_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.result_dirs = dirs;
        self
    }

    pub fn with_results_marker(mut self, marker: impl Into<String>) -> Self {
        self.results_marker = marker.into();
        self
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Restricts the run to these backend names. Empty means all.
    pub fn with_backends(mut self, names: Vec<String>) -> Self {
        self.backends = names;
        self
    }

    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    pub fn with_skip_bench(mut self, skip: bool) -> Self {
        self.skip_bench = skip;
        self
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn data_dirs(&self) -> &[PathBuf] {
        &self.data_dirs
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub fn backends(&self) -> &[String] {
        &self.backends
    }

    pub fn skip_verify(&self) -> bool {
        self.skip_verify
    }

    pub fn skip_bench(&self) -> bool {
        self.skip_bench
    }

    /// Explicit report path, else the first marked results dir, else the current dir.
    pub fn report_path(&self) -> PathBuf {
        match &self.report_path {
            Some(path) => path.clone(),
            None => resolve_report_path(&self.result_dirs, &self.results_marker, &result_file_name()),
        }
    }

    pub fn verify_options(&self) -> VerifyOptions {
        VerifyOptions::new().with_artifact_dir(&self.artifact_dir)
    }

    pub fn bench_options(&self) -> BenchOptions {
        BenchOptions::new(self.trials)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.trials == 0 {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("trial count must be at least 1")
                .with_hint("Pass --trials 1 or more."));
        }
        if self.data_dirs.is_empty() {
            return Err(Error::new(ErrorKind::Usage).with_message("no corpus directories configured"));
        }
        Ok(())
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new()
    }
}
