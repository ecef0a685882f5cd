//! Purpose: Round-trip verification and benchmarking harness for JSON backends.
//! Exports: `core` (contract, corpus, verifier, benchmarker, report), `backends`, `config`, `run`.
//! Role: Library backing the `jsonbench` binary and the integration tests.
//! Invariants: Backends are registered into an explicit `Registry`; there is no global state.
//! Invariants: All work is single-threaded and sequential so timings stay comparable.
pub mod backends;
pub mod config;
pub mod core;
pub mod paths;
pub mod run;
pub mod summary;

pub use crate::core::backend::JsonBackend;
pub use crate::core::bench::{BenchmarkRecord, Operation};
pub use crate::core::corpus::{Corpus, CorpusEntry};
pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::registry::{Backends, Registry};
pub use crate::core::stat::Stat;
