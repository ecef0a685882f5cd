//! Purpose: Shared path conventions for corpus discovery, reports, and artifacts.
//! Exports: `default_data_dirs`, `default_result_dirs`, `resolve_report_path`,
//!          `result_file_name`, `artifact_file_name`.
//! Role: Keep CLI and library path semantics aligned from one source.
//! Invariants: Default corpus search order is `../data`, then `../../data`.
//! Invariants: A results dir is only used when it carries the marker file.
//! Invariants: Artifact names never contain path separators.

use std::path::PathBuf;

pub const RESULTS_MARKER: &str = "template.php";

pub fn default_data_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("../data"), PathBuf::from("../../data")]
}

pub fn default_result_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("../../result"), PathBuf::from("../result")]
}

/// `<arch>_<os>_rustc.csv`, so results from different machines can share a directory.
pub fn result_file_name() -> String {
    format!(
        "{}_{}_rustc.csv",
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

/// First candidate holding `marker`, else the bare file name (current directory).
pub fn resolve_report_path(candidates: &[PathBuf], marker: &str, file_name: &str) -> PathBuf {
    candidates
        .iter()
        .find(|dir| dir.join(marker).is_file())
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// `<backend>_<entry>` with separators flattened so the file lands inside the artifact dir.
pub fn artifact_file_name(backend: &str, entry: &str) -> String {
    let flatten = |part: &str| part.replace(['/', '\\'], "_");
    format!("{}_{}", flatten(backend), flatten(entry))
}
