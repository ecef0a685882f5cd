//! Purpose: Machine-readable JSON summary of a finished run.
//! Exports: `run_summary_json`, `rfc3339`.
//! Role: Stable stdout envelope for `--format json|both`; the CSV report stays the record of truth.
//! Invariants: Field names are additive-only once published.
//! Invariants: Verification and records appear in run order (sorted backends, then ops, then entries).

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value, json};

use crate::config::HarnessConfig;
use crate::core::verify::VerifyReport;
use crate::run::RunOutcome;

pub fn run_summary_json(
    outcome: &RunOutcome,
    config: &HarnessConfig,
    started: SystemTime,
    program_version: &str,
) -> Value {
    let verification = outcome
        .verification
        .iter()
        .map(verify_report_json)
        .collect::<Vec<_>>();
    json!({
        "name": "jsonbench",
        "version": program_version,
        "ts": rfc3339(started),
        "system": system_json(),
        "params": {
            "trials": config.trials(),
            "backends": outcome.backends,
            "corpus_dir": outcome.corpus_dir.as_ref().map(|dir| dir.display().to_string()),
            "corpus_entries": outcome.corpus_entries,
            "corpus_bytes": outcome.corpus_bytes,
            "debug_build": cfg!(debug_assertions),
        },
        "verification": verification,
        "all_passed": outcome.all_passed(),
        "records": outcome.records,
        "skipped_measurements": outcome.skipped_measurements,
        "report_path": outcome.report_path.as_ref().map(|path| path.display().to_string()),
        "bench_error": outcome.bench_error.as_ref().map(|err| json!({
            "kind": format!("{:?}", err.kind()),
            "message": err.message(),
        })),
    })
}

fn verify_report_json(report: &VerifyReport) -> Value {
    let failures = report
        .failures
        .iter()
        .map(|failure| {
            let mut map = Map::new();
            map.insert("entry".to_string(), json!(failure.entry));
            map.insert("kind".to_string(), json!(failure.kind));
            if let Some(detail) = &failure.detail {
                map.insert("detail".to_string(), json!(detail));
            }
            if let Some((first, second)) = &failure.stats {
                map.insert("stats".to_string(), json!({ "first": first, "second": second }));
            }
            if let Some(artifact) = &failure.artifact {
                map.insert("artifact".to_string(), json!(artifact.display().to_string()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();
    json!({
        "backend": report.backend,
        "passed": report.passed(),
        "checked": report.checked,
        "failures": failures,
    })
}

fn system_json() -> Value {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    json!({
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "cpus": cpus,
    })
}

pub fn rfc3339(ts: SystemTime) -> String {
    let dur = ts.duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = dur.as_secs() as i64;
    let nsec = dur.subsec_nanos();
    let tm = time::OffsetDateTime::from_unix_timestamp(secs)
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH);
    let tm = tm.replace_nanosecond(nsec).unwrap_or(tm);
    tm.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
