// CLI integration tests: corpus loading, report layout, summary JSON, exit codes.
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_jsonbench");
    let mut command = Command::new(exe);
    command.env("RUST_LOG", "off");
    command
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn last_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().last().expect("json line");
    parse_json(line)
}

fn write_corpus(dir: &Path) {
    fs::create_dir_all(dir).expect("corpus dir");
    fs::write(
        dir.join("data.txt"),
        "good.json\ntruncated.json   missing.json\n",
    )
    .expect("manifest");
    fs::write(dir.join("good.json"), br#"{"a":1,"b":[true,false,null]}"#).expect("good");
    fs::write(dir.join("truncated.json"), br#"{"a":"#).expect("truncated");
}

fn run_harness(dir: &Path, extra: &[&str]) -> Output {
    let corpus = dir.join("data");
    write_corpus(&corpus);
    let mut command = cmd();
    command.args([
        "--data-dir",
        corpus.to_str().unwrap(),
        "--out",
        dir.join("out/report.csv").to_str().unwrap(),
        "--artifact-dir",
        dir.to_str().unwrap(),
        "--trials",
        "2",
    ]);
    command.args(extra).output().expect("run")
}

#[test]
fn full_run_writes_report_and_json_summary() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_harness(temp.path(), &["--format", "json"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let summary = parse_json(std::str::from_utf8(&output.stdout).expect("utf8"));
    assert_eq!(summary["name"], "jsonbench");
    assert_eq!(summary["params"]["trials"], 2);
    assert_eq!(summary["params"]["corpus_entries"], 2);
    assert_eq!(summary["all_passed"], false);

    let backends = summary["params"]["backends"]
        .as_array()
        .expect("backends")
        .iter()
        .map(|name| name.as_str().expect("name").to_string())
        .collect::<Vec<_>>();
    assert!(backends.contains(&"serde_json".to_string()));
    assert!(backends.contains(&"simd-json".to_string()));
    let mut sorted = backends.clone();
    sorted.sort();
    assert_eq!(backends, sorted);

    for report in summary["verification"].as_array().expect("verification") {
        assert_eq!(report["passed"], false);
        assert_eq!(report["checked"], 2);
        let failure = &report["failures"][0];
        assert_eq!(failure["entry"], "truncated.json");
        assert_eq!(failure["kind"], "parse_failed");
    }

    let csv = fs::read_to_string(temp.path().join("out/report.csv")).expect("report");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Type,Library,Filename,Time(ms)"));
    let rows = lines
        .map(|line| line.split(',').map(str::to_string).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(rows.len(), backends.len() * 4);
    assert!(rows.iter().all(|row| row[2] == "good.json"));
    assert!(rows.iter().all(|row| row[3].parse::<f64>().expect("ms") >= 0.0));

    let expected_order = backends
        .iter()
        .flat_map(|backend| {
            ["Parse", "Stringify", "Prettify", "Statistics"]
                .into_iter()
                .map(move |op| (op.to_string(), backend.clone()))
        })
        .collect::<Vec<_>>();
    let actual_order = rows
        .iter()
        .map(|row| (row[0].clone(), row[1].clone()))
        .collect::<Vec<_>>();
    assert_eq!(actual_order, expected_order);

    assert_eq!(summary["records"].as_array().expect("records").len(), rows.len());
    assert!(summary["report_path"].as_str().expect("path").ends_with("report.csv"));
}

#[test]
fn table_output_goes_to_stderr_only() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_harness(temp.path(), &["--backend", "serde_json"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Verifying serde_json ... "));
    assert!(stderr.contains("Parse failed 'truncated.json'"));
    assert!(stderr.contains("Failed (1/2 entries)"));
    assert!(stderr.contains("Benchmarking serde_json"));
    assert!(!stderr.contains("simd-json"));
}

#[test]
fn strict_mode_fails_on_verification_errors() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_harness(temp.path(), &["--strict", "--format", "json"]);
    assert_eq!(output.status.code(), Some(6));
    // The summary and report are still produced before the verdict.
    assert!(!output.stdout.is_empty());
    assert!(temp.path().join("out/report.csv").exists());
    let err = last_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Verification");
}

#[test]
fn unwritable_report_still_prints_verification() {
    let temp = tempfile::tempdir().expect("tempdir");
    let corpus = temp.path().join("data");
    write_corpus(&corpus);
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, b"").expect("blocker");

    let output = cmd()
        .args([
            "--data-dir",
            corpus.to_str().unwrap(),
            "--out",
            blocker.join("r.csv").to_str().unwrap(),
            "--artifact-dir",
            temp.path().to_str().unwrap(),
            "--trials",
            "1",
            "--format",
            "json",
        ])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(4));

    let summary = parse_json(std::str::from_utf8(&output.stdout).expect("utf8"));
    let verification = summary["verification"].as_array().expect("verification");
    assert!(!verification.is_empty());
    for report in verification {
        assert_eq!(report["failures"][0]["entry"], "truncated.json");
        assert_eq!(report["failures"][0]["kind"], "parse_failed");
    }
    assert_eq!(summary["bench_error"]["kind"], "Io");
    assert!(summary["report_path"].is_null());
    assert_eq!(summary["records"].as_array().expect("records").len(), 0);

    let err = last_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Io");
    assert!(err["error"]["hint"].as_str().is_some());
}

#[test]
fn skip_bench_writes_no_report() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_harness(temp.path(), &["--skip-bench", "--format", "json"]);
    assert!(output.status.success());
    assert!(!temp.path().join("out/report.csv").exists());
    let summary = parse_json(std::str::from_utf8(&output.stdout).expect("utf8"));
    assert!(summary["report_path"].is_null());
    assert_eq!(summary["records"].as_array().expect("records").len(), 0);
}

#[test]
fn zero_trials_is_a_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_harness(temp.path(), &["--trials", "0"]);
    assert_eq!(output.status.code(), Some(2));
    let err = last_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
    assert!(err["error"]["hint"].as_str().is_some());
}

#[test]
fn unknown_backend_is_a_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_harness(temp.path(), &["--backend", "no-such-lib"]);
    assert_eq!(output.status.code(), Some(2));
    let err = last_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}

#[test]
fn missing_corpus_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = cmd()
        .args(["--data-dir", temp.path().join("nowhere").to_str().unwrap()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));
    let err = last_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "NotFound");
    assert!(
        err["error"]["message"]
            .as_str()
            .expect("message")
            .contains("data.txt")
    );
}

#[test]
fn list_prints_backends_in_run_order() {
    let output = cmd().arg("list").output().expect("list");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let names = stdout.lines().collect::<Vec<_>>();
    assert_eq!(&names[..2], ["serde_json", "simd-json"]);
}

#[test]
fn bad_flag_is_a_usage_error() {
    let output = cmd().arg("--no-such-flag").output().expect("run");
    assert_eq!(output.status.code(), Some(2));
    let err = last_json_line(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}
