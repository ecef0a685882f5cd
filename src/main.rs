//! Purpose: `jsonbench` CLI entry point.
//! Role: Binary crate root; parses args, loads the corpus, runs the harness, emits summaries.
//! Invariants: Operator progress and logs go to stderr; stdout carries only machine output.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::error::Error as StdError;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::SystemTime;

use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use jsonbench::backends::register_builtin;
use jsonbench::config::HarnessConfig;
use jsonbench::core::bench::DEFAULT_TRIALS;
use jsonbench::summary::run_summary_json;
use jsonbench::{Corpus, Error, ErrorKind, Registry, to_exit_code};

#[derive(Parser)]
#[command(
    name = "jsonbench",
    version,
    about = "Verify JSON round-trips and benchmark JSON backends over a shared corpus",
    long_about = None,
    after_help = r#"EXAMPLES
  $ jsonbench                                  # corpus from ../data or ../../data
  $ jsonbench --data-dir corpus --trials 20
  $ jsonbench --backend serde_json --format json > summary.json
  $ jsonbench list

The corpus directory holds a data.txt manifest listing one file name per token.
Benchmark records are written as CSV: Type,Library,Filename,Time(ms)"#
)]
struct Cli {
    #[arg(long, default_value_t = DEFAULT_TRIALS, help = "Timed trials per measurement (minimum is reported)")]
    trials: usize,
    #[arg(
        long = "data-dir",
        value_hint = ValueHint::DirPath,
        help = "Corpus directory with a data.txt manifest; repeat to search in order (default: ../data, ../../data)"
    )]
    data_dirs: Vec<PathBuf>,
    #[arg(
        long,
        value_hint = ValueHint::FilePath,
        help = "Report path (default: <arch>_<os>_rustc.csv in ../../result, ../result, or .)"
    )]
    out: Option<PathBuf>,
    #[arg(
        long = "artifact-dir",
        default_value = ".",
        value_hint = ValueHint::DirPath,
        help = "Where round-trip mismatch renderings are written"
    )]
    artifact_dir: PathBuf,
    #[arg(long = "backend", help = "Only run this backend; repeatable")]
    backends: Vec<String>,
    #[arg(long, help = "Skip the round-trip verification phase")]
    skip_verify: bool,
    #[arg(long, help = "Skip the benchmark phase (no report is written)")]
    skip_bench: bool,
    #[arg(
        long,
        default_value = "table",
        value_enum,
        help = "Output: table (progress on stderr), json (summary on stdout), or both"
    )]
    format: OutputFormat,
    #[arg(long, help = "Exit non-zero when any backend fails verification")]
    strict: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print registered backends in run order
    List,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Both,
}

impl OutputFormat {
    fn shows_table(self) -> bool {
        matches!(self, OutputFormat::Table | OutputFormat::Both)
    }

    fn shows_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

impl Cli {
    fn harness_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new()
            .with_trials(self.trials)
            .with_artifact_dir(&self.artifact_dir)
            .with_backends(self.backends.clone())
            .with_skip_verify(self.skip_verify)
            .with_skip_bench(self.skip_bench);
        if !self.data_dirs.is_empty() {
            config = config.with_data_dirs(self.data_dirs.clone());
        }
        if let Some(out) = &self.out {
            config = config.with_report_path(out);
        }
        config
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(0);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `jsonbench --help` for usage."));
            }
        },
    };

    let mut registry = Registry::new();
    register_builtin(&mut registry);

    if let Some(Command::List) = cli.command {
        let mut stdout = io::stdout().lock();
        for name in registry.freeze().names() {
            writeln!(stdout, "{name}").map_err(stdout_error)?;
        }
        return Ok(0);
    }

    let config = cli.harness_config();
    config.validate()?;

    let started = SystemTime::now();
    let corpus = Corpus::load(config.data_dirs())?;

    let mut stderr = io::stderr();
    let mut quiet = io::sink();
    let console: &mut dyn Write = if cli.format.shows_table() {
        &mut stderr
    } else {
        &mut quiet
    };
    let mut outcome = jsonbench::run::run(&config, registry, corpus, console)?;

    if let Some(path) = &outcome.report_path {
        tracing::info!(path = %path.display(), records = outcome.records.len(), "benchmark complete");
    }
    if cli.format.shows_json() {
        let value = run_summary_json(&outcome, &config, started, env!("CARGO_PKG_VERSION"));
        emit_json(&value)?;
    }

    // Verification results are out; a benchmark failure still decides the exit code.
    if let Some(err) = outcome.bench_error.take() {
        return Err(err);
    }
    if cli.strict && !outcome.all_passed() {
        return Err(Error::new(ErrorKind::Verification).with_message(format!(
            "round-trip verification failed for: {}",
            outcome.failed_backends().join(", ")
        )));
    }
    Ok(0)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").map_err(stdout_error)
}

fn stdout_error(err: io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to write stdout")
        .with_source(err)
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }
    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::Backend => "backend failure".to_string(),
        ErrorKind::Verification => "verification failed".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(backend) = err.backend_name() {
        inner.insert("backend".to_string(), json!(backend));
    }
    if let Some(entry) = err.entry() {
        inner.insert("entry".to_string(), json!(entry));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {}", path.display()));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{error_json, error_text};
    use jsonbench::{Error, ErrorKind};

    fn nested() -> Error {
        let inner = Error::new(ErrorKind::Io)
            .with_message("cannot create report directory")
            .with_source(std::io::Error::other("permission denied"));
        Error::new(ErrorKind::Io)
            .with_message("report unavailable")
            .with_hint("Pass --out with a writable report path.")
            .with_source(inner)
    }

    #[test]
    fn error_text_shows_only_the_first_cause() {
        let text = error_text(&nested());
        assert!(text.starts_with("error: report unavailable\nhint: "));
        assert_eq!(text.matches("caused by:").count(), 1);
        assert!(text.contains("cannot create report directory"));
        assert!(!text.contains("permission denied"));
    }

    #[test]
    fn error_json_lists_every_cause() {
        let value = error_json(&nested());
        assert_eq!(value["error"]["kind"], "Io");
        assert_eq!(value["error"]["causes"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["error"]["causes"][1], "permission denied");
    }
}
