//! Binary entry point for `gherkin-scaffold`.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, WrapErr};

use gherkin_scaffold_cli::config::{ConfigOverrides, DiagnosticsFormat, LogLevel, ScaffoldConfig};
use gherkin_scaffold_cli::error::CliError;
use gherkin_scaffold_cli::logging::init_logging;
use gherkin_scaffold_cli::scaffold::run;

/// Generate a step stub suite and a test runner from a Gherkin feature file.
#[derive(Parser, Debug)]
#[command(name = "gherkin-scaffold", version, about)]
struct Args {
    /// Feature file to scaffold.
    input: PathBuf,

    /// Directory receiving the generated files [default: the input's directory].
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// File name of the stub suite [default: suite.ts].
    #[arg(long)]
    suite_name: Option<String>,

    /// File name of the runner [default: runner.ts].
    #[arg(long)]
    runner_name: Option<String>,

    /// Abort on any error diagnostic instead of skipping the scenario.
    #[arg(long)]
    strict: bool,

    /// Print both artifacts to stdout instead of writing files.
    #[arg(long)]
    stdout: bool,

    /// How to report diagnostics.
    #[arg(long, value_enum, conflicts_with = "stdout")]
    diagnostics: Option<DiagnosticsFormat>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ScaffoldConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    init_logging(&config);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), ?config, "starting gherkin-scaffold");

    let outcome = run(&config, &mut io::stdout().lock())
        .wrap_err_with(|| format!("failed to scaffold {}", config.input_path.display()))?;

    tracing::info!(
        files = outcome.written.len(),
        diagnostics = outcome.diagnostics.len(),
        "scaffold complete"
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<ScaffoldConfig, CliError> {
    ScaffoldConfig::from_env(&args.input)?.apply_overrides(ConfigOverrides {
        output_dir: args.out_dir.clone(),
        suite_artifact_name: args.suite_name.clone(),
        runner_artifact_name: args.runner_name.clone(),
        log_level: args.log_level,
        strict: args.strict.then_some(true),
        stdout: args.stdout.then_some(true),
        diagnostics: args.diagnostics,
    })
}
