//! Command line front end for `gherkin-scaffold`.
//!
//! Reads one feature file, generates the stub suite and runner in memory and
//! writes both into an output directory, or prints them with `--stdout`.
//!
//! # Configuration
//!
//! Settings come from environment variables, overridden by flags:
//!
//! - `GHERKIN_SCAFFOLD_LOG_LEVEL`: log verbosity (trace, debug, info, warn,
//!   error)
//! - `GHERKIN_SCAFFOLD_SUITE_NAME` / `GHERKIN_SCAFFOLD_RUNNER_NAME`: artifact
//!   file names
//! - `GHERKIN_SCAFFOLD_STRICT`: abort on any error diagnostic
//! - `GHERKIN_SCAFFOLD_OUT_DIR`: output directory
//!
//! # Example
//!
//! ```no_run
//! use gherkin_scaffold_cli::config::ScaffoldConfig;
//! use gherkin_scaffold_cli::scaffold::run;
//!
//! let config = ScaffoldConfig::from_env("features/login.feature")?;
//! let outcome = run(&config, &mut std::io::stdout())?;
//! assert_eq!(outcome.written.len(), 2);
//! # Ok::<(), gherkin_scaffold_cli::error::CliError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scaffold;
