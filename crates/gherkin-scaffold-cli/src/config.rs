//! Scaffold configuration parsed from environment variables.
//!
//! Settings are read from variables prefixed with `GHERKIN_SCAFFOLD_` and may
//! then be overridden by command line flags.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use gherkin_scaffold::generator::{
    ArtifactNames, DEFAULT_RUNNER_NAME, DEFAULT_SUITE_NAME, GenerateOptions,
};

use crate::error::CliError;

/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "GHERKIN_SCAFFOLD_LOG_LEVEL";
/// Environment variable holding the suite file name.
pub const ENV_SUITE_NAME: &str = "GHERKIN_SCAFFOLD_SUITE_NAME";
/// Environment variable holding the runner file name.
pub const ENV_RUNNER_NAME: &str = "GHERKIN_SCAFFOLD_RUNNER_NAME";
/// Environment variable enabling strict mode.
pub const ENV_STRICT: &str = "GHERKIN_SCAFFOLD_STRICT";
/// Environment variable holding the output directory.
pub const ENV_OUT_DIR: &str = "GHERKIN_SCAFFOLD_OUT_DIR";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Info` when not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes code model construction.
    Trace,
    /// Pipeline stages.
    Debug,
    /// One line per generated feature.
    #[default]
    Info,
    /// Diagnostics and unresolved references.
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// How diagnostics are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DiagnosticsFormat {
    /// As log events on stderr.
    #[default]
    Log,
    /// As a JSON array on stdout, in addition to log events.
    Json,
}

/// Configuration for a scaffold run.
///
/// # Environment Variables
///
/// - `GHERKIN_SCAFFOLD_LOG_LEVEL`: trace, debug, info, warn or error
/// - `GHERKIN_SCAFFOLD_SUITE_NAME`: file name of the stub suite
/// - `GHERKIN_SCAFFOLD_RUNNER_NAME`: file name of the runner
/// - `GHERKIN_SCAFFOLD_STRICT`: abort on any error diagnostic
/// - `GHERKIN_SCAFFOLD_OUT_DIR`: directory receiving both artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    /// Feature file to read.
    pub input_path: PathBuf,
    /// Directory receiving the artifacts. Defaults to the input's directory.
    pub output_dir: PathBuf,
    /// Stub suite file name.
    pub suite_artifact_name: String,
    /// Runner file name.
    pub runner_artifact_name: String,
    /// Log level.
    pub log_level: LogLevel,
    /// Abort instead of excluding deficient scenarios.
    pub strict: bool,
    /// Print the artifacts instead of writing them.
    pub stdout: bool,
    /// Diagnostic output format.
    pub diagnostics: DiagnosticsFormat,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

/// Command line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--out-dir`
    pub output_dir: Option<PathBuf>,
    /// `--suite-name`
    pub suite_artifact_name: Option<String>,
    /// `--runner-name`
    pub runner_artifact_name: Option<String>,
    /// `--log-level`
    pub log_level: Option<LogLevel>,
    /// `--strict`
    pub strict: Option<bool>,
    /// `--stdout`
    pub stdout: Option<bool>,
    /// `--diagnostics`
    pub diagnostics: Option<DiagnosticsFormat>,
}

impl ScaffoldConfig {
    /// Defaults for `input_path`: artifacts land beside the feature file.
    #[must_use]
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        let output_dir = default_output_dir(&input_path);
        Self {
            input_path,
            output_dir,
            suite_artifact_name: DEFAULT_SUITE_NAME.into(),
            runner_artifact_name: DEFAULT_RUNNER_NAME.into(),
            log_level: LogLevel::default(),
            strict: false,
            stdout: false,
            diagnostics: DiagnosticsFormat::default(),
        }
    }

    /// Load configuration for `input_path` from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env(input_path: impl Into<PathBuf>) -> Result<Self, CliError> {
        Self::from_lookup(input_path, |key| env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable contains an invalid
    /// value.
    pub fn from_lookup<F>(input_path: impl Into<PathBuf>, lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(input_path);
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = level.parse()?;
        }
        if let Some(name) = lookup(ENV_SUITE_NAME) {
            config.suite_artifact_name = name;
        }
        if let Some(name) = lookup(ENV_RUNNER_NAME) {
            config.runner_artifact_name = name;
        }
        if let Some(strict) = lookup(ENV_STRICT) {
            config.strict = parse_flag(ENV_STRICT, &strict)?;
        }
        if let Some(dir) = lookup(ENV_OUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        config.validate()
    }

    /// Apply command line overrides and re-validate.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if the result is inconsistent.
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, CliError> {
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(name) = overrides.suite_artifact_name {
            self.suite_artifact_name = name;
        }
        if let Some(name) = overrides.runner_artifact_name {
            self.runner_artifact_name = name;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(strict) = overrides.strict {
            self.strict = strict;
        }
        if let Some(stdout) = overrides.stdout {
            self.stdout = stdout;
        }
        if let Some(format) = overrides.diagnostics {
            self.diagnostics = format;
        }
        self.validate()
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Artifact names for the generator.
    #[must_use]
    pub fn artifact_names(&self) -> ArtifactNames {
        ArtifactNames::new(&self.suite_artifact_name, &self.runner_artifact_name)
    }

    /// Generation options for the generator.
    #[must_use]
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            strict: self.strict,
        }
    }

    fn validate(self) -> Result<Self, CliError> {
        check_file_name("suite", &self.suite_artifact_name)?;
        check_file_name("runner", &self.runner_artifact_name)?;
        if self.suite_artifact_name == self.runner_artifact_name {
            return Err(CliError::InvalidConfig(format!(
                "suite and runner would both be written to '{}'",
                self.suite_artifact_name
            )));
        }
        Ok(self)
    }
}

fn default_output_dir(input_path: &Path) -> PathBuf {
    input_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn parse_flag(key: &str, value: &str) -> Result<bool, CliError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(CliError::InvalidConfig(format!(
            "invalid {key} value '{value}', expected true or false"
        ))),
    }
}

/// Artifact names must be bare file names so they cannot escape the output
/// directory.
fn check_file_name(role: &str, name: &str) -> Result<(), CliError> {
    let mut components = Path::new(name).components();
    let is_bare = matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    );
    if is_bare {
        Ok(())
    } else {
        Err(CliError::InvalidConfig(format!(
            "{role} artifact name '{name}' must be a plain file name"
        )))
    }
}
