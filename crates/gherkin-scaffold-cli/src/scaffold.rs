//! A single scaffold run: read, generate, then write or print.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use gherkin_scaffold::generator::Generator;
use gherkin_scaffold::validation::Diagnostic;

use crate::config::{DiagnosticsFormat, ScaffoldConfig};
use crate::error::CliError;
use crate::output::{print_artifacts, write_artifacts};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    /// Files written; empty when printing to stdout.
    pub written: Vec<PathBuf>,
    /// Diagnostics reported by the generator.
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate both artifacts for `config.input_path`.
///
/// Artifacts are only written once both have been rendered. With
/// `config.stdout` they are printed to `out` instead; with JSON diagnostics
/// the diagnostic list is printed to `out`, also when generation fails.
///
/// # Errors
///
/// Returns [`CliError`] when the input cannot be read, generation fails or
/// an artifact cannot be written.
pub fn run<W: Write>(config: &ScaffoldConfig, out: &mut W) -> Result<ScaffoldOutcome, CliError> {
    let _span = tracing::info_span!("scaffold", input = %config.input_path.display()).entered();

    let source = fs::read_to_string(&config.input_path).map_err(|source| CliError::ReadFeature {
        path: config.input_path.clone(),
        source,
    })?;

    let generator = Generator::typescript_with(config.generate_options());
    let artifacts = match generator.generate_source(&source, &config.artifact_names()) {
        Ok(artifacts) => artifacts,
        Err(err) => {
            if config.diagnostics == DiagnosticsFormat::Json {
                print_diagnostics(out, err.diagnostics())?;
            }
            return Err(err.into());
        }
    };

    let written = if config.stdout {
        print_artifacts(out, &[&artifacts.suite, &artifacts.runner])?;
        Vec::new()
    } else {
        write_artifacts(&config.output_dir, &[&artifacts.suite, &artifacts.runner])?
    };

    if config.diagnostics == DiagnosticsFormat::Json {
        print_diagnostics(out, &artifacts.diagnostics)?;
    }

    Ok(ScaffoldOutcome {
        written,
        diagnostics: artifacts.diagnostics,
    })
}

fn print_diagnostics<W: Write>(out: &mut W, diagnostics: &[Diagnostic]) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, diagnostics)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
