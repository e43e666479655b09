//! Error types for the command line front end.

use std::io;
use std::path::PathBuf;

use gherkin_scaffold::GenerationError;
use thiserror::Error;

/// Errors raised while configuring or running a scaffold pass.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The feature file could not be read.
    #[error("failed to read feature file {}: {source}", path.display())]
    ReadFeature {
        /// Input path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// An artifact could not be written to its destination.
    #[error("failed to write {}: {source}", path.display())]
    WriteArtifact {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Generation failed; nothing was written.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Diagnostics could not be serialised.
    #[error("failed to encode diagnostics: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to standard output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
