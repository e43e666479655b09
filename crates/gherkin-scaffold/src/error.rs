//! Semantic error types for a generation pass.
//!
//! Every failure carries an [`ErrorKind`] so callers can branch on the
//! category without matching message text. Parser errors pass through
//! untouched.

use thiserror::Error;

use crate::parser::ParseError;
use crate::render::RenderError;
use crate::validation::Diagnostic;

/// Category of a [`GenerationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The feature text could not be parsed.
    Parse,
    /// An outline cannot be expanded from its Example tables.
    StructuralDeficiency,
    /// Two distinct names derive the same identifier in one scope.
    IdentifierCollision,
    /// A code model could not be rendered.
    RenderingFailure,
}

/// Errors returned by a generation pass. No artifact is produced on error.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The parsing service rejected the input.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// One or more outlines are structurally deficient and strict mode is on.
    #[error("feature `{feature}` has structurally deficient scenarios:\n{}", list(.diagnostics))]
    StructuralDeficiency {
        /// Feature name.
        feature: String,
        /// Error diagnostics that caused the rejection.
        diagnostics: Vec<Diagnostic>,
    },

    /// Derived identifiers collide.
    #[error("feature `{feature}` has colliding identifiers:\n{}", list(.diagnostics))]
    IdentifierCollision {
        /// Feature name.
        feature: String,
        /// Collision diagnostics.
        diagnostics: Vec<Diagnostic>,
    },

    /// The renderer rejected a code model.
    #[error(transparent)]
    Rendering(#[from] RenderError),
}

impl GenerationError {
    /// Category of the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::StructuralDeficiency { .. } => ErrorKind::StructuralDeficiency,
            Self::IdentifierCollision { .. } => ErrorKind::IdentifierCollision,
            Self::Rendering(_) => ErrorKind::RenderingFailure,
        }
    }

    /// Diagnostics that caused the error, if any.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::StructuralDeficiency { diagnostics, .. }
            | Self::IdentifierCollision { diagnostics, .. } => diagnostics,
            Self::Parse(_) | Self::Rendering(_) => &[],
        }
    }
}

fn list(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}
