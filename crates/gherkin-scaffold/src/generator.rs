//! End-to-end generation pipeline.
//!
//! A [`Generator`] validates a document, drops structurally deficient
//! outlines (or aborts, in strict mode), builds both code models and renders
//! them. Both artifacts are rendered before either is returned.

use std::borrow::Cow;
use std::collections::HashSet;

use crate::ambient::{AmbientBinding, RUNNER_BINDINGS, SUITE_BINDINGS};
use crate::document::{Feature, FeatureDocument};
use crate::error::GenerationError;
use crate::parser::{FeatureParser, GherkinParser};
use crate::render::{Renderer, TypeScriptRenderer};
use crate::runner::build_runner;
use crate::suite::build_suite;
use crate::validation::{Diagnostic, DiagnosticKind, Severity, validate};

/// Default file name of the stub suite.
pub const DEFAULT_SUITE_NAME: &str = "suite.ts";

/// Default file name of the runner.
pub const DEFAULT_RUNNER_NAME: &str = "runner.ts";

/// Names given to the two artifacts of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// Stub suite file name.
    pub suite: String,
    /// Runner file name.
    pub runner: String,
}

impl ArtifactNames {
    /// Explicit artifact names.
    #[must_use]
    pub fn new(suite: impl Into<String>, runner: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            runner: runner.into(),
        }
    }
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self::new(DEFAULT_SUITE_NAME, DEFAULT_RUNNER_NAME)
    }
}

/// Options controlling error containment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Abort on any error diagnostic instead of excluding the affected
    /// scenario.
    pub strict: bool,
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name.
    pub name: String,
    /// Rendered source text.
    pub source: String,
    /// Bindings the host must provide before the artifact is loaded.
    pub bindings: &'static [AmbientBinding],
}

/// Output of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// The stub suite.
    pub suite: Artifact,
    /// The runner.
    pub runner: Artifact,
    /// Warnings, plus errors for scenarios excluded in lenient mode.
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedArtifacts {
    /// Scenarios excluded from both artifacts.
    pub fn excluded_scenarios(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::StructuralDeficiency)
            .filter(move |d| seen.insert(d.child))
            .filter_map(|d| d.scenario.as_deref())
    }
}

/// Parses, validates, builds and renders feature documents.
#[derive(Debug, Clone, Default)]
pub struct Generator<P, R> {
    parser: P,
    renderer: R,
    options: GenerateOptions,
}

impl Generator<GherkinParser, TypeScriptRenderer> {
    /// Lenient generator for Gherkin input and TypeScript output.
    #[must_use]
    pub fn typescript() -> Self {
        Self::typescript_with(GenerateOptions::default())
    }

    /// Gherkin-to-TypeScript generator whose renderer shares the
    /// strictness of `options`.
    #[must_use]
    pub fn typescript_with(options: GenerateOptions) -> Self {
        Self::new(
            GherkinParser,
            TypeScriptRenderer::new().with_strict(options.strict),
        )
        .with_options(options)
    }
}

impl<P: FeatureParser, R: Renderer> Generator<P, R> {
    /// Combine a parser and a renderer with default options.
    pub fn new(parser: P, renderer: R) -> Self {
        Self {
            parser,
            renderer,
            options: GenerateOptions::default(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse `source` and generate both artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Parse`] for input the parser rejects and
    /// any error of [`Generator::generate_document`].
    pub fn generate_source(
        &self,
        source: &str,
        names: &ArtifactNames,
    ) -> Result<GeneratedArtifacts, GenerationError> {
        let document = self.parser.parse(source)?;
        self.generate_document(&document, names)
    }

    /// Generate both artifacts for an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::IdentifierCollision`] whenever derived
    /// identifiers collide, [`GenerationError::StructuralDeficiency`] in
    /// strict mode when an outline cannot be expanded, and
    /// [`GenerationError::Rendering`] when the renderer rejects a model.
    pub fn generate_document(
        &self,
        document: &FeatureDocument,
        names: &ArtifactNames,
    ) -> Result<GeneratedArtifacts, GenerationError> {
        let feature = &document.feature;
        let report = validate(feature);
        for diagnostic in report.diagnostics() {
            log_diagnostic(&feature.name, diagnostic);
        }

        let collisions: Vec<_> = report
            .of_kind(DiagnosticKind::IdentifierCollision)
            .cloned()
            .collect();
        if !collisions.is_empty() {
            return Err(GenerationError::IdentifierCollision {
                feature: feature.name.clone(),
                diagnostics: collisions,
            });
        }
        if self.options.strict && report.has_errors() {
            return Err(GenerationError::StructuralDeficiency {
                feature: feature.name.clone(),
                diagnostics: report.diagnostics().iter().filter(|d| d.is_error()).cloned().collect(),
            });
        }

        let contained = contain(feature, &report.deficient_children());
        tracing::debug!(
            feature = %feature.name,
            definitions = contained.children.len(),
            "building code models"
        );
        let suite = build_suite(&contained);
        let runner = build_runner(&contained);

        let suite_source = self.renderer.render(&names.suite, &suite)?;
        let runner_source = self.renderer.render(&names.runner, &runner)?;
        tracing::info!(
            feature = %feature.name,
            suite = %names.suite,
            runner = %names.runner,
            "generated artifacts"
        );

        Ok(GeneratedArtifacts {
            suite: Artifact {
                name: names.suite.clone(),
                source: suite_source,
                bindings: SUITE_BINDINGS,
            },
            runner: Artifact {
                name: names.runner.clone(),
                source: runner_source,
                bindings: RUNNER_BINDINGS,
            },
            diagnostics: report.into_diagnostics(),
        })
    }
}

/// The feature without the children at `excluded`.
fn contain<'a>(feature: &'a Feature, excluded: &HashSet<usize>) -> Cow<'a, Feature> {
    if excluded.is_empty() {
        return Cow::Borrowed(feature);
    }
    Cow::Owned(Feature {
        name: feature.name.clone(),
        description: feature.description.clone(),
        children: feature
            .children
            .iter()
            .enumerate()
            .filter(|(index, _)| !excluded.contains(index))
            .map(|(_, child)| child.clone())
            .collect(),
    })
}

fn log_diagnostic(feature: &str, diagnostic: &Diagnostic) {
    let scenario = diagnostic.scenario.as_deref().unwrap_or_default();
    match diagnostic.severity {
        Severity::Warning => tracing::warn!(
            feature,
            scenario,
            kind = ?diagnostic.kind,
            "{}",
            diagnostic.message
        ),
        Severity::Error => tracing::error!(
            feature,
            scenario,
            kind = ?diagnostic.kind,
            "{}",
            diagnostic.message
        ),
    }
}
