//! Scaffolding generator for Gherkin feature documents.
//!
//! A parsed [`FeatureDocument`](document::FeatureDocument) is turned into two
//! abstract code models: a stub suite with one skeleton function per step,
//! grouped by scenario, and a runner that registers Background hooks and
//! drives Scenario Outline steps once per example row. A
//! [`Renderer`](render::Renderer) then turns each model into source text.
//!
//! The crate performs no I/O. Feature text enters through a
//! [`FeatureParser`](parser::FeatureParser) and leaves as rendered strings in
//! [`GeneratedArtifacts`](generator::GeneratedArtifacts).
//!
//! # Example
//!
//! ```
//! use gherkin_scaffold::generator::{ArtifactNames, Generator};
//!
//! let source = "Feature: Login\n  Scenario: Valid login\n    Given a user exists\n";
//! let artifacts = Generator::typescript()
//!     .generate_source(source, &ArtifactNames::default())
//!     .map_err(|e| e.to_string())?;
//! assert!(artifacts.suite.source.contains("export namespace validLogin"));
//! # Ok::<(), String>(())
//! ```

pub mod ambient;
pub mod code_model;
pub mod document;
pub mod error;
pub mod generator;
pub mod ident;
pub mod parser;
pub mod render;
pub mod runner;
pub mod suite;
pub mod validation;

/// Shared fixtures for unit and integration tests.
///
/// Hidden from documentation as it is intended for test use only.
#[doc(hidden)]
pub mod test_support;

pub use document::{
    Background, ExampleTable, Feature, FeatureDocument, Scenario, ScenarioDefinition,
    ScenarioOutline, Step, StepKeyword,
};
pub use error::{ErrorKind, GenerationError};
