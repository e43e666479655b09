//! Parsing service boundary.
//!
//! The generators only see the [`document`](crate::document) model. Feature
//! text reaches it through a [`FeatureParser`], so tests can substitute
//! hand-built documents and alternative front ends can be plugged in.
//! [`GherkinParser`] is the default implementation, backed by the `gherkin`
//! crate.

use gherkin::{GherkinEnv, StepType};
use thiserror::Error;

use crate::document::{
    Background, ExampleTable, Feature, FeatureDocument, Scenario, ScenarioDefinition,
    ScenarioOutline, Step, StepKeyword,
};

/// Errors produced by a [`FeatureParser`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The Gherkin grammar rejected the input.
    #[error("failed to parse feature file: {0}")]
    Gherkin(#[from] gherkin::ParseError),
}

/// Turns feature text into a [`FeatureDocument`].
pub trait FeatureParser {
    /// Parse `source` into a document.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is not a valid feature.
    fn parse(&self, source: &str) -> Result<FeatureDocument, ParseError>;
}

/// [`FeatureParser`] backed by the `gherkin` crate's English grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GherkinParser;

impl FeatureParser for GherkinParser {
    fn parse(&self, source: &str) -> Result<FeatureDocument, ParseError> {
        let feature = gherkin::Feature::parse(source, GherkinEnv::default())?;
        Ok(FeatureDocument::new(lift_feature(&feature)))
    }
}

/// Lift a parsed `gherkin` feature into the document model.
///
/// Feature-level definitions come first; each `Rule` then contributes its
/// own Background followed by its scenarios, preserving source order.
#[must_use]
pub fn lift_feature(feature: &gherkin::Feature) -> Feature {
    let mut children = Vec::new();
    push_definitions(
        &mut children,
        feature.background.as_ref(),
        &feature.scenarios,
    );
    for rule in &feature.rules {
        push_definitions(&mut children, rule.background.as_ref(), &rule.scenarios);
    }
    Feature {
        name: feature.name.clone(),
        description: feature
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        children,
    }
}

fn push_definitions(
    children: &mut Vec<ScenarioDefinition>,
    background: Option<&gherkin::Background>,
    scenarios: &[gherkin::Scenario],
) {
    if let Some(bg) = background {
        children.push(ScenarioDefinition::Background(Background {
            name: bg.name.clone(),
            steps: lift_steps(&bg.steps),
        }));
    }
    children.extend(scenarios.iter().map(lift_scenario));
}

/// A scenario is an outline when it owns Examples or is introduced by an
/// outline keyword, even if its Examples were omitted.
fn is_outline(scenario: &gherkin::Scenario) -> bool {
    let keyword = scenario.keyword.to_ascii_lowercase();
    !scenario.examples.is_empty() || keyword.contains("outline") || keyword.contains("template")
}

fn lift_scenario(scenario: &gherkin::Scenario) -> ScenarioDefinition {
    let steps = lift_steps(&scenario.steps);
    if is_outline(scenario) {
        ScenarioDefinition::ScenarioOutline(ScenarioOutline {
            name: scenario.name.clone(),
            steps,
            examples: scenario.examples.iter().map(lift_examples).collect(),
        })
    } else {
        ScenarioDefinition::Scenario(Scenario {
            name: scenario.name.clone(),
            steps,
        })
    }
}

/// An Examples block without a table becomes a table with an empty header.
fn lift_examples(examples: &gherkin::Examples) -> ExampleTable {
    let Some(table) = examples.table.as_ref() else {
        return ExampleTable::default();
    };
    let mut rows = table.rows.iter();
    ExampleTable {
        header: rows.next().cloned().unwrap_or_default(),
        rows: rows.cloned().collect(),
    }
}

fn lift_steps(steps: &[gherkin::Step]) -> Vec<Step> {
    steps
        .iter()
        .map(|step| Step {
            keyword: step_keyword(&step.keyword, step.ty),
            text: step.value.clone(),
        })
        .collect()
}

/// Map a textual keyword and its [`StepType`] to a [`StepKeyword`].
///
/// The literal keyword wins so conjunctions are preserved; anything else
/// (including localised keywords) falls back to the parser's step type.
fn step_keyword(keyword: &str, ty: StepType) -> StepKeyword {
    keyword.parse().unwrap_or(match ty {
        StepType::Given => StepKeyword::Given,
        StepType::When => StepKeyword::When,
        StepType::Then => StepKeyword::Then,
    })
}
