//! Document model for parsed feature files.
//!
//! The model mirrors the subset of Gherkin the generators consume: a single
//! [`Feature`] whose children keep their source order. Values are immutable
//! once produced by a [`FeatureParser`](crate::parser::FeatureParser); the
//! builder-style constructors exist so tests can assemble documents by hand.

use std::fmt;
use std::str::FromStr;

/// Root of a parsed feature file. Owns exactly one [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDocument {
    /// The single feature described by the document.
    pub feature: Feature,
}

impl FeatureDocument {
    /// Wrap a feature in a document.
    #[must_use]
    pub fn new(feature: Feature) -> Self {
        Self { feature }
    }
}

/// A feature and its ordered scenario definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Feature title as written after `Feature:`.
    pub name: String,
    /// Free text between the title and the first definition.
    pub description: Option<String>,
    /// Backgrounds, scenarios and outlines in document order.
    pub children: Vec<ScenarioDefinition>,
}

impl Feature {
    /// Create an empty feature with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            children: Vec::new(),
        }
    }

    /// Append a definition, preserving insertion order.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<ScenarioDefinition>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Iterate over the Background definitions.
    pub fn backgrounds(&self) -> impl Iterator<Item = &Background> {
        self.children.iter().filter_map(|c| match c {
            ScenarioDefinition::Background(bg) => Some(bg),
            _ => None,
        })
    }

    /// Iterate over the Scenario Outline definitions.
    pub fn outlines(&self) -> impl Iterator<Item = &ScenarioOutline> {
        self.children.iter().filter_map(|c| match c {
            ScenarioDefinition::ScenarioOutline(outline) => Some(outline),
            _ => None,
        })
    }
}

/// One child of a [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioDefinition {
    /// Steps run once before every scenario of the feature.
    Background(Background),
    /// A fixed sequence of steps.
    Scenario(Scenario),
    /// A parameterised scenario driven by example rows.
    ScenarioOutline(ScenarioOutline),
}

impl ScenarioDefinition {
    /// Name of the definition as written in the source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Background(bg) => &bg.name,
            Self::Scenario(sc) => &sc.name,
            Self::ScenarioOutline(outline) => &outline.name,
        }
    }

    /// Steps of the definition in source order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        match self {
            Self::Background(bg) => &bg.steps,
            Self::Scenario(sc) => &sc.steps,
            Self::ScenarioOutline(outline) => &outline.steps,
        }
    }

    /// Return `true` for Background entries.
    #[must_use]
    pub fn is_background(&self) -> bool {
        matches!(self, Self::Background(_))
    }

    /// Return `true` for Scenario Outline entries.
    #[must_use]
    pub fn is_outline(&self) -> bool {
        matches!(self, Self::ScenarioOutline(_))
    }

    /// Example tables owned by the definition; empty unless it is an outline.
    #[must_use]
    pub fn examples(&self) -> &[ExampleTable] {
        match self {
            Self::ScenarioOutline(outline) => &outline.examples,
            Self::Background(_) | Self::Scenario(_) => &[],
        }
    }

    /// Human-readable label used in diagnostics and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Background(_) => "Background",
            Self::Scenario(_) => "Scenario",
            Self::ScenarioOutline(_) => "Scenario Outline",
        }
    }
}

impl From<Background> for ScenarioDefinition {
    fn from(value: Background) -> Self {
        Self::Background(value)
    }
}

impl From<Scenario> for ScenarioDefinition {
    fn from(value: Scenario) -> Self {
        Self::Scenario(value)
    }
}

impl From<ScenarioOutline> for ScenarioDefinition {
    fn from(value: ScenarioOutline) -> Self {
        Self::ScenarioOutline(value)
    }
}

/// Background steps shared by every scenario in a feature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Background {
    /// Optional title after `Background:`; often empty.
    pub name: String,
    /// Steps in source order.
    pub steps: Vec<Step>,
}

impl Background {
    /// Create a background with the given name and no steps.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// A plain scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Scenario title.
    pub name: String,
    /// Steps in source order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Create a scenario with the given name and no steps.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// A scenario outline together with its example tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutline {
    /// Outline title.
    pub name: String,
    /// Steps in source order, possibly containing `<placeholder>` tokens.
    pub steps: Vec<Step>,
    /// Example tables; only the first drives generation.
    pub examples: Vec<ExampleTable>,
}

impl ScenarioOutline {
    /// Create an outline with the given name, no steps and no tables.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append an example table.
    #[must_use]
    pub fn with_examples(mut self, table: ExampleTable) -> Self {
        self.examples.push(table);
        self
    }

    /// The table that drives row types and row iteration.
    #[must_use]
    pub fn first_table(&self) -> Option<&ExampleTable> {
        self.examples.first()
    }
}

/// Header and body rows of an `Examples:` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExampleTable {
    /// Column names in header order.
    pub header: Vec<String>,
    /// Body rows; each should have as many cells as the header.
    pub rows: Vec<Vec<String>>,
}

impl ExampleTable {
    /// Create a table from header cells and no body rows.
    #[must_use]
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a body row.
    #[must_use]
    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Pair each body row's cells with the header names, in header order.
    ///
    /// Rows are zipped against the header, so surplus cells are dropped and
    /// missing cells are absent; validation rejects such rows beforehand.
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &str)>> + '_ {
        self.rows.iter().map(|row| {
            self.header
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(String::as_str))
                .collect()
        })
    }
}

/// A single step line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Leading keyword.
    pub keyword: StepKeyword,
    /// Text after the keyword.
    pub text: String,
}

impl Step {
    /// Create a step from a keyword and its text.
    #[must_use]
    pub fn new(keyword: StepKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword,
            text: text.into(),
        }
    }

    /// Shorthand for a `Given` step.
    #[must_use]
    pub fn given(text: impl Into<String>) -> Self {
        Self::new(StepKeyword::Given, text)
    }

    /// Shorthand for a `When` step.
    #[must_use]
    pub fn when(text: impl Into<String>) -> Self {
        Self::new(StepKeyword::When, text)
    }

    /// Shorthand for a `Then` step.
    #[must_use]
    pub fn then(text: impl Into<String>) -> Self {
        Self::new(StepKeyword::Then, text)
    }

    /// Shorthand for an `And` step.
    #[must_use]
    pub fn and(text: impl Into<String>) -> Self {
        Self::new(StepKeyword::And, text)
    }

    /// Keyword and text joined as they read in the feature file.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_scaffold::Step;
    ///
    /// assert_eq!(Step::given("a user exists").display_text(), "Given a user exists");
    /// ```
    #[must_use]
    pub fn display_text(&self) -> String {
        format!("{} {}", self.keyword, self.text)
    }
}

/// Keyword introducing a step.
///
/// Conjunctions are kept as written: generated identifiers are derived from
/// the literal keyword, so `And` and `But` are not resolved against the
/// preceding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Setup preconditions.
    Given,
    /// The action under test.
    When,
    /// Expected outcome.
    Then,
    /// Continuation of the previous step.
    And,
    /// Contrasting continuation of the previous step.
    But,
}

impl StepKeyword {
    /// Return the keyword as written in English Gherkin.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`StepKeyword`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid step keyword: {0}")]
pub struct StepKeywordParseError(pub String);

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        [Self::Given, Self::When, Self::Then, Self::And, Self::But]
            .into_iter()
            .find(|kw| trimmed.eq_ignore_ascii_case(kw.as_str()))
            .ok_or_else(|| StepKeywordParseError(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Given", StepKeyword::Given)]
    #[case(" when ", StepKeyword::When)]
    #[case("THEN", StepKeyword::Then)]
    #[case("And ", StepKeyword::And)]
    #[case("but", StepKeyword::But)]
    fn parses_keywords_case_insensitively(#[case] input: &str, #[case] expected: StepKeyword) {
        assert_eq!(input.parse::<StepKeyword>().ok(), Some(expected));
    }

    #[test]
    fn rejects_unknown_keyword() {
        let err = "Suppose".parse::<StepKeyword>().err();
        assert_eq!(err, Some(StepKeywordParseError("Suppose".into())));
    }

    #[test]
    fn records_pair_cells_with_header_names() {
        let table = ExampleTable::new(["username", "password"])
            .with_row(["alice", "secret"])
            .with_row(["bob", "hunter2"]);
        let records: Vec<_> = table.records().collect();
        assert_eq!(
            records,
            vec![
                vec![("username", "alice"), ("password", "secret")],
                vec![("username", "bob"), ("password", "hunter2")],
            ]
        );
    }

    #[test]
    fn definition_accessors_cover_every_variant() {
        let feature = Feature::new("f")
            .with_child(Background::new("setup").with_step(Step::given("x")))
            .with_child(Scenario::new("plain"))
            .with_child(ScenarioOutline::new("outline").with_examples(ExampleTable::new(["a"])));

        let labels: Vec<_> = feature.children.iter().map(ScenarioDefinition::label).collect();
        assert_eq!(labels, ["Background", "Scenario", "Scenario Outline"]);
        assert_eq!(feature.backgrounds().count(), 1);
        assert_eq!(feature.outlines().count(), 1);
        assert!(feature.children.iter().all(|c| c.is_outline() == !c.examples().is_empty()));
    }
}
