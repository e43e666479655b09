//! Structural checks run before code models are built.
//!
//! Validation never fails outright; it returns a [`ValidationReport`] whose
//! diagnostics are tied to the feature child they concern. The
//! [`Generator`](crate::generator::Generator) decides whether an error
//! excludes one scenario or aborts the pass.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::ambient;
use crate::document::{ExampleTable, Feature, ScenarioDefinition, ScenarioOutline};
use crate::ident::{derive, rows_binding, step_identifier};
use crate::runner::CALLBACK_PARAMS;

/// Category of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// An outline cannot be expanded from its Example tables.
    StructuralDeficiency,
    /// Two distinct names derive the same identifier in one scope.
    IdentifierCollision,
    /// A step is repeated verbatim and shares its stub.
    RepeatedStep,
    /// Example tables after the first are not used.
    IgnoredExamples,
    /// Background step calls name a namespace the suite does not declare.
    UnlinkedBackground,
    /// A plain scenario is stubbed but never registered by the runner.
    UnregisteredScenario,
}

impl DiagnosticKind {
    /// Severity attached to diagnostics of this kind.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::StructuralDeficiency | Self::IdentifierCollision => Severity::Error,
            Self::RepeatedStep
            | Self::IgnoredExamples
            | Self::UnlinkedBackground
            | Self::UnregisteredScenario => Severity::Warning,
        }
    }
}

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Generation proceeds unchanged.
    Warning,
    /// The affected definition cannot be generated.
    Error,
}

/// A finding about one feature child, or about the feature as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Severity derived from the category.
    pub severity: Severity,
    /// Index into `Feature::children` of the affected definition.
    pub child: Option<usize>,
    /// Name of the affected definition.
    pub scenario: Option<String>,
    /// Human-readable explanation.
    pub message: String,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, child: Option<(usize, &str)>, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            child: child.map(|(index, _)| index),
            scenario: child.map(|(_, name)| name.to_string()),
            message,
        }
    }

    /// Return `true` for error-severity diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.scenario {
            Some(name) => write!(f, "{severity}: {name}: {}", self.message),
            None => write!(f, "{severity}: {}", self.message),
        }
    }
}

/// Ordered diagnostics for one feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// All diagnostics in discovery order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the report, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Return `true` if any diagnostic of `kind` was recorded.
    #[must_use]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    /// Return `true` if any error-severity diagnostic was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics of the given kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Indices of children that cannot be expanded from their tables.
    #[must_use]
    pub fn deficient_children(&self) -> HashSet<usize> {
        self.of_kind(DiagnosticKind::StructuralDeficiency)
            .filter_map(|d| d.child)
            .collect()
    }

    fn push(&mut self, kind: DiagnosticKind, child: Option<(usize, &str)>, message: String) {
        self.diagnostics.push(Diagnostic::new(kind, child, message));
    }
}

/// Check a feature for deficient outlines, identifier collisions and the
/// known gaps between the suite and the runner.
#[must_use]
pub fn validate(feature: &Feature) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, child) in feature.children.iter().enumerate() {
        let at = Some((index, child.name()));
        match child {
            ScenarioDefinition::Background(bg) => {
                if !bg.steps.is_empty() {
                    report.push(
                        DiagnosticKind::UnlinkedBackground,
                        at,
                        format!(
                            "runner calls Background steps through `{}`, which the stub suite does not declare",
                            bg.name
                        ),
                    );
                }
            }
            ScenarioDefinition::Scenario(_) => report.push(
                DiagnosticKind::UnregisteredScenario,
                at,
                "plain scenarios are stubbed but not registered by the runner".into(),
            ),
            ScenarioDefinition::ScenarioOutline(outline) => {
                check_examples(&mut report, index, outline);
            }
        }
        if !child.is_background() {
            check_step_identifiers(&mut report, index, child);
        }
    }
    check_namespace_identifiers(&mut report, feature);
    report
}

fn check_examples(report: &mut ValidationReport, index: usize, outline: &ScenarioOutline) {
    let at = Some((index, outline.name.as_str()));
    if outline.examples.is_empty() {
        report.push(
            DiagnosticKind::StructuralDeficiency,
            at,
            "Scenario Outline has no Examples table".into(),
        );
        return;
    }
    for (position, table) in outline.examples.iter().enumerate() {
        for problem in table_problems(table) {
            report.push(
                DiagnosticKind::StructuralDeficiency,
                at,
                format!("Examples table {}: {problem}", position + 1),
            );
        }
    }
    if outline.examples.len() > 1 {
        report.push(
            DiagnosticKind::IgnoredExamples,
            at,
            format!(
                "only the first of {} Examples tables is used",
                outline.examples.len()
            ),
        );
    }
}

/// Describe every structural problem of a single table.
fn table_problems(table: &ExampleTable) -> Vec<String> {
    if table.header.is_empty() {
        return vec!["header row is empty".into()];
    }
    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    for column in &table.header {
        if !seen.insert(column.as_str()) {
            problems.push(format!("duplicate column `{column}`"));
        }
    }
    let expected = table.header.len();
    for (i, row) in table.rows.iter().enumerate() {
        if row.len() != expected {
            // Row 1 is the header.
            problems.push(format!(
                "row {} has {} cells, expected {expected}",
                i + 2,
                row.len()
            ));
        }
    }
    problems
}

fn check_step_identifiers(report: &mut ValidationReport, index: usize, child: &ScenarioDefinition) {
    let at = Some((index, child.name()));
    let mut seen: HashMap<String, String> = HashMap::new();
    for step in child.steps() {
        let ident = step_identifier(step);
        let text = step.display_text();
        match seen.get(&ident) {
            None => {
                seen.insert(ident, text);
            }
            Some(first) if *first == text => report.push(
                DiagnosticKind::RepeatedStep,
                at,
                format!("step `{text}` is repeated and shares the stub `{ident}`"),
            ),
            Some(first) => report.push(
                DiagnosticKind::IdentifierCollision,
                at,
                format!("steps `{first}` and `{text}` both derive `{ident}`"),
            ),
        }
    }
}

fn check_namespace_identifiers(report: &mut ValidationReport, feature: &Feature) {
    let mut namespaces: HashMap<String, &ScenarioDefinition> = HashMap::new();
    let definitions = feature
        .children
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_background());

    for (index, child) in definitions.clone() {
        let at = Some((index, child.name()));
        let ident = derive(child.name());
        if ambient::is_reserved(&ident) {
            report.push(
                DiagnosticKind::IdentifierCollision,
                at,
                format!("namespace `{ident}` shadows the ambient binding of the same name"),
            );
        }
        if child.is_outline() && CALLBACK_PARAMS.contains(&ident.as_str()) {
            report.push(
                DiagnosticKind::IdentifierCollision,
                at,
                format!(
                    "namespace `{ident}` is shadowed by the runner callback parameter of the same name"
                ),
            );
        }
        match namespaces.entry(ident) {
            Entry::Occupied(first) => report.push(
                DiagnosticKind::IdentifierCollision,
                at,
                format!(
                    "{} `{}` and {} `{}` both derive `{}`",
                    first.get().label(),
                    first.get().name(),
                    child.label(),
                    child.name(),
                    first.key()
                ),
            ),
            Entry::Vacant(slot) => {
                slot.insert(child);
            }
        }
    }

    for (index, child) in definitions.filter(|(_, c)| c.is_outline()) {
        let binding = rows_binding(child.name());
        if let Some(owner) = namespaces.get(&binding) {
            report.push(
                DiagnosticKind::IdentifierCollision,
                Some((index, child.name())),
                format!(
                    "runner row list `{binding}` shadows the namespace of {} `{}`",
                    owner.label(),
                    owner.name()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Background, Scenario, Step};
    use crate::test_support::login_feature;
    use rstest::rstest;

    fn outline_with(table: ExampleTable) -> Feature {
        Feature::new("f").with_child(
            ScenarioOutline::new("Outline")
                .with_step(Step::given("<a>"))
                .with_examples(table),
        )
    }

    fn messages(report: &ValidationReport, kind: DiagnosticKind) -> Vec<String> {
        report.of_kind(kind).map(|d| d.message.clone()).collect()
    }

    #[test]
    fn login_feature_has_only_warnings() {
        let report = validate(&login_feature());
        assert!(!report.has_errors(), "{:?}", report.diagnostics());
        assert!(report.has(DiagnosticKind::UnlinkedBackground));
        assert!(report.has(DiagnosticKind::UnregisteredScenario));
    }

    #[test]
    fn outline_without_examples_is_deficient() {
        let feature = Feature::new("f")
            .with_child(Scenario::new("fine"))
            .with_child(ScenarioOutline::new("bare").with_step(Step::given("x")));
        let report = validate(&feature);
        assert_eq!(report.deficient_children(), HashSet::from([1]));
        let diag = report.of_kind(DiagnosticKind::StructuralDeficiency).next();
        assert_eq!(diag.and_then(|d| d.scenario.as_deref()), Some("bare"));
    }

    #[test]
    fn reports_row_width_mismatch_with_row_number() {
        let table = ExampleTable::new(["a", "b"])
            .with_row(["1", "2"])
            .with_row(["3", "4", "5"]);
        let report = validate(&outline_with(table));
        assert_eq!(
            messages(&report, DiagnosticKind::StructuralDeficiency),
            ["Examples table 1: row 3 has 3 cells, expected 2"]
        );
    }

    #[test]
    fn rejects_empty_and_duplicate_headers() {
        let report = validate(&outline_with(ExampleTable::default()));
        assert_eq!(
            messages(&report, DiagnosticKind::StructuralDeficiency),
            ["Examples table 1: header row is empty"]
        );

        let report = validate(&outline_with(ExampleTable::new(["a", "a"])));
        assert_eq!(
            messages(&report, DiagnosticKind::StructuralDeficiency),
            ["Examples table 1: duplicate column `a`"]
        );
    }

    #[test]
    fn warns_about_ignored_tables() {
        let feature = Feature::new("f").with_child(
            ScenarioOutline::new("o")
                .with_examples(ExampleTable::new(["a"]))
                .with_examples(ExampleTable::new(["a"])),
        );
        let report = validate(&feature);
        assert!(!report.has_errors());
        assert!(report.has(DiagnosticKind::IgnoredExamples));
    }

    #[test]
    fn detects_colliding_scenario_names() {
        let feature = Feature::new("f")
            .with_child(Scenario::new("Valid login"))
            .with_child(Scenario::new("valid-login"));
        let report = validate(&feature);
        assert_eq!(
            messages(&report, DiagnosticKind::IdentifierCollision),
            ["Scenario `Valid login` and Scenario `valid-login` both derive `validLogin`"]
        );
    }

    #[test]
    fn backgrounds_do_not_take_part_in_namespace_collisions() {
        let feature = Feature::new("f")
            .with_child(Background::new("Login"))
            .with_child(Scenario::new("Login"));
        assert!(!validate(&feature).has(DiagnosticKind::IdentifierCollision));
    }

    #[test]
    fn detects_ambient_shadowing() {
        let feature = Feature::new("f").with_child(Scenario::new("World"));
        assert!(validate(&feature).has(DiagnosticKind::IdentifierCollision));
    }

    #[test]
    fn detects_row_list_shadowing_a_namespace() {
        let feature = Feature::new("f")
            .with_child(ScenarioOutline::new("Login").with_examples(ExampleTable::new(["a"])))
            .with_child(Scenario::new("Login rows"));
        assert_eq!(
            messages(&validate(&feature), DiagnosticKind::IdentifierCollision),
            ["runner row list `loginRows` shadows the namespace of Scenario `Login rows`"]
        );
    }

    #[rstest]
    #[case("Env", "env")]
    #[case("Row", "row")]
    #[case("Done", "done")]
    fn detects_outline_namespaces_shadowed_by_runner_callbacks(
        #[case] name: &str,
        #[case] ident: &str,
    ) {
        let feature = Feature::new("f").with_child(
            ScenarioOutline::new(name)
                .with_step(Step::given("x"))
                .with_examples(ExampleTable::new(["a"]).with_row(["1"])),
        );
        assert_eq!(
            messages(&validate(&feature), DiagnosticKind::IdentifierCollision),
            [format!(
                "namespace `{ident}` is shadowed by the runner callback parameter of the same name"
            )]
        );
    }

    #[test]
    fn plain_scenarios_may_share_callback_parameter_names() {
        let feature = Feature::new("f").with_child(Scenario::new("Done"));
        assert!(!validate(&feature).has(DiagnosticKind::IdentifierCollision));
    }

    #[test]
    fn distinguishes_repeated_steps_from_collisions() {
        let feature = Feature::new("f").with_child(
            Scenario::new("s")
                .with_step(Step::when("I press enter"))
                .with_step(Step::when("I press enter"))
                .with_step(Step::when("I press: enter!")),
        );
        let report = validate(&feature);
        assert_eq!(report.of_kind(DiagnosticKind::RepeatedStep).count(), 1);
        assert_eq!(
            messages(&report, DiagnosticKind::IdentifierCollision),
            ["steps `When I press enter` and `When I press: enter!` both derive `whenIPressEnter`"]
        );
    }

    #[test]
    fn diagnostics_display_with_severity_and_scenario() {
        let report = validate(&Feature::new("f").with_child(ScenarioOutline::new("bare")));
        let rendered: Vec<_> = report.diagnostics().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["error: bare: Scenario Outline has no Examples table"]);
    }
}
