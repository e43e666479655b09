//! Fixture documents shared by unit and integration tests.

use crate::document::{
    Background, ExampleTable, Feature, FeatureDocument, Scenario, ScenarioOutline, Step,
};

/// Gherkin text equivalent to [`login_feature`].
pub const LOGIN_FEATURE: &str = concat!(
    "Feature: Login\n",
    "  Background:\n",
    "    Given the app is running\n",
    "\n",
    "  Scenario: Valid login\n",
    "    Given a user exists\n",
    "    When they log in\n",
    "    Then they see the dashboard\n",
    "\n",
    "  Scenario Outline: Invalid login\n",
    "    Given a user exists\n",
    "    When they log in as <username> with <password>\n",
    "    Then they see an error\n",
    "\n",
    "    Examples:\n",
    "      | username | password |\n",
    "      | alice    | wrong    |\n",
    "      | bob      |          |\n",
);

/// A "Login" feature with an unnamed Background, one plain Scenario with
/// three steps and one Scenario Outline with a two-column, two-row table.
#[must_use]
pub fn login_feature() -> Feature {
    Feature::new("Login")
        .with_child(Background::new("").with_step(Step::given("the app is running")))
        .with_child(
            Scenario::new("Valid login")
                .with_step(Step::given("a user exists"))
                .with_step(Step::when("they log in"))
                .with_step(Step::then("they see the dashboard")),
        )
        .with_child(
            ScenarioOutline::new("Invalid login")
                .with_step(Step::given("a user exists"))
                .with_step(Step::when("they log in as <username> with <password>"))
                .with_step(Step::then("they see an error"))
                .with_examples(
                    ExampleTable::new(["username", "password"])
                        .with_row(["alice", "wrong"])
                        .with_row(["bob", ""]),
                ),
        )
}

/// [`login_feature`] wrapped in a document.
#[must_use]
pub fn login_document() -> FeatureDocument {
    FeatureDocument::new(login_feature())
}
