//! Identifier derivation from free-form feature text.
//!
//! Scenario names and step lines are converted to lowerCamelCase so they can
//! name namespaces and functions in the generated sources. Derivation is pure
//! and deterministic but not collision resistant; callers detect collisions
//! through [`crate::validation`].

use std::sync::LazyLock;

use convert_case::{Case, Casing};
use regex::Regex;

use crate::document::{Step, StepKeyword};

/// Derive a lowerCamelCase identifier from arbitrary text.
///
/// Apostrophes are dropped so contractions stay one word; every other
/// character that cannot continue an identifier separates words. An empty
/// result becomes `_`, and a result that cannot start an identifier (a
/// leading digit, say) or a reserved word gains a `_` prefix.
///
/// # Examples
///
/// ```
/// use gherkin_scaffold::ident::derive;
///
/// assert_eq!(derive("Given a user exists"), "givenAUserExists");
/// assert_eq!(derive("Valid login"), "validLogin");
/// assert_eq!(derive("the user's cart"), "theUsersCart");
/// assert_eq!(derive("2 factor login"), "_2FactorLogin");
/// assert_eq!(derive("x² test"), "xTest");
/// ```
#[must_use]
pub fn derive(text: &str) -> String {
    let unquoted: String = text
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect();
    let spaced = SEPARATOR_RE.replace_all(&unquoted, " ");
    let words = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut ident = words.to_case(Case::Camel);
    if !IDENTIFIER_START_RE.is_match(&ident) {
        ident.insert(0, '_');
    }
    if is_reserved_word(&ident) {
        ident.insert(0, '_');
    }
    ident
}

/// Runs of characters that cannot continue a derived identifier. `$` and
/// connector punctuation are legal but act as word separators here.
#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}]+").expect("valid separator regex")
});

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static IDENTIFIER_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{Nl}$_]").expect("valid identifier start regex")
});

/// Derive the function name for a step from its keyword and text.
///
/// # Examples
///
/// ```
/// use gherkin_scaffold::StepKeyword;
/// use gherkin_scaffold::ident::derive_step;
///
/// assert_eq!(derive_step(StepKeyword::Given, "a user exists"), "givenAUserExists");
/// ```
#[must_use]
pub fn derive_step(keyword: StepKeyword, text: &str) -> String {
    derive(&format!("{keyword} {text}"))
}

/// Convenience wrapper around [`derive_step`] for a parsed step.
#[must_use]
pub fn step_identifier(step: &Step) -> String {
    derive_step(step.keyword, &step.text)
}

/// Name of the runner variable holding an outline's example rows.
///
/// # Examples
///
/// ```
/// use gherkin_scaffold::ident::rows_binding;
///
/// assert_eq!(rows_binding("Invalid login"), "invalidLoginRows");
/// ```
#[must_use]
pub fn rows_binding(outline_name: &str) -> String {
    let mut ident = derive(outline_name);
    ident.push_str("Rows");
    ident
}

#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{Nl}$_][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}$]*$")
        .expect("valid identifier regex")
});

/// Return `true` when `name` may be declared as an identifier in the
/// generated sources.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    is_identifier_name(name) && !is_reserved_word(name)
}

/// Return `true` when `name` is lexically an identifier. Reserved words
/// pass, as they may still appear as property names and object keys.
#[must_use]
pub fn is_identifier_name(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Return `true` for words that cannot name a declaration.
#[must_use]
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Reserved words of the target language, including strict-mode ones.
const RESERVED_WORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Login", "login")]
    #[case("Valid login", "validLogin")]
    #[case("Given a user exists", "givenAUserExists")]
    #[case("Then the page shows \"Welcome!\"", "thenThePageShowsWelcome")]
    #[case("When I enter <username> and <password>", "whenIEnterUsernameAndPassword")]
    #[case("  padded   words  ", "paddedWords")]
    #[case("snake_case-and-kebab", "snakeCaseAndKebab")]
    #[case("Given I have 5 cukes", "givenIHave5Cukes")]
    fn derives_lower_camel_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(derive(input), expected);
    }

    #[rstest]
    #[case("", "_")]
    #[case("!!!", "_")]
    #[case("42 answers", "_42Answers")]
    #[case("Delete", "_delete")]
    #[case("new", "_new")]
    #[case("x\u{b2} test", "xTest")]
    #[case("\u{663} items", "_\u{663}Items")]
    #[case("step \u{bd}", "step")]
    fn guards_invalid_identifiers(#[case] input: &str, #[case] expected: &str) {
        let ident = derive(input);
        assert_eq!(ident, expected);
        assert!(is_identifier(&ident), "{ident} should be a valid identifier");
    }

    #[test]
    fn drops_apostrophes_inside_words() {
        assert_eq!(derive("Given the user's cart"), "givenTheUsersCart");
        assert_eq!(derive("Given the user\u{2019}s cart"), "givenTheUsersCart");
    }

    #[test]
    fn derivation_is_deterministic() {
        let text = "When the admin resets 3 passwords";
        assert_eq!(derive(text), derive(text));
    }

    #[test]
    fn distinct_names_may_collide() {
        assert_eq!(derive("Valid login"), derive("valid-login"));
    }

    #[test]
    fn step_identifier_joins_keyword_and_text() {
        assert_eq!(step_identifier(&Step::and("it is done")), "andItIsDone");
        assert_eq!(
            derive_step(StepKeyword::But, "nothing happens"),
            "butNothingHappens"
        );
    }

    #[rstest]
    #[case("validLogin", true)]
    #[case("_private", true)]
    #[case("$jquery", true)]
    #[case("crèmeBrûlée", true)]
    #[case("", false)]
    #[case("1abc", false)]
    #[case("two words", false)]
    #[case("class", false)]
    fn recognises_identifiers(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(input), expected);
    }

    #[test]
    fn reserved_words_are_identifier_names() {
        assert!(is_identifier_name("class"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier_name("first name"));
    }
}
