//! Runner construction.
//!
//! The runner exports a generator function, `GetSuite(env)`, that registers
//! one `describe` block per feature through the test-framework API passed as
//! `env`. Inside it, in this order:
//!
//! - every Background becomes a `beforeAll` hook awaiting its steps;
//! - every Scenario Outline declares its example rows as a literal array and
//!   registers one `it` per step inside a single `forEach` over those rows.
//!
//! Plain scenarios are not registered. Background step calls are qualified
//! with the Background's raw name, which the stub suite never declares.

use crate::ambient::{self, RUNNER_BINDINGS};
use crate::code_model::{
    ArrayLiteral, ArrowFunction, Declaration, Expr, Function, FunctionModifiers, ObjectLiteral,
    Parameter, Statement, VariableDeclaration,
};
use crate::document::{Background, ExampleTable, Feature, ScenarioOutline, Step};
use crate::ident::{derive, rows_binding, step_identifier};
use crate::suite::ROW_PARAM;

/// Name of the exported generator function.
pub const SUITE_FUNCTION: &str = "GetSuite";

/// Parameter through which the test framework is reached.
pub const ENV_PARAM: &str = "env";

/// Completion callback passed to hooks and tests.
pub const DONE_PARAM: &str = "done";

/// Parameters of the runner's own callbacks. Inside them these names shadow
/// any outline namespace spelled the same way.
pub const CALLBACK_PARAMS: &[&str] = &[ENV_PARAM, ROW_PARAM, DONE_PARAM];

/// Build the runner declarations for a feature.
///
/// Returns the runner's ambient bindings followed by the `GetSuite`
/// generator function.
#[must_use]
pub fn build_runner(feature: &Feature) -> Vec<Declaration> {
    let mut declarations = ambient::declarations(RUNNER_BINDINGS);
    declarations.push(Declaration::Function(suite_function(feature)));
    declarations
}

fn suite_function(feature: &Feature) -> Function {
    let mut body: Vec<Statement> = feature.backgrounds().map(before_all_hook).collect();
    for outline in feature.outlines() {
        body.extend(outline_registrations(outline));
    }
    tracing::debug!(
        feature = %feature.name,
        statements = body.len(),
        "assembled describe block"
    );

    let describe = env("describe").call(vec![
        Expr::string(feature.name.clone()),
        Expr::Arrow(ArrowFunction {
            is_async: false,
            params: Vec::new(),
            body,
        }),
    ]);

    Function {
        name: SUITE_FUNCTION.into(),
        modifiers: FunctionModifiers {
            exported: true,
            is_async: false,
            generator: true,
        },
        params: vec![Parameter::untyped(ENV_PARAM)],
        returns: None,
        body: vec![Statement::Yield(describe)],
    }
}

fn env(method: &str) -> Expr {
    Expr::ident(ENV_PARAM).member(method)
}

fn done() -> Statement {
    Statement::Expr(Expr::ident(DONE_PARAM).call(Vec::new()))
}

/// `async (done) => { ...body; done(); }`
fn completing_callback(mut body: Vec<Statement>) -> Expr {
    body.push(done());
    Expr::Arrow(ArrowFunction {
        is_async: true,
        params: vec![Parameter::untyped(DONE_PARAM)],
        body,
    })
}

fn before_all_hook(background: &Background) -> Statement {
    let calls = background
        .steps
        .iter()
        .map(|step| {
            Statement::Expr(
                Expr::ident(background.name.clone())
                    .member(step_identifier(step))
                    .call(Vec::new())
                    .awaited(),
            )
        })
        .collect();
    Statement::Expr(env("beforeAll").call(vec![completing_callback(calls)]))
}

/// Row declaration and row loop for one outline.
///
/// An outline without example tables contributes nothing.
fn outline_registrations(outline: &ScenarioOutline) -> Vec<Statement> {
    let Some(table) = outline.first_table() else {
        tracing::debug!(outline = %outline.name, "no example table; skipping registrations");
        return Vec::new();
    };

    let rows_name = rows_binding(&outline.name);
    let namespace = derive(&outline.name);
    let tests = outline
        .steps
        .iter()
        .map(|step| test_registration(&namespace, step))
        .collect();

    let row_loop = Expr::ident(rows_name.clone()).member("forEach").call(vec![Expr::Arrow(
        ArrowFunction {
            is_async: false,
            params: vec![Parameter::untyped(ROW_PARAM)],
            body: tests,
        },
    )]);

    vec![
        Statement::Variable(VariableDeclaration::constant(rows_name, row_literals(table))),
        Statement::Expr(row_loop),
    ]
}

/// One object literal per body row, keyed by header name in header order.
#[must_use]
pub fn row_literals(table: &ExampleTable) -> Expr {
    let elements = table
        .records()
        .map(|record| {
            Expr::Object(ObjectLiteral {
                properties: record
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), Expr::string(value)))
                    .collect(),
            })
        })
        .collect();
    Expr::Array(ArrayLiteral { elements })
}

fn test_registration(namespace: &str, step: &Step) -> Statement {
    let call = Expr::ident(namespace)
        .member(step_identifier(step))
        .call(vec![Expr::ident(ROW_PARAM)])
        .awaited();
    Statement::Expr(env("it").call(vec![
        Expr::string(step.display_text()),
        completing_callback(vec![Statement::Expr(call)]),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_model::Call;
    use crate::document::Scenario;
    use crate::test_support::login_feature;

    /// Count calls to `env.<method>` anywhere below `stmts`.
    fn count_env_calls(stmts: &[Statement], method: &str) -> usize {
        stmts.iter().map(|s| count_in_statement(s, method)).sum()
    }

    fn count_in_statement(stmt: &Statement, method: &str) -> usize {
        match stmt {
            Statement::Expr(e) | Statement::Yield(e) => count_in_expr(e, method),
            Statement::Variable(v) => v.init.as_ref().map_or(0, |e| count_in_expr(e, method)),
        }
    }

    fn count_in_expr(expr: &Expr, method: &str) -> usize {
        match expr {
            Expr::Call(Call { callee, args }) => {
                let own = usize::from(**callee == env(method));
                own + count_in_expr(callee, method)
                    + args.iter().map(|a| count_in_expr(a, method)).sum::<usize>()
            }
            Expr::Arrow(arrow) => count_env_calls(&arrow.body, method),
            Expr::Await(inner) | Expr::Member { object: inner, .. } => count_in_expr(inner, method),
            Expr::Array(array) => array.elements.iter().map(|e| count_in_expr(e, method)).sum(),
            Expr::Identifier(_) | Expr::Literal(_) | Expr::Object(_) => 0,
        }
    }

    fn suite_body(decls: &[Declaration]) -> &[Statement] {
        match decls.last() {
            Some(Declaration::Function(f)) => &f.body,
            _ => panic!("expected GetSuite as the last declaration"),
        }
    }

    #[test]
    fn declares_world_then_exported_generator() {
        let decls = build_runner(&login_feature());
        let names: Vec<_> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, ["world", SUITE_FUNCTION]);
        let Some(Declaration::Function(f)) = decls.last() else {
            panic!("expected a function");
        };
        assert!(f.modifiers.exported && f.modifiers.generator && !f.modifiers.is_async);
        assert_eq!(f.params, vec![Parameter::untyped(ENV_PARAM)]);
    }

    #[test]
    fn registers_one_describe_one_hook_and_one_test_per_outline_step() {
        let decls = build_runner(&login_feature());
        let body = suite_body(&decls);
        assert_eq!(count_env_calls(body, "describe"), 1);
        assert_eq!(count_env_calls(body, "beforeAll"), 1);
        assert_eq!(count_env_calls(body, "it"), 3);
    }

    #[test]
    fn test_count_is_independent_of_row_count() {
        let outline = |rows: usize| {
            let mut table = ExampleTable::new(["n"]);
            for i in 0..rows {
                table = table.with_row([i.to_string()]);
            }
            ScenarioOutline::new("Counting")
                .with_step(Step::given("a number <n>"))
                .with_step(Step::then("it is counted"))
                .with_examples(table)
        };
        for rows in [0, 1, 5] {
            let decls = build_runner(&Feature::new("f").with_child(outline(rows)));
            assert_eq!(count_env_calls(suite_body(&decls), "it"), 2, "rows = {rows}");
        }
    }

    #[test]
    fn plain_scenarios_are_not_registered() {
        let feature = Feature::new("f")
            .with_child(Scenario::new("Plain").with_step(Step::given("something")));
        let decls = build_runner(&feature);
        assert_eq!(count_env_calls(suite_body(&decls), "it"), 0);
    }

    #[test]
    fn outline_without_tables_registers_nothing() {
        let feature = Feature::new("f")
            .with_child(ScenarioOutline::new("Bare").with_step(Step::given("something")));
        let decls = build_runner(&feature);
        assert_eq!(count_env_calls(suite_body(&decls), "it"), 0);
        assert_eq!(count_env_calls(suite_body(&decls), "forEach"), 0);
    }

    #[test]
    fn background_calls_use_the_raw_background_name() {
        let background = Background::new("App Setup").with_step(Step::given("the app is running"));
        let Statement::Expr(hook) = before_all_hook(&background) else {
            panic!("expected an expression statement");
        };
        let Expr::Call(Call { args, .. }) = hook else {
            panic!("expected a call");
        };
        let Some(Expr::Arrow(callback)) = args.first() else {
            panic!("expected an async callback");
        };
        assert!(callback.is_async);
        let expected = Statement::Expr(
            Expr::ident("App Setup")
                .member("givenTheAppIsRunning")
                .call(Vec::new())
                .awaited(),
        );
        assert_eq!(callback.body, vec![expected, done()]);
    }

    #[test]
    fn row_literals_follow_header_order() {
        let table = ExampleTable::new(["username", "password"]).with_row(["alice", "wrong"]);
        let expected = Expr::Array(ArrayLiteral {
            elements: vec![Expr::Object(ObjectLiteral {
                properties: vec![
                    ("username".into(), Expr::string("alice")),
                    ("password".into(), Expr::string("wrong")),
                ],
            })],
        });
        assert_eq!(row_literals(&table), expected);
    }
}
