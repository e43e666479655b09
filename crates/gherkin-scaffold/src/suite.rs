//! Stub-suite construction.
//!
//! Every Scenario and Scenario Outline becomes an exported namespace holding
//! one `async` stub per step. Stubs fail unconditionally until implemented.
//! Backgrounds never produce a namespace.

use std::collections::HashSet;

use crate::ambient::{self, FAIL, SUITE_BINDINGS};
use crate::code_model::{
    Declaration, Expr, Function, FunctionModifiers, Namespace, Parameter, Statement, TypeAlias,
    TypeExpr,
};
use crate::document::{Feature, ScenarioDefinition, ScenarioOutline, Step};
use crate::ident::{derive, step_identifier};

/// Name of the per-outline row type and of the type every stub parameter uses.
pub const ROW_TYPE: &str = "Row";

/// Name of the parameter each stub receives.
pub const ROW_PARAM: &str = "row";

/// Message passed to `fail` by every stub.
pub const NOT_IMPLEMENTED: &str = "Not implemented.";

/// Build the stub-suite declarations for a feature.
///
/// The result starts with the suite's ambient bindings, followed by one
/// namespace per non-Background definition in document order. An empty
/// feature yields the ambient declarations only.
///
/// Plain scenarios get no `Row` alias even though their stubs take a
/// `row: Row` parameter; renderers report the unresolved reference.
#[must_use]
pub fn build_suite(feature: &Feature) -> Vec<Declaration> {
    let mut declarations = ambient::declarations(SUITE_BINDINGS);
    declarations.extend(
        feature
            .children
            .iter()
            .filter(|c| !c.is_background())
            .map(|c| Declaration::Namespace(scenario_namespace(c))),
    );
    declarations
}

fn scenario_namespace(definition: &ScenarioDefinition) -> Namespace {
    let mut members = Vec::new();
    if let ScenarioDefinition::ScenarioOutline(outline) = definition {
        if let Some(alias) = row_type(outline) {
            members.push(Declaration::TypeAlias(alias));
        }
    }

    let mut seen = HashSet::new();
    members.extend(
        definition
            .steps()
            .iter()
            .map(|step| (step_identifier(step), step))
            .filter(|(name, _)| seen.insert(name.clone()))
            .map(|(name, step)| Declaration::Function(step_stub(name, step))),
    );

    Namespace::exported(derive(definition.name()), members)
}

/// Row type for an outline: one string field per column of its first table.
///
/// Returns `None` when the outline has no example table.
#[must_use]
pub fn row_type(outline: &ScenarioOutline) -> Option<TypeAlias> {
    let table = outline.first_table()?;
    Some(TypeAlias {
        name: ROW_TYPE.into(),
        exported: false,
        ty: TypeExpr::Record {
            keys: table.header.clone(),
            value: Box::new(TypeExpr::string()),
        },
    })
}

fn step_stub(name: String, step: &Step) -> Function {
    tracing::trace!(function = %name, step = %step.display_text(), "stubbing step");
    Function {
        name,
        modifiers: FunctionModifiers {
            exported: true,
            is_async: true,
            generator: false,
        },
        params: vec![Parameter::typed(ROW_PARAM, TypeExpr::reference(ROW_TYPE))],
        returns: Some(TypeExpr::promise(TypeExpr::void())),
        body: vec![Statement::Expr(
            Expr::ident(FAIL.name).call(vec![Expr::string(NOT_IMPLEMENTED)]),
        )],
    }
}
