//! Host-environment bindings assumed by generated artifacts.
//!
//! Generated files refer to values they never define: `world` carries shared
//! test state and `fail` reports a failure. Each artifact lists the bindings
//! it needs, and builders emit `declare` statements from that list.

use crate::code_model::{Declaration, Parameter, TypeExpr, VariableDeclaration};

/// A value the generated program expects its host to provide at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientBinding {
    /// Identifier the generated code refers to.
    pub name: &'static str,
    /// Shape of the binding, if it is typed.
    pub shape: BindingShape,
    /// What the host is expected to supply.
    pub description: &'static str,
}

/// Type shape of an [`AmbientBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingShape {
    /// No type annotation.
    Untyped,
    /// `(message: string) => void`
    FailureCallback,
}

/// Shared test state supplied by the host.
pub const WORLD: AmbientBinding = AmbientBinding {
    name: "world",
    shape: BindingShape::Untyped,
    description: "shared test state supplied by the host environment",
};

/// Failure-reporting primitive supplied by the host.
pub const FAIL: AmbientBinding = AmbientBinding {
    name: "fail",
    shape: BindingShape::FailureCallback,
    description: "reports a failure with a message; supplied by the host environment",
};

/// Bindings required by the stub suite.
pub const SUITE_BINDINGS: &[AmbientBinding] = &[WORLD, FAIL];

/// Bindings required by the runner.
pub const RUNNER_BINDINGS: &[AmbientBinding] = &[WORLD];

impl AmbientBinding {
    /// Type annotation emitted for the binding.
    #[must_use]
    pub fn type_expr(&self) -> Option<TypeExpr> {
        match self.shape {
            BindingShape::Untyped => None,
            BindingShape::FailureCallback => Some(TypeExpr::Function {
                params: vec![Parameter::typed("message", TypeExpr::string())],
                returns: Box::new(TypeExpr::void()),
            }),
        }
    }

    /// `declare const <name>[: type];`
    #[must_use]
    pub fn declaration(&self) -> Declaration {
        Declaration::Variable(VariableDeclaration {
            name: self.name.to_string(),
            ambient: true,
            ty: self.type_expr(),
            init: None,
        })
    }
}

/// Declarations for a list of bindings, in list order.
#[must_use]
pub fn declarations(bindings: &[AmbientBinding]) -> Vec<Declaration> {
    bindings.iter().map(AmbientBinding::declaration).collect()
}

/// Return `true` when `name` is taken by any ambient binding.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    SUITE_BINDINGS
        .iter()
        .chain(RUNNER_BINDINGS)
        .any(|b| b.name == name)
}
