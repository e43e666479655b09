//! Rendering code models to source text.
//!
//! A [`Renderer`] is handed a declaration list per artifact and returns the
//! complete file contents. [`TypeScriptRenderer`] is the built-in target.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::code_model::{
    ArrowFunction, Declaration, Expr, Function, Literal, Namespace, Parameter, Statement,
    TypeAlias, TypeExpr, VariableDeclaration,
};
use crate::error::ErrorKind;
use crate::ident::{is_identifier, is_identifier_name};

/// Errors raised while rendering a code model.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A declared name cannot be written as an identifier.
    #[error("{artifact}: `{name}` is not a valid {role} name")]
    InvalidIdentifier {
        /// Artifact being rendered.
        artifact: String,
        /// Kind of declaration, such as `namespace` or `parameter`.
        role: &'static str,
        /// Offending name.
        name: String,
    },

    /// A record type was built without any keys.
    #[error("{artifact}: record type in `{declaration}` has no keys")]
    EmptyRecord {
        /// Artifact being rendered.
        artifact: String,
        /// Declaration containing the record.
        declaration: String,
    },

    /// A type reference names no built-in or visible alias.
    #[error("{artifact}: type `{name}` is not declared in `{scope}`")]
    UnresolvedType {
        /// Artifact being rendered.
        artifact: String,
        /// Enclosing namespace path, or `<top level>`.
        scope: String,
        /// Unresolved type name.
        name: String,
    },

    /// A string literal could not be encoded.
    #[error("{artifact}: failed to encode string literal: {source}")]
    Encoding {
        /// Artifact being rendered.
        artifact: String,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
}

impl RenderError {
    /// Category of the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::RenderingFailure
    }
}

/// Turns a declaration list into the text of one artifact.
pub trait Renderer {
    /// Render `declarations` as the contents of `artifact`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the model cannot be expressed in the
    /// target language.
    fn render(&self, artifact: &str, declarations: &[Declaration]) -> Result<String, RenderError>;
}

/// Renders TypeScript with four-space indentation and `\n` line endings.
///
/// In lenient mode (the default) a type reference that resolves to nothing
/// is written as-is and logged at `warn`; strict mode rejects it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptRenderer {
    strict: bool,
}

impl TypeScriptRenderer {
    /// A lenient renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self { strict: false }
    }

    /// A renderer that rejects unresolved type references.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }

    /// Set strictness explicitly.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Renderer for TypeScriptRenderer {
    fn render(&self, artifact: &str, declarations: &[Declaration]) -> Result<String, RenderError> {
        let mut printer = Printer {
            artifact,
            strict: self.strict,
            scopes: Vec::new(),
            unresolved: BTreeSet::new(),
        };
        let source = printer.top_level(declarations)?;
        for (scope, name) in &printer.unresolved {
            tracing::warn!(artifact, scope = %scope, reference = %name, "unresolved type reference");
        }
        tracing::debug!(artifact, bytes = source.len(), "rendered artifact");
        Ok(source)
    }
}

const INDENT: &str = "    ";
const TOP_LEVEL: &str = "<top level>";
const BUILTIN_TYPES: &[&str] = &[
    "any",
    "boolean",
    "never",
    "null",
    "number",
    "object",
    "string",
    "undefined",
    "unknown",
    "void",
    "Array",
    "Promise",
    "Record",
];

struct Scope {
    name: String,
    aliases: HashSet<String>,
}

impl Scope {
    fn new(name: &str, members: &[Declaration]) -> Self {
        Self {
            name: name.to_string(),
            aliases: members
                .iter()
                .filter_map(|m| match m {
                    Declaration::TypeAlias(alias) => Some(alias.name.clone()),
                    _ => None,
                })
                .collect(),
        }
    }
}

struct Printer<'a> {
    artifact: &'a str,
    strict: bool,
    scopes: Vec<Scope>,
    unresolved: BTreeSet<(String, String)>,
}

fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

fn export(exported: bool) -> &'static str {
    if exported { "export " } else { "" }
}

impl Printer<'_> {
    fn top_level(&mut self, declarations: &[Declaration]) -> Result<String, RenderError> {
        self.scopes.push(Scope::new(TOP_LEVEL, declarations));
        let mut out = String::new();
        for declaration in declarations {
            out.push_str(&self.declaration(declaration, 0)?);
        }
        self.scopes.pop();
        Ok(out)
    }

    fn declaration(&mut self, declaration: &Declaration, depth: usize) -> Result<String, RenderError> {
        match declaration {
            Declaration::Namespace(ns) => self.namespace(ns, depth),
            Declaration::TypeAlias(alias) => self.type_alias(alias, depth),
            Declaration::Function(func) => self.function(func, depth),
            Declaration::Variable(var) => {
                Ok(format!("{}{};\n", indent(depth), self.variable(var, depth)?))
            }
        }
    }

    fn namespace(&mut self, ns: &Namespace, depth: usize) -> Result<String, RenderError> {
        self.check_name("namespace", &ns.name)?;
        let head = format!("{}{}namespace {}", indent(depth), export(ns.exported), ns.name);
        if ns.members.is_empty() {
            return Ok(format!("{head} {{}}\n"));
        }

        let path = match self.scopes.last() {
            Some(parent) if parent.name != TOP_LEVEL => format!("{}.{}", parent.name, ns.name),
            _ => ns.name.clone(),
        };
        self.scopes.push(Scope::new(&path, &ns.members));
        let mut out = format!("{head} {{\n");
        for member in &ns.members {
            out.push_str(&self.declaration(member, depth + 1)?);
        }
        self.scopes.pop();
        out.push_str(&indent(depth));
        out.push_str("}\n");
        Ok(out)
    }

    fn type_alias(&mut self, alias: &TypeAlias, depth: usize) -> Result<String, RenderError> {
        self.check_name("type alias", &alias.name)?;
        let ty = self.type_expr(&alias.ty, &alias.name)?;
        Ok(format!(
            "{}{}type {} = {ty};\n",
            indent(depth),
            export(alias.exported),
            alias.name
        ))
    }

    fn function(&mut self, func: &Function, depth: usize) -> Result<String, RenderError> {
        self.check_name("function", &func.name)?;
        let params = self.params(&func.params, &func.name)?;
        let returns = match &func.returns {
            Some(ty) => format!(": {}", self.type_expr(ty, &func.name)?),
            None => String::new(),
        };
        let body = self.block(&func.body, depth)?;
        Ok(format!(
            "{}{}{}function{} {}({params}){returns} {body}\n",
            indent(depth),
            export(func.modifiers.exported),
            if func.modifiers.is_async { "async " } else { "" },
            if func.modifiers.generator { "*" } else { "" },
            func.name,
        ))
    }

    /// The declaration without indentation or the trailing `;`.
    fn variable(&mut self, var: &VariableDeclaration, depth: usize) -> Result<String, RenderError> {
        self.check_name("variable", &var.name)?;
        let mut out = String::from(if var.ambient { "declare const " } else { "const " });
        out.push_str(&var.name);
        if let Some(ty) = &var.ty {
            out.push_str(": ");
            out.push_str(&self.type_expr(ty, &var.name)?);
        }
        if let Some(init) = &var.init {
            out.push_str(" = ");
            out.push_str(&self.expr(init, depth)?);
        }
        Ok(out)
    }

    fn params(&mut self, params: &[Parameter], owner: &str) -> Result<String, RenderError> {
        let mut rendered = Vec::with_capacity(params.len());
        for param in params {
            self.check_name("parameter", &param.name)?;
            rendered.push(match &param.ty {
                Some(ty) => format!("{}: {}", param.name, self.type_expr(ty, owner)?),
                None => param.name.clone(),
            });
        }
        Ok(rendered.join(", "))
    }

    /// `{ ... }` with statements one level deeper than `depth`.
    fn block(&mut self, statements: &[Statement], depth: usize) -> Result<String, RenderError> {
        if statements.is_empty() {
            return Ok("{}".into());
        }
        let mut out = String::from("{\n");
        for statement in statements {
            out.push_str(&indent(depth + 1));
            out.push_str(&self.statement(statement, depth + 1)?);
            out.push_str(";\n");
        }
        out.push_str(&indent(depth));
        out.push('}');
        Ok(out)
    }

    fn statement(&mut self, statement: &Statement, depth: usize) -> Result<String, RenderError> {
        match statement {
            Statement::Expr(expr) => self.expr(expr, depth),
            Statement::Variable(var) => self.variable(var, depth),
            Statement::Yield(expr) => Ok(format!("yield {}", self.expr(expr, depth)?)),
        }
    }

    fn expr(&mut self, expr: &Expr, depth: usize) -> Result<String, RenderError> {
        match expr {
            Expr::Identifier(name) => Ok(name.clone()),
            Expr::Member { object, property } => {
                let object = self.expr(object, depth)?;
                if is_identifier_name(property) {
                    Ok(format!("{object}.{property}"))
                } else {
                    Ok(format!("{object}[{}]", self.string(property)?))
                }
            }
            Expr::Call(call) => {
                let callee = self.expr(&call.callee, depth)?;
                let mut args = Vec::with_capacity(call.args.len());
                for arg in &call.args {
                    args.push(self.expr(arg, depth)?);
                }
                Ok(format!("{callee}({})", args.join(", ")))
            }
            Expr::Await(inner) => Ok(format!("await {}", self.expr(inner, depth)?)),
            Expr::Arrow(arrow) => self.arrow(arrow, depth),
            Expr::Literal(Literal::String(value)) => self.string(value),
            Expr::Array(array) => {
                if array.elements.is_empty() {
                    return Ok("[]".into());
                }
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(format!("{}{}", indent(depth + 1), self.expr(element, depth + 1)?));
                }
                Ok(format!("[\n{}\n{}]", elements.join(",\n"), indent(depth)))
            }
            Expr::Object(object) => {
                if object.properties.is_empty() {
                    return Ok("{}".into());
                }
                let mut properties = Vec::with_capacity(object.properties.len());
                for (key, value) in &object.properties {
                    let key = if is_identifier_name(key) {
                        key.clone()
                    } else {
                        self.string(key)?
                    };
                    properties.push(format!("{key}: {}", self.expr(value, depth)?));
                }
                Ok(format!("{{ {} }}", properties.join(", ")))
            }
        }
    }

    fn arrow(&mut self, arrow: &ArrowFunction, depth: usize) -> Result<String, RenderError> {
        let params = self.params(&arrow.params, "arrow function")?;
        let body = self.block(&arrow.body, depth)?;
        Ok(format!(
            "{}({params}) => {body}",
            if arrow.is_async { "async " } else { "" }
        ))
    }

    fn type_expr(&mut self, ty: &TypeExpr, declaration: &str) -> Result<String, RenderError> {
        match ty {
            TypeExpr::Reference(name) => {
                self.resolve(name)?;
                Ok(name.clone())
            }
            TypeExpr::Generic { name, args } => {
                self.resolve(name)?;
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    rendered.push(self.type_expr(arg, declaration)?);
                }
                Ok(format!("{name}<{}>", rendered.join(", ")))
            }
            TypeExpr::Record { keys, value } => {
                if keys.is_empty() {
                    return Err(RenderError::EmptyRecord {
                        artifact: self.artifact.to_string(),
                        declaration: declaration.to_string(),
                    });
                }
                let mut union = Vec::with_capacity(keys.len());
                for key in keys {
                    union.push(self.string(key)?);
                }
                let value = self.type_expr(value, declaration)?;
                Ok(format!("Record<{}, {value}>", union.join(" | ")))
            }
            TypeExpr::Function { params, returns } => {
                let params = self.params(params, declaration)?;
                let returns = self.type_expr(returns, declaration)?;
                Ok(format!("({params}) => {returns}"))
            }
        }
    }

    fn resolve(&mut self, name: &str) -> Result<(), RenderError> {
        if BUILTIN_TYPES.contains(&name) || self.scopes.iter().any(|s| s.aliases.contains(name)) {
            return Ok(());
        }
        let scope = self
            .scopes
            .last()
            .map_or_else(|| TOP_LEVEL.to_string(), |s| s.name.clone());
        if self.strict {
            return Err(RenderError::UnresolvedType {
                artifact: self.artifact.to_string(),
                scope,
                name: name.to_string(),
            });
        }
        self.unresolved.insert((scope, name.to_string()));
        Ok(())
    }

    fn check_name(&self, role: &'static str, name: &str) -> Result<(), RenderError> {
        if is_identifier(name) {
            Ok(())
        } else {
            Err(RenderError::InvalidIdentifier {
                artifact: self.artifact.to_string(),
                role,
                name: name.to_string(),
            })
        }
    }

    fn string(&self, value: &str) -> Result<String, RenderError> {
        serde_json::to_string(value).map_err(|source| RenderError::Encoding {
            artifact: self.artifact.to_string(),
            source,
        })
    }
}
