//! Abstract code model consumed by renderers.
//!
//! The tree is purely descriptive: it records the declarations, statements
//! and expressions a generated file should contain without any execution
//! semantics. Builders construct fresh trees per generation pass and hand
//! them to a [`Renderer`](crate::render::Renderer).

/// A top-level or namespace-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A named module grouping further declarations.
    Namespace(Namespace),
    /// A named type.
    TypeAlias(TypeAlias),
    /// A function declaration.
    Function(Function),
    /// A variable, optionally ambient (declared but not defined).
    Variable(VariableDeclaration),
}

impl Declaration {
    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Namespace(ns) => &ns.name,
            Self::TypeAlias(alias) => &alias.name,
            Self::Function(func) => &func.name,
            Self::Variable(var) => &var.name,
        }
    }
}

impl From<Namespace> for Declaration {
    fn from(value: Namespace) -> Self {
        Self::Namespace(value)
    }
}

impl From<TypeAlias> for Declaration {
    fn from(value: TypeAlias) -> Self {
        Self::TypeAlias(value)
    }
}

impl From<Function> for Declaration {
    fn from(value: Function) -> Self {
        Self::Function(value)
    }
}

impl From<VariableDeclaration> for Declaration {
    fn from(value: VariableDeclaration) -> Self {
        Self::Variable(value)
    }
}

/// A namespace block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Namespace identifier.
    pub name: String,
    /// Whether the namespace is exported.
    pub exported: bool,
    /// Members in declaration order.
    pub members: Vec<Declaration>,
}

impl Namespace {
    /// Create an exported namespace.
    #[must_use]
    pub fn exported(name: impl Into<String>, members: Vec<Declaration>) -> Self {
        Self {
            name: name.into(),
            exported: true,
            members,
        }
    }

    /// Functions declared directly in this namespace.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.members.iter().filter_map(|m| match m {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }

    /// Type aliases declared directly in this namespace.
    pub fn type_aliases(&self) -> impl Iterator<Item = &TypeAlias> {
        self.members.iter().filter_map(|m| match m {
            Declaration::TypeAlias(alias) => Some(alias),
            _ => None,
        })
    }
}

/// A `type Name = ...` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAlias {
    /// Alias identifier.
    pub name: String,
    /// Whether the alias is exported.
    pub exported: bool,
    /// Aliased type.
    pub ty: TypeExpr,
}

/// Modifiers applied to a [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionModifiers {
    /// `export`
    pub exported: bool,
    /// `async`
    pub is_async: bool,
    /// `function*`
    pub generator: bool,
}

/// A named function declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function identifier.
    pub name: String,
    /// Export, async and generator flags.
    pub modifiers: FunctionModifiers,
    /// Parameters in order.
    pub params: Vec<Parameter>,
    /// Declared return type, if any.
    pub returns: Option<TypeExpr>,
    /// Body statements.
    pub body: Vec<Statement>,
}

/// A function or arrow-function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter identifier.
    pub name: String,
    /// Type annotation; `None` leaves the parameter untyped.
    pub ty: Option<TypeExpr>,
}

impl Parameter {
    /// An untyped parameter.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
        }
    }

    /// A parameter with a type annotation.
    #[must_use]
    pub fn typed(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }
}

/// A `const` variable declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    /// Variable identifier.
    pub name: String,
    /// Emitted with `declare`; ambient declarations carry no initializer.
    pub ambient: bool,
    /// Type annotation.
    pub ty: Option<TypeExpr>,
    /// Initial value.
    pub init: Option<Expr>,
}

impl VariableDeclaration {
    /// A `const name = init` declaration.
    #[must_use]
    pub fn constant(name: impl Into<String>, init: Expr) -> Self {
        Self {
            name: name.into(),
            ambient: false,
            ty: None,
            init: Some(init),
        }
    }
}

/// A statement inside a function or arrow-function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// An expression evaluated for its effect.
    Expr(Expr),
    /// A local variable.
    Variable(VariableDeclaration),
    /// `yield expr` inside a generator.
    Yield(Expr),
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A bare name.
    Identifier(String),
    /// `object.property`
    Member {
        /// Object being accessed.
        object: Box<Expr>,
        /// Property name.
        property: String,
    },
    /// A call expression.
    Call(Call),
    /// `await expr`
    Await(Box<Expr>),
    /// An arrow function.
    Arrow(ArrowFunction),
    /// A literal value.
    Literal(Literal),
    /// `[a, b, ...]`
    Array(ArrayLiteral),
    /// `{ key: value, ... }`
    Object(ObjectLiteral),
}

impl Expr {
    /// A bare identifier.
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// `self.property`
    #[must_use]
    pub fn member(self, property: impl Into<String>) -> Self {
        Self::Member {
            object: Box::new(self),
            property: property.into(),
        }
    }

    /// `self(args...)`
    #[must_use]
    pub fn call(self, args: Vec<Self>) -> Self {
        Self::Call(Call {
            callee: Box::new(self),
            args,
        })
    }

    /// `await self`
    #[must_use]
    pub fn awaited(self) -> Self {
        Self::Await(Box::new(self))
    }

    /// A string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }
}

impl From<Call> for Expr {
    fn from(value: Call) -> Self {
        Self::Call(value)
    }
}

impl From<ArrowFunction> for Expr {
    fn from(value: ArrowFunction) -> Self {
        Self::Arrow(value)
    }
}

impl From<ArrayLiteral> for Expr {
    fn from(value: ArrayLiteral) -> Self {
        Self::Array(value)
    }
}

impl From<ObjectLiteral> for Expr {
    fn from(value: ObjectLiteral) -> Self {
        Self::Object(value)
    }
}

/// A call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Called expression.
    pub callee: Box<Expr>,
    /// Arguments in order.
    pub args: Vec<Expr>,
}

/// An arrow function with a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowFunction {
    /// `async`
    pub is_async: bool,
    /// Parameters in order.
    pub params: Vec<Parameter>,
    /// Body statements.
    pub body: Vec<Statement>,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A string literal; escaping is the renderer's concern.
    String(String),
}

/// An array literal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayLiteral {
    /// Elements in order.
    pub elements: Vec<Expr>,
}

/// An object literal with ordered properties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectLiteral {
    /// `(key, value)` pairs in emission order.
    pub properties: Vec<(String, Expr)>,
}

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A named type such as `string` or `Row`.
    Reference(String),
    /// `Name<args...>`
    Generic {
        /// Generic type name.
        name: String,
        /// Type arguments.
        args: Vec<TypeExpr>,
    },
    /// A record keyed by string literals: `Record<"a" | "b", V>`.
    Record {
        /// Key names in order.
        keys: Vec<String>,
        /// Value type shared by every key.
        value: Box<TypeExpr>,
    },
    /// `(params) => returns`
    Function {
        /// Parameters in order.
        params: Vec<Parameter>,
        /// Return type.
        returns: Box<TypeExpr>,
    },
}

impl TypeExpr {
    /// A named type reference.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// `string`
    #[must_use]
    pub fn string() -> Self {
        Self::reference("string")
    }

    /// `void`
    #[must_use]
    pub fn void() -> Self {
        Self::reference("void")
    }

    /// `Promise<inner>`
    #[must_use]
    pub fn promise(inner: Self) -> Self {
        Self::Generic {
            name: "Promise".into(),
            args: vec![inner],
        }
    }
}
