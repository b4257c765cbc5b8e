//! The parsed symbol table handed over by the front end.
//!
//! This is the input of the semantic passes. Inheritance, property types,
//! supersets and the association symbol still refer to other symbols by
//! name only; nothing here has been checked beyond syntax. Verification
//! functions live next to the symbols, in a namespace of their own.
//!
//! # Example
//!
//! ```
//! use metamodel_ir::parsed::{Class, Property, Symbol, SymbolTable, TypeAnnotation};
//!
//! let table = SymbolTable::new(
//!     vec![
//!         Symbol::Class(Class::abstract_class("Referable")),
//!         Symbol::Class(
//!             Class::concrete("Asset")
//!                 .with_parent("Referable")
//!                 .with_property(Property::new("id", TypeAnnotation::atomic("str"))),
//!         ),
//!     ],
//!     "Reference",
//! )
//! .unwrap();
//!
//! assert_eq!(table.classes().count(), 2);
//! ```

mod symbol_table;

pub use symbol_table::{Symbol, SymbolId, SymbolTable};

use crate::ast::{Expr, Identifier, Span, Spanned, Stmt};
use std::fmt;

/// Built-in types a property or a constrained primitive may use directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Int,
    Float,
    Str,
    Bytearray,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "str" => Some(Self::Str),
            "bytearray" => Some(Self::Bytearray),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytearray => "bytearray",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type annotation as written, with names not yet looked up.
pub type TypeAnnotation = Spanned<TypeAnnotationKind>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeAnnotationKind {
    /// A primitive or a symbol name, e.g. `str` or `Asset`.
    Atomic(Identifier),
    List(Box<TypeAnnotation>),
    Optional(Box<TypeAnnotation>),
    /// An association reference to the wrapped type.
    Ref(Box<TypeAnnotation>),
    /// The implicit type of `self`.
    SelfType,
}

impl Spanned<TypeAnnotationKind> {
    pub fn atomic(identifier: impl Into<Identifier>) -> Self {
        Spanned::detached(TypeAnnotationKind::Atomic(identifier.into()))
    }

    pub fn list(items: TypeAnnotation) -> Self {
        Spanned::detached(TypeAnnotationKind::List(Box::new(items)))
    }

    pub fn optional(value: TypeAnnotation) -> Self {
        Spanned::detached(TypeAnnotationKind::Optional(Box::new(value)))
    }

    pub fn reference(value: TypeAnnotation) -> Self {
        Spanned::detached(TypeAnnotationKind::Ref(Box::new(value)))
    }

    pub fn self_type() -> Self {
        Spanned::detached(TypeAnnotationKind::SelfType)
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.node, TypeAnnotationKind::Optional(_))
    }
}

impl fmt::Display for TypeAnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic(identifier) => write!(f, "{identifier}"),
            Self::List(items) => write!(f, "List[{}]", items.node),
            Self::Optional(value) => write!(f, "Optional[{}]", value.node),
            Self::Ref(value) => write!(f, "Ref[{}]", value.node),
            Self::SelfType => write!(f, "Self"),
        }
    }
}

/// Documentation attached to a definition.
///
/// The text may contain cross-references such as ``:class:`.Asset` ``;
/// they are extracted by [`crate::lexer::scan_references`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub span: Span,
}

impl Description {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: 0..0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: Identifier,
    pub type_annotation: TypeAnnotation,
    pub description: Option<Description>,
    pub is_implementation_specific: bool,
    pub span: Span,
}

impl Property {
    pub fn new(name: impl Into<Identifier>, type_annotation: TypeAnnotation) -> Self {
        Self {
            name: name.into(),
            type_annotation,
            description: None,
            is_implementation_specific: false,
            span: 0..0,
        }
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Identifier,
    pub type_annotation: TypeAnnotation,
    /// The default value expression, as written.
    pub default: Option<Expr>,
    pub span: Span,
}

impl Argument {
    pub fn new(name: impl Into<Identifier>, type_annotation: TypeAnnotation) -> Self {
        Self {
            name: name.into(),
            type_annotation,
            default: None,
            span: 0..0,
        }
    }

    /// The implicit instance argument.
    pub fn self_argument() -> Self {
        Self::new("self", TypeAnnotation::self_type())
    }

    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

/// A method signature. The constructor is kept apart as [`Constructor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Identifier,
    /// Arguments including the leading `self`.
    pub arguments: Vec<Argument>,
    pub returns: Option<TypeAnnotation>,
    pub description: Option<Description>,
    pub contracts: Contracts,
    pub is_implementation_specific: bool,
    pub span: Span,
}

impl Method {
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            arguments: vec![Argument::self_argument()],
            returns: None,
            description: None,
            contracts: Contracts::default(),
            is_implementation_specific: false,
            span: 0..0,
        }
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_returns(mut self, returns: TypeAnnotation) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_contracts(mut self, contracts: Contracts) -> Self {
        self.contracts = contracts;
        self
    }
}

/// An explicit `__init__`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    /// Arguments including the leading `self`.
    pub arguments: Vec<Argument>,
    pub body: Vec<Stmt>,
    pub description: Option<Description>,
    pub contracts: Contracts,
    pub is_implementation_specific: bool,
    pub span: Span,
}

impl Constructor {
    pub fn new() -> Self {
        Self {
            arguments: vec![Argument::self_argument()],
            body: Vec::new(),
            description: None,
            contracts: Contracts::default(),
            is_implementation_specific: false,
            span: 0..0,
        }
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_statement(mut self, statement: Stmt) -> Self {
        self.body.push(statement);
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_contracts(mut self, contracts: Contracts) -> Self {
        self.contracts = contracts;
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    /// Comma-separated argument names, `self` included.
    pub fn argument_names(&self) -> String {
        self.arguments
            .iter()
            .map(|argument| argument.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Constructor {
    fn default() -> Self {
        Self::new()
    }
}

/// A class invariant. The body is opaque to this phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Invariant {
    pub description: Option<String>,
    pub body: Expr,
    pub span: Span,
}

/// A pre- or postcondition of a signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    /// Arguments the condition depends on. Postconditions may also name
    /// `OLD` and `result`.
    pub args: Vec<Identifier>,
    pub description: Option<String>,
    pub body: Expr,
    pub span: Span,
}

impl Contract {
    pub fn new(args: &[&str], body: Expr) -> Self {
        Self {
            args: args.iter().map(|arg| Identifier::new(arg)).collect(),
            description: None,
            body,
            span: 0..0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A value captured before the execution, available to the
/// postconditions as `OLD.<name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub args: Vec<Identifier>,
    pub name: Identifier,
    pub body: Expr,
    pub span: Span,
}

impl Snapshot {
    pub fn new(name: impl Into<Identifier>, args: &[&str], body: Expr) -> Self {
        Self {
            args: args.iter().map(|arg| Identifier::new(arg)).collect(),
            name: name.into(),
            body,
            span: 0..0,
        }
    }
}

/// Design-by-contract conditions of a method, a constructor or a function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contracts {
    pub preconditions: Vec<Contract>,
    pub snapshots: Vec<Snapshot>,
    pub postconditions: Vec<Contract>,
}

impl Contracts {
    pub fn with_precondition(mut self, contract: Contract) -> Self {
        self.preconditions.push(contract);
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshots.push(snapshot);
        self
    }

    pub fn with_postcondition(mut self, contract: Contract) -> Self {
        self.postconditions.push(contract);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.preconditions.is_empty() && self.snapshots.is_empty() && self.postconditions.is_empty()
    }
}

/// A module-level function that invariants and contracts may call.
///
/// Unlike a method it has no instance argument. An understood function
/// has a body that the translation interprets; an implementation-specific
/// one is provided by hand for each target.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub returns: Option<TypeAnnotation>,
    pub description: Option<Description>,
    pub contracts: Contracts,
    pub body: Vec<Stmt>,
    pub is_implementation_specific: bool,
    pub span: Span,
}

impl Function {
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            returns: None,
            description: None,
            contracts: Contracts::default(),
            body: Vec::new(),
            is_implementation_specific: false,
            span: 0..0,
        }
    }

    pub fn implementation_specific(name: impl Into<Identifier>) -> Self {
        Self {
            is_implementation_specific: true,
            ..Self::new(name)
        }
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_returns(mut self, returns: TypeAnnotation) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_contracts(mut self, contracts: Contracts) -> Self {
        self.contracts = contracts;
        self
    }

    pub fn with_statement(mut self, statement: Stmt) -> Self {
        self.body.push(statement);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Raw serialization flags as declared on a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Serialization {
    /// `Some(_)` only if the class declares the setting explicitly.
    pub with_model_type: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Identifier,
    pub kind: ClassKind,
    /// Direct parents in declaration order.
    pub inheritances: Vec<Identifier>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub constructor: Option<Constructor>,
    pub invariants: Vec<Invariant>,
    pub serialization: Serialization,
    pub description: Option<Description>,
    pub span: Span,
}

impl Class {
    fn new(name: impl Into<Identifier>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            inheritances: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructor: None,
            invariants: Vec::new(),
            serialization: Serialization::default(),
            description: None,
            span: 0..0,
        }
    }

    pub fn concrete(name: impl Into<Identifier>) -> Self {
        Self::new(name, ClassKind::Concrete)
    }

    pub fn abstract_class(name: impl Into<Identifier>) -> Self {
        Self::new(name, ClassKind::Abstract)
    }

    pub fn with_parent(mut self, parent: impl Into<Identifier>) -> Self {
        self.inheritances.push(parent.into());
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_invariant(mut self, invariant: Invariant) -> Self {
        self.invariants.push(invariant);
        self
    }

    pub fn with_model_type(mut self, with_model_type: bool) -> Self {
        self.serialization.with_model_type = Some(with_model_type);
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == ClassKind::Abstract
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationLiteral {
    pub name: Identifier,
    pub value: String,
    pub description: Option<Description>,
    pub span: Span,
}

impl EnumerationLiteral {
    pub fn new(name: impl Into<Identifier>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
            span: 0..0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub name: Identifier,
    pub literals: Vec<EnumerationLiteral>,
    /// Names of the enumerations this one is declared a superset of.
    pub is_superset_of: Vec<Spanned<Identifier>>,
    pub description: Option<Description>,
    pub span: Span,
}

impl Enumeration {
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            literals: Vec::new(),
            is_superset_of: Vec::new(),
            description: None,
            span: 0..0,
        }
    }

    pub fn with_literal(mut self, name: impl Into<Identifier>, value: impl Into<String>) -> Self {
        self.literals.push(EnumerationLiteral::new(name, value));
        self
    }

    pub fn with_superset_of(mut self, subset: impl Into<Identifier>) -> Self {
        self.is_superset_of.push(Spanned::detached(subset.into()));
        self
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn literal(&self, name: &str) -> Option<&EnumerationLiteral> {
        self.literals.iter().find(|literal| literal.name == name)
    }
}
