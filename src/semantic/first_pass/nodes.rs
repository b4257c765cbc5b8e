//! Nodes of the first pass and the categories of their placeholders.
//!
//! These mirror the IR nodes, except that every reference to another
//! named entity is a [`Pending`] handle. They never leave the semantic
//! module.

use crate::ast::{Expr, Identifier, Span, Spanned};
use crate::ir::{
    AssignArgument, ClassKind, Contracts, DefaultValue, Invariant, InterfaceId, PrimitiveType,
    ReferenceTarget, Serialization, SymbolId, VerificationKind,
};
use crate::semantic::placeholder::{Category, Pending, Registry};

/// A model type referred to by name in a type annotation.
pub struct TypeName;

impl Category for TypeName {
    type Request = Spanned<Identifier>;
    type Output = SymbolId;
}

/// A cross-reference as written in a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub target: String,
    /// The symbol whose description contains the reference, if any.
    pub owner: Option<SymbolId>,
    pub span: Span,
}

/// ``:class:`.Name` ``
pub struct SymbolReference;

impl Category for SymbolReference {
    type Request = RawReference;
    type Output = SymbolId;
}

/// ``:attr:`Name.member` `` or ``:attr:`member` ``
pub struct AttributeReference;

impl Category for AttributeReference {
    type Request = RawReference;
    type Output = ReferenceTarget;
}

/// The default value of an argument, kept as an expression until the
/// enumerations can be looked up.
pub struct ArgumentDefault;

impl Category for ArgumentDefault {
    type Request = Expr;
    type Output = DefaultValue;
}

/// A subset named in ``is_superset_of``.
pub struct Superset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupersetRequest {
    pub enumeration: SymbolId,
    pub subset: Spanned<Identifier>,
}

impl Category for Superset {
    type Request = SupersetRequest;
    type Output = SymbolId;
}

/// A parent named in the inheritance of a class or constrained primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRequest {
    pub class: SymbolId,
    pub parent: Identifier,
}

pub struct Inheritance;

impl Category for Inheritance {
    type Request = ParentRequest;
    type Output = SymbolId;
}

/// The interface of a parent class.
pub struct ImplementedInterface;

impl Category for ImplementedInterface {
    type Request = ParentRequest;
    type Output = InterfaceId;
}

/// The class that declares a property or a method.
pub struct DeclaringSymbol;

impl Category for DeclaringSymbol {
    type Request = Identifier;
    type Output = SymbolId;
}

/// The class representing association references.
pub struct Association;

impl Category for Association {
    type Request = Spanned<Identifier>;
    type Output = SymbolId;
}

/// One registry per placeholder category.
#[derive(Debug, Default)]
pub struct Registries {
    pub type_names: Registry<TypeName>,
    pub symbol_references: Registry<SymbolReference>,
    pub attribute_references: Registry<AttributeReference>,
    pub argument_defaults: Registry<ArgumentDefault>,
    pub supersets: Registry<Superset>,
    pub inheritances: Registry<Inheritance>,
    pub implemented_interfaces: Registry<ImplementedInterface>,
    pub declaring_symbols: Registry<DeclaringSymbol>,
    pub associations: Registry<Association>,
}

impl Registries {
    /// Number of placeholders over all categories.
    pub fn len(&self) -> usize {
        self.type_names.len()
            + self.symbol_references.len()
            + self.attribute_references.len()
            + self.argument_defaults.len()
            + self.supersets.len()
            + self.inheritances.len()
            + self.implemented_interfaces.len()
            + self.declaring_symbols.len()
            + self.associations.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingTypeAnnotation {
    Primitive(PrimitiveType),
    Our(Pending<TypeName>),
    List(Box<PendingTypeAnnotation>),
    Optional(Box<PendingTypeAnnotation>),
    Ref(Box<PendingTypeAnnotation>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingTarget {
    Symbol(Pending<SymbolReference>),
    Attribute(Pending<AttributeReference>),
    Argument(Identifier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReference {
    pub target: PendingTarget,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDescription {
    pub text: String,
    pub span: Span,
    pub references: Vec<PendingReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingProperty {
    pub name: Identifier,
    pub type_annotation: PendingTypeAnnotation,
    pub description: Option<PendingDescription>,
    pub specified_for: Pending<DeclaringSymbol>,
    pub is_implementation_specific: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingArgument {
    pub name: Identifier,
    pub type_annotation: PendingTypeAnnotation,
    pub default: Option<Pending<ArgumentDefault>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingMethod {
    pub name: Identifier,
    pub arguments: Vec<PendingArgument>,
    pub returns: Option<PendingTypeAnnotation>,
    pub description: Option<PendingDescription>,
    pub contracts: Contracts,
    pub specified_for: Pending<DeclaringSymbol>,
    pub is_implementation_specific: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingConstructor {
    pub arguments: Vec<PendingArgument>,
    pub statements: Vec<AssignArgument>,
    pub description: Option<PendingDescription>,
    pub contracts: Contracts,
    pub is_implementation_specific: bool,
    pub span: Option<Span>,
}

/// A verification function together with what it was understood as.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVerification {
    pub name: Identifier,
    pub arguments: Vec<PendingArgument>,
    pub returns: Option<PendingTypeAnnotation>,
    pub description: Option<PendingDescription>,
    pub contracts: Contracts,
    pub kind: VerificationKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingClass {
    pub name: Identifier,
    pub kind: ClassKind,
    pub inheritances: Vec<Pending<Inheritance>>,
    pub interface: Option<InterfaceId>,
    pub interfaces: Vec<Pending<ImplementedInterface>>,
    pub properties: Vec<PendingProperty>,
    pub methods: Vec<PendingMethod>,
    pub constructor: PendingConstructor,
    pub invariants: Vec<Invariant>,
    pub serialization: Serialization,
    pub description: Option<PendingDescription>,
    pub span: Span,
}

impl PendingClass {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|property| property.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingConstrainedPrimitive {
    pub name: Identifier,
    pub constrainee: PrimitiveType,
    pub inheritances: Vec<Pending<Inheritance>>,
    pub invariants: Vec<Invariant>,
    pub description: Option<PendingDescription>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLiteral {
    pub name: Identifier,
    pub value: String,
    pub description: Option<PendingDescription>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEnumeration {
    pub name: Identifier,
    pub literals: Vec<PendingLiteral>,
    pub is_superset_of: Vec<Pending<Superset>>,
    pub description: Option<PendingDescription>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInterface {
    pub name: Identifier,
    pub base: SymbolId,
    pub inheritances: Vec<Pending<ImplementedInterface>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingSymbol {
    Class(PendingClass),
    ConstrainedPrimitive(PendingConstrainedPrimitive),
    Enumeration(PendingEnumeration),
}

impl PendingSymbol {
    pub fn name(&self) -> &Identifier {
        match self {
            PendingSymbol::Class(class) => &class.name,
            PendingSymbol::ConstrainedPrimitive(primitive) => &primitive.name,
            PendingSymbol::Enumeration(enumeration) => &enumeration.name,
        }
    }
}
