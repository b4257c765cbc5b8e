//! Symbols of the finished IR.

use super::types::{DefaultValue, Description, TypeAnnotation};
use super::{InterfaceId, SymbolId};
use crate::ast::{Expr, Identifier, Span};
use crate::parsed::{ClassKind, Contracts, PrimitiveType};

/// The fallback value of a property when its constructor argument is
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorDefault {
    /// `[]`
    EmptyList,
    /// `Enumeration.LITERAL`
    EnumerationLiteral {
        enumeration: SymbolId,
        literal: Identifier,
    },
}

/// Assignment of a constructor argument to a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignArgument {
    /// The assigned property.
    pub name: Identifier,
    /// The argument the property is assigned from.
    pub argument: Identifier,
    pub default: Option<ConstructorDefault>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: Identifier,
    pub type_annotation: TypeAnnotation,
    pub description: Option<Description>,
    /// The class that declares the property; differs from the owning
    /// class for inherited properties.
    pub specified_for: SymbolId,
    pub is_implementation_specific: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Identifier,
    pub type_annotation: TypeAnnotation,
    pub default: Option<DefaultValue>,
    pub span: Span,
}

/// A method of a class. The `self` argument is not listed.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub returns: Option<TypeAnnotation>,
    pub description: Option<Description>,
    pub contracts: Contracts,
    /// The class that declares the method.
    pub specified_for: SymbolId,
    pub is_implementation_specific: bool,
    pub span: Span,
}

impl Method {
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.name == name)
    }
}

/// The constructor of a class with its body flattened over the ancestors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Constructor {
    /// Arguments without `self`; empty if the class defines no constructor.
    pub arguments: Vec<Argument>,
    /// Property assignments, those of the ancestors first.
    pub statements: Vec<AssignArgument>,
    pub description: Option<Description>,
    pub contracts: Contracts,
    pub is_implementation_specific: bool,
    pub span: Option<Span>,
}

impl Constructor {
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invariant {
    pub description: Option<String>,
    pub body: Expr,
    /// The class or constrained primitive that declares the invariant.
    pub specified_for: SymbolId,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Serialization {
    pub with_model_type: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Identifier,
    pub kind: ClassKind,

    /// Direct parents in declaration order.
    pub inheritances: Vec<SymbolId>,

    /// Ancestor sequence of the ontology, root-most first. Diamonds repeat
    /// ancestors.
    pub ancestors: Vec<SymbolId>,

    /// All descendants in topological order.
    pub descendants: Vec<SymbolId>,

    /// The non-abstract subset of `descendants`.
    pub concrete_descendants: Vec<SymbolId>,

    /// The interface this class is the base of. Only abstract classes and
    /// concrete classes with descendants have one.
    pub interface: Option<InterfaceId>,

    /// Interfaces of the direct parents, in declaration order.
    pub interfaces: Vec<InterfaceId>,

    /// Inherited properties first, then the own ones.
    pub properties: Vec<Property>,

    /// Inherited methods first, then the own ones.
    pub methods: Vec<Method>,

    pub constructor: Constructor,

    /// Inherited invariants first, then the own ones.
    pub invariants: Vec<Invariant>,

    pub serialization: Serialization,
    pub description: Option<Description>,
    pub span: Span,
}

impl Class {
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

/// A class that restricts the values of a built-in type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedPrimitive {
    pub name: Identifier,
    pub constrainee: PrimitiveType,
    /// Parent constrained primitives; the built-in base is not listed.
    pub inheritances: Vec<SymbolId>,
    pub descendants: Vec<SymbolId>,
    pub invariants: Vec<Invariant>,
    pub description: Option<Description>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationLiteral {
    pub name: Identifier,
    pub value: String,
    pub description: Option<Description>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub name: Identifier,
    pub literals: Vec<EnumerationLiteral>,
    /// Enumerations whose literals all appear in this one.
    pub is_superset_of: Vec<SymbolId>,
    pub description: Option<Description>,
    pub span: Span,
}

impl Enumeration {
    pub fn literal(&self, name: &str) -> Option<&EnumerationLiteral> {
        self.literals.iter().find(|literal| literal.name == name)
    }
}

/// The view of a class that its descendants implement.
///
/// Properties, signatures and the serialization setting are those of the
/// base class; see [`super::SymbolTable::interface_base`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: Identifier,
    pub base: SymbolId,
    /// Interfaces of the base's parents.
    pub inheritances: Vec<InterfaceId>,
}

/// How a verification function is realized in the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationKind {
    /// Written by hand for every target.
    ImplementationSpecific,

    /// Checks its single string argument against a regular expression,
    /// so it can be transpiled to every target and schema.
    Pattern { pattern: String },
}

/// A verification function that invariants and contracts may call.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub name: Identifier,
    pub arguments: Vec<Argument>,
    pub returns: Option<TypeAnnotation>,
    pub description: Option<Description>,
    pub contracts: Contracts,
    pub kind: VerificationKind,
    pub span: Span,
}

impl Verification {
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    /// The regular expression of a pattern verification.
    pub fn pattern(&self) -> Option<&str> {
        match &self.kind {
            VerificationKind::Pattern { pattern } => Some(pattern),
            VerificationKind::ImplementationSpecific => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Class(Class),
    ConstrainedPrimitive(ConstrainedPrimitive),
    Enumeration(Enumeration),
}

impl Symbol {
    pub fn name(&self) -> &Identifier {
        match self {
            Symbol::Class(class) => &class.name,
            Symbol::ConstrainedPrimitive(primitive) => &primitive.name,
            Symbol::Enumeration(enumeration) => &enumeration.name,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Symbol::Class(class) => &class.span,
            Symbol::ConstrainedPrimitive(primitive) => &primitive.span,
            Symbol::Enumeration(enumeration) => &enumeration.span,
        }
    }

    pub fn description(&self) -> Option<&Description> {
        match self {
            Symbol::Class(class) => class.description.as_ref(),
            Symbol::ConstrainedPrimitive(primitive) => primitive.description.as_ref(),
            Symbol::Enumeration(enumeration) => enumeration.description.as_ref(),
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Symbol::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_constrained_primitive(&self) -> Option<&ConstrainedPrimitive> {
        match self {
            Symbol::ConstrainedPrimitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&Enumeration> {
        match self {
            Symbol::Enumeration(enumeration) => Some(enumeration),
            _ => None,
        }
    }
}
