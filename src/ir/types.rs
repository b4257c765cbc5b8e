//! Type annotations, default values and descriptions of the finished IR.

use super::{SymbolId, SymbolTable};
use crate::ast::{Constant, Identifier, Span};
use crate::parsed::PrimitiveType;
use std::fmt;

/// A resolved type annotation.
///
/// References to model types hold the id of the symbol, never its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeAnnotation {
    Primitive(PrimitiveType),

    /// A class, constrained primitive or enumeration of the model.
    Our(SymbolId),

    List(Box<TypeAnnotation>),

    Optional(Box<TypeAnnotation>),

    /// An association reference to an instance of the wrapped type.
    Ref(Box<TypeAnnotation>),
}

impl TypeAnnotation {
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeAnnotation::Optional(_))
    }

    /// Strips `Optional` wrappers.
    pub fn beneath_optional(&self) -> &TypeAnnotation {
        match self {
            TypeAnnotation::Optional(value) => value.beneath_optional(),
            other => other,
        }
    }

    /// The symbols this annotation holds as values, descending through
    /// lists and optionals but not through association references.
    pub fn value_symbols(&self) -> Vec<SymbolId> {
        let mut symbols = Vec::new();
        self.collect_value_symbols(&mut symbols);
        symbols
    }

    fn collect_value_symbols(&self, out: &mut Vec<SymbolId>) {
        match self {
            TypeAnnotation::Our(id) => out.push(*id),
            TypeAnnotation::List(items) => items.collect_value_symbols(out),
            TypeAnnotation::Optional(value) => value.collect_value_symbols(out),
            TypeAnnotation::Primitive(_) | TypeAnnotation::Ref(_) => {}
        }
    }

    /// Renders the annotation with symbol names looked up in `table`.
    pub fn display<'a>(&'a self, table: &'a SymbolTable) -> TypeAnnotationDisplay<'a> {
        TypeAnnotationDisplay {
            annotation: self,
            table,
        }
    }
}

/// See [`TypeAnnotation::display`].
pub struct TypeAnnotationDisplay<'a> {
    annotation: &'a TypeAnnotation,
    table: &'a SymbolTable,
}

impl<'a> TypeAnnotationDisplay<'a> {
    fn nested(&self, annotation: &'a TypeAnnotation) -> Self {
        Self {
            annotation,
            table: self.table,
        }
    }
}

impl fmt::Display for TypeAnnotationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.annotation {
            TypeAnnotation::Primitive(primitive) => write!(f, "{primitive}"),
            TypeAnnotation::Our(id) => write!(f, "{}", self.table.get(*id).name()),
            TypeAnnotation::List(items) => write!(f, "List[{}]", self.nested(items)),
            TypeAnnotation::Optional(value) => write!(f, "Optional[{}]", self.nested(value)),
            TypeAnnotation::Ref(value) => write!(f, "Ref[{}]", self.nested(value)),
        }
    }
}

/// The default value of an argument.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Constant(Constant),
    EmptyList,
    EnumerationLiteral {
        enumeration: SymbolId,
        literal: Identifier,
    },
}

/// What a cross-reference in a description points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    Symbol(SymbolId),

    /// A property of a class, possibly inherited.
    Property { class: SymbolId, name: Identifier },

    EnumerationLiteral {
        enumeration: SymbolId,
        literal: Identifier,
    },

    /// An argument of the documented method or constructor; checked
    /// during verification, not resolved.
    Argument(Identifier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionReference {
    pub target: ReferenceTarget,
    pub span: Span,
}

/// A description with its cross-references resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub span: Span,
    /// References in order of appearance.
    pub references: Vec<DescriptionReference>,
}

impl Description {
    /// Names of the arguments referenced with ``:paramref:``.
    pub fn argument_references(&self) -> impl Iterator<Item = (&Identifier, &Span)> {
        self.references
            .iter()
            .filter_map(|reference| match &reference.target {
                ReferenceTarget::Argument(name) => Some((name, &reference.span)),
                _ => None,
            })
    }
}
