//! Semantic diagnostics of the translation passes.
//!
//! Messages that several passes produce, or that users match on, are built
//! here so that their wording stays in one place.

use crate::ast::Span;
use crate::diag::{Diag, DiagLabel};

/// Categories of semantic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticDiagKind {
    /// A class is part of an inheritance cycle.
    InheritanceCycle,

    /// A class inherits from something that is not a defined class.
    InvalidInheritance,

    /// A property or method redefines one of an ancestor.
    MemberConflict,

    /// A class lacks a constructor although an ancestor requires arguments.
    MissingConstructor,

    /// A constrained primitive breaks one of its restrictions.
    InvalidConstrainedPrimitive,

    /// A constructor body could not be understood.
    InvalidConstructor,

    /// Serialization settings disagree along the inheritance.
    InconsistentSerialization,

    /// A name does not resolve to a symbol.
    UndefinedSymbol,

    /// A type annotation is used where its shape is not allowed.
    InvalidTypeAnnotation,

    /// A description cross-reference is malformed or dangling.
    InvalidDescriptionReference,

    /// A default value has a shape we do not translate.
    UnsupportedDefault,

    /// An enumeration is not a superset of what it declares.
    InvalidSuperset,

    /// A class used as a property type, or one of its concrete
    /// implementers, lacks the type discriminator.
    MissingDiscriminator,

    /// A mandatory property is not initialized by the constructor.
    UninitializedProperty,

    /// A description refers to an argument the signature lacks.
    InvalidArgumentReference,

    /// A verification function could not be understood.
    InvalidVerificationFunction,

    /// An invariant or a contract calls a function we cannot handle.
    InvalidFunctionCall,

    /// A contract depends on an argument the signature lacks.
    InvalidContract,
}

impl SemanticDiagKind {
    /// Returns a human-readable name for this diagnostic kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::InheritanceCycle => "inheritance_cycle",
            Self::InvalidInheritance => "invalid_inheritance",
            Self::MemberConflict => "member_conflict",
            Self::MissingConstructor => "missing_constructor",
            Self::InvalidConstrainedPrimitive => "invalid_constrained_primitive",
            Self::InvalidConstructor => "invalid_constructor",
            Self::InconsistentSerialization => "inconsistent_serialization",
            Self::UndefinedSymbol => "undefined_symbol",
            Self::InvalidTypeAnnotation => "invalid_type_annotation",
            Self::InvalidDescriptionReference => "invalid_description_reference",
            Self::UnsupportedDefault => "unsupported_default",
            Self::InvalidSuperset => "invalid_superset",
            Self::MissingDiscriminator => "missing_discriminator",
            Self::UninitializedProperty => "uninitialized_property",
            Self::InvalidArgumentReference => "invalid_argument_reference",
            Self::InvalidVerificationFunction => "invalid_verification_function",
            Self::InvalidFunctionCall => "invalid_function_call",
            Self::InvalidContract => "invalid_contract",
        }
    }

    /// The miette code attached to diagnostics of this kind.
    pub fn code(self) -> String {
        format!("metamodel::{}", self.name())
    }
}

/// Builder for semantic diagnostics.
pub struct SemanticDiagBuilder {
    kind: SemanticDiagKind,
    message: String,
    labels: Vec<DiagLabel>,
    help: Option<String>,
}

impl SemanticDiagBuilder {
    /// Creates a new semantic diagnostic builder.
    pub fn new(kind: SemanticDiagKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Adds a primary label at the given span.
    pub fn with_primary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::primary(span, message));
        self
    }

    /// Adds a secondary label at the given span.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Builds the diagnostic.
    pub fn build(self) -> Diag {
        let mut diag = Diag::error(self.message).with_code(self.kind.code());
        diag.labels = self.labels;
        diag.help = self.help;
        diag
    }
}

/// Helper functions for creating common semantic diagnostics.
impl SemanticDiagBuilder {
    /// Shorthand for a diagnostic with a single unlabeled primary span.
    pub fn at(kind: SemanticDiagKind, span: Span, message: impl Into<String>) -> Self {
        Self::new(kind, message).with_primary_label(span, "")
    }

    pub fn inheritance_cycle(class_name: &str, span: Span) -> Self {
        Self::new(
            SemanticDiagKind::InheritanceCycle,
            format!(
                "Expected no cycles in the inheritance, \
                 but the class {class_name} has been observed in a cycle"
            ),
        )
        .with_primary_label(span, "revisited while its ancestors were being sorted")
    }

    pub fn conflicting_property(
        property: &str,
        ancestor: &str,
        span: Span,
        ancestor_span: Span,
    ) -> Self {
        Self::new(
            SemanticDiagKind::MemberConflict,
            format!("The property has already been defined in the ancestor class {ancestor}: {property}"),
        )
        .with_primary_label(span, "redefined here")
        .with_secondary_label(ancestor_span, "first defined here")
    }

    pub fn conflicting_method(method: &str, ancestor: &str, span: Span, ancestor_span: Span) -> Self {
        Self::new(
            SemanticDiagKind::MemberConflict,
            format!("The method has already been defined in the ancestor class {ancestor}: {method}"),
        )
        .with_primary_label(span, "redefined here")
        .with_secondary_label(ancestor_span, "first defined here")
    }

    pub fn missing_constructor(
        class_name: &str,
        ancestor: &str,
        arguments: &str,
        span: Span,
    ) -> Self {
        Self::new(
            SemanticDiagKind::MissingConstructor,
            format!(
                "The class {class_name} does not specify a constructor, \
                 but the ancestor class {ancestor} specifies a constructor \
                 with arguments: {arguments}"
            ),
        )
        .with_primary_label(span, "")
        .with_help("define a constructor that delegates to the ancestor's constructor")
    }

    pub fn undefined_symbol(identifier: &str, span: Span) -> Self {
        Self::at(
            SemanticDiagKind::UndefinedSymbol,
            span,
            format!("The symbol with identifier '{identifier}' is not available in the symbol table."),
        )
    }

    pub fn missing_discriminator(implementer: &str, interface: &str, span: Span) -> Self {
        Self::new(
            SemanticDiagKind::MissingDiscriminator,
            format!(
                "The class '{implementer}' needs to have serialization setting \
                 ``with_model_type`` set since it is among the concrete implementers \
                 of the interface '{interface}' used as a property type. We need to \
                 discriminate on model type at the de-serialization"
            ),
        )
        .with_primary_label(span, "")
    }

    pub fn missing_base_discriminator(class_name: &str, concrete_descendants: &str, span: Span) -> Self {
        Self::new(
            SemanticDiagKind::MissingDiscriminator,
            format!(
                "The class '{class_name}' has one or more concrete descendants \
                 ({concrete_descendants}), but its serialization setting \
                 ``with_model_type`` has not been set. We need to discriminate \
                 on model type at the de-serialization."
            ),
        )
        .with_primary_label(span, "used as a property type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_diagnostic_carries_the_kind_as_code() {
        let diag = SemanticDiagBuilder::inheritance_cycle("Cycle", 0..5).build();
        assert_eq!(
            diag.message,
            "Expected no cycles in the inheritance, but the class Cycle has been observed in a cycle"
        );
        assert_eq!(diag.code.as_deref(), Some("metamodel::inheritance_cycle"));
        assert_eq!(diag.primary_span(), Some(&(0..5)));
    }

    #[test]
    fn missing_constructor_lists_the_arguments() {
        let diag = SemanticDiagBuilder::missing_constructor("Something", "Abstract", "self, x", 0..0)
            .build();
        assert_eq!(
            diag.message,
            "The class Something does not specify a constructor, but the ancestor \
             class Abstract specifies a constructor with arguments: self, x"
        );
        assert!(diag.help.is_some());
    }

    #[test]
    fn missing_base_discriminator_lists_the_concrete_descendants() {
        let diag =
            SemanticDiagBuilder::missing_base_discriminator("Abstract", "'A', 'B'", 0..0).build();
        assert_eq!(
            diag.message,
            "The class 'Abstract' has one or more concrete descendants ('A', 'B'), \
             but its serialization setting ``with_model_type`` has not been set. \
             We need to discriminate on model type at the de-serialization."
        );
        assert_eq!(diag.code.as_deref(), Some("metamodel::missing_discriminator"));
    }
}
