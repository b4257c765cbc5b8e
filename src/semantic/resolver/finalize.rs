//! Construction of the IR from the first pass and the resolutions.

use super::Resolved;
use crate::ir::{
    self, Argument, Class, ConstrainedPrimitive, Constructor, Description, DescriptionReference,
    Enumeration, EnumerationLiteral, Interface, Method, Property, ReferenceTarget, Symbol,
    SymbolId, TypeAnnotation, Verification,
};
use crate::parsed;
use crate::semantic::first_pass::{
    FirstPass, PendingArgument, PendingClass, PendingConstrainedPrimitive, PendingConstructor,
    PendingDescription, PendingEnumeration, PendingInterface, PendingMethod, PendingProperty,
    PendingSymbol, PendingTarget, PendingTypeAnnotation, PendingVerification,
};
use crate::semantic::ontology::Ontology;

/// Replaces every placeholder with its resolution.
#[tracing::instrument(skip_all)]
pub fn finalize(
    table: &parsed::SymbolTable,
    ontology: &Ontology,
    first: FirstPass,
    resolved: &Resolved,
) -> ir::SymbolTable {
    let finalizer = Finalizer {
        table,
        ontology,
        resolved,
    };

    let FirstPass {
        symbols,
        interfaces,
        topologically_sorted,
        ref_association,
        description,
        verification_functions,
        registries: _,
    } = first;

    let symbols = symbols
        .into_iter()
        .enumerate()
        .map(|(index, symbol)| finalizer.symbol(SymbolId::new(index), symbol))
        .collect();
    let interfaces = interfaces
        .into_iter()
        .map(|interface| finalizer.interface(interface))
        .collect();
    let verification_functions = verification_functions
        .into_iter()
        .map(|function| finalizer.verification(function))
        .collect();

    ir::SymbolTable::new(
        symbols,
        interfaces,
        topologically_sorted,
        resolved.associations.resolved(ref_association),
        description.map(|description| finalizer.description(description)),
        verification_functions,
    )
}

struct Finalizer<'a> {
    table: &'a parsed::SymbolTable,
    ontology: &'a Ontology,
    resolved: &'a Resolved,
}

impl Finalizer<'_> {
    fn symbol(&self, id: SymbolId, symbol: PendingSymbol) -> Symbol {
        match symbol {
            PendingSymbol::Class(class) => Symbol::Class(self.class(id, class)),
            PendingSymbol::ConstrainedPrimitive(primitive) => {
                Symbol::ConstrainedPrimitive(self.constrained_primitive(id, primitive))
            }
            PendingSymbol::Enumeration(enumeration) => {
                Symbol::Enumeration(self.enumeration(enumeration))
            }
        }
    }

    fn class(&self, id: SymbolId, class: PendingClass) -> Class {
        let descendants = self.ontology.descendants(id).to_vec();
        let concrete_descendants = descendants
            .iter()
            .copied()
            .filter(|&descendant| {
                self.table
                    .class(descendant)
                    .is_some_and(|class| !class.is_abstract())
            })
            .collect();

        Class {
            name: class.name,
            kind: class.kind,
            inheritances: class
                .inheritances
                .into_iter()
                .map(|parent| self.resolved.inheritances.resolved(parent))
                .collect(),
            ancestors: self.ontology.ancestors(id).to_vec(),
            descendants,
            concrete_descendants,
            interface: class.interface,
            interfaces: class
                .interfaces
                .into_iter()
                .map(|interface| self.resolved.implemented_interfaces.resolved(interface))
                .collect(),
            properties: class
                .properties
                .into_iter()
                .map(|property| self.property(property))
                .collect(),
            methods: class
                .methods
                .into_iter()
                .map(|method| self.method(method))
                .collect(),
            constructor: self.constructor(class.constructor),
            invariants: class.invariants,
            serialization: class.serialization,
            description: class.description.map(|d| self.description(d)),
            span: class.span,
        }
    }

    fn constrained_primitive(
        &self,
        id: SymbolId,
        primitive: PendingConstrainedPrimitive,
    ) -> ConstrainedPrimitive {
        ConstrainedPrimitive {
            name: primitive.name,
            constrainee: primitive.constrainee,
            inheritances: primitive
                .inheritances
                .into_iter()
                .map(|parent| self.resolved.inheritances.resolved(parent))
                .collect(),
            descendants: self.ontology.descendants(id).to_vec(),
            invariants: primitive.invariants,
            description: primitive.description.map(|d| self.description(d)),
            span: primitive.span,
        }
    }

    fn enumeration(&self, enumeration: PendingEnumeration) -> Enumeration {
        Enumeration {
            name: enumeration.name,
            literals: enumeration
                .literals
                .into_iter()
                .map(|literal| EnumerationLiteral {
                    name: literal.name,
                    value: literal.value,
                    description: literal.description.map(|d| self.description(d)),
                    span: literal.span,
                })
                .collect(),
            is_superset_of: enumeration
                .is_superset_of
                .into_iter()
                .map(|subset| self.resolved.supersets.resolved(subset))
                .collect(),
            description: enumeration.description.map(|d| self.description(d)),
            span: enumeration.span,
        }
    }

    fn interface(&self, interface: PendingInterface) -> Interface {
        Interface {
            name: interface.name,
            base: interface.base,
            inheritances: interface
                .inheritances
                .into_iter()
                .map(|parent| self.resolved.implemented_interfaces.resolved(parent))
                .collect(),
        }
    }

    fn property(&self, property: PendingProperty) -> Property {
        Property {
            name: property.name,
            type_annotation: self.type_annotation(property.type_annotation),
            description: property.description.map(|d| self.description(d)),
            specified_for: self.resolved.declaring_symbols.resolved(property.specified_for),
            is_implementation_specific: property.is_implementation_specific,
            span: property.span,
        }
    }

    fn method(&self, method: PendingMethod) -> Method {
        Method {
            name: method.name,
            arguments: self.arguments(method.arguments),
            returns: method.returns.map(|returns| self.type_annotation(returns)),
            description: method.description.map(|d| self.description(d)),
            contracts: method.contracts,
            specified_for: self.resolved.declaring_symbols.resolved(method.specified_for),
            is_implementation_specific: method.is_implementation_specific,
            span: method.span,
        }
    }

    fn constructor(&self, constructor: PendingConstructor) -> Constructor {
        Constructor {
            arguments: self.arguments(constructor.arguments),
            statements: constructor.statements,
            description: constructor.description.map(|d| self.description(d)),
            contracts: constructor.contracts,
            is_implementation_specific: constructor.is_implementation_specific,
            span: constructor.span,
        }
    }

    fn verification(&self, function: PendingVerification) -> Verification {
        Verification {
            name: function.name,
            arguments: self.arguments(function.arguments),
            returns: function.returns.map(|returns| self.type_annotation(returns)),
            description: function.description.map(|d| self.description(d)),
            contracts: function.contracts,
            kind: function.kind,
            span: function.span,
        }
    }

    fn arguments(&self, arguments: Vec<PendingArgument>) -> Vec<Argument> {
        arguments
            .into_iter()
            .map(|argument| Argument {
                name: argument.name,
                type_annotation: self.type_annotation(argument.type_annotation),
                default: argument
                    .default
                    .map(|default| self.resolved.argument_defaults.resolved(default)),
                span: argument.span,
            })
            .collect()
    }

    fn type_annotation(&self, annotation: PendingTypeAnnotation) -> TypeAnnotation {
        match annotation {
            PendingTypeAnnotation::Primitive(primitive) => TypeAnnotation::Primitive(primitive),
            PendingTypeAnnotation::Our(name) => {
                TypeAnnotation::Our(self.resolved.type_names.resolved(name))
            }
            PendingTypeAnnotation::List(items) => {
                TypeAnnotation::List(Box::new(self.type_annotation(*items)))
            }
            PendingTypeAnnotation::Optional(value) => {
                TypeAnnotation::Optional(Box::new(self.type_annotation(*value)))
            }
            PendingTypeAnnotation::Ref(value) => {
                TypeAnnotation::Ref(Box::new(self.type_annotation(*value)))
            }
        }
    }

    fn description(&self, description: PendingDescription) -> Description {
        let references = description
            .references
            .into_iter()
            .map(|reference| DescriptionReference {
                target: match reference.target {
                    PendingTarget::Symbol(symbol) => {
                        ReferenceTarget::Symbol(self.resolved.symbol_references.resolved(symbol))
                    }
                    PendingTarget::Attribute(attribute) => {
                        self.resolved.attribute_references.resolved(attribute)
                    }
                    PendingTarget::Argument(name) => ReferenceTarget::Argument(name),
                },
                span: reference.span,
            })
            .collect();

        Description {
            text: description.text,
            span: description.span,
            references,
        }
    }
}
