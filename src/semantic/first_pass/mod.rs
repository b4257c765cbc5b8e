//! First pass of the translation: everything but the name lookups.
//!
//! The pass builds a node for every symbol of the parsed table, stacks the
//! members of the ancestors into each class, allocates the interfaces and
//! attaches the inlined constructors and the resolved serialization
//! settings. Every name that refers to another symbol is registered as a
//! placeholder instead of being looked up; the resolver takes it from
//! there.
//!
//! Members are translated once, for the class that declares them, and the
//! stacked copies in the descendants share the placeholders of the
//! original. A dangling reference in an inherited description is hence
//! reported once, not once per descendant.
//!
//! Verification functions are translated alongside, in the order they were
//! parsed, with the kind the pattern understanding assigned to them.

mod nodes;

pub use nodes::*;

use crate::ast::{Identifier, Spanned};
use crate::diag::Diag;
use crate::ir::{InterfaceId, Invariant, Serialization, SymbolId, VerificationKind};
use crate::lexer::{scan_references, ReferenceRole};
use crate::parsed::{self, PrimitiveType, TypeAnnotationKind};
use crate::semantic::constrained_primitives::Constrainees;
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use crate::semantic::inlining::InlinedConstructors;
use crate::semantic::ontology::Ontology;
use crate::semantic::placeholder::Pending;
use crate::semantic::serialization::Serializations;

/// Output of the first pass.
#[derive(Debug)]
pub struct FirstPass {
    /// Nodes indexed by [`SymbolId`].
    pub symbols: Vec<PendingSymbol>,

    /// Interfaces indexed by [`InterfaceId`], parents before children.
    pub interfaces: Vec<PendingInterface>,

    /// Classes and constrained primitives, parents before children.
    pub topologically_sorted: Vec<SymbolId>,

    pub ref_association: Pending<Association>,
    pub description: Option<PendingDescription>,
    pub verification_functions: Vec<PendingVerification>,
    pub registries: Registries,
}

impl FirstPass {
    pub fn class(&self, id: SymbolId) -> Option<&PendingClass> {
        match self.symbols.get(id.as_usize()) {
            Some(PendingSymbol::Class(class)) => Some(class),
            _ => None,
        }
    }
}

/// What the earlier stages determined about the parsed symbols.
#[derive(Debug, Clone, Copy)]
pub struct Prerequisites<'a> {
    pub ontology: &'a Ontology,
    pub constrainees: &'a Constrainees,
    pub serializations: &'a Serializations,
    pub constructors: &'a InlinedConstructors,

    /// Kinds of the verification functions, in the order of the table.
    pub verifications: &'a [VerificationKind],
}

/// Runs the first pass.
///
/// Fails only on type annotations that cannot be translated; all of them
/// are reported.
#[tracing::instrument(skip_all)]
pub fn run(table: &parsed::SymbolTable, prerequisites: Prerequisites<'_>) -> Result<FirstPass, Vec<Diag>> {
    let Prerequisites {
        ontology,
        constrainees,
        serializations,
        constructors,
        verifications,
    } = prerequisites;

    let mut builder = Builder {
        registries: Registries::default(),
        errors: Vec::new(),
    };

    let mut own: Vec<OwnMembers> = vec![OwnMembers::default(); table.len()];
    for &id in ontology.classes() {
        if let Some(class) = table.class(id) {
            own[id.as_usize()] = builder.own_members(id, class);
        }
    }

    let mut interface_of: Vec<Option<InterfaceId>> = vec![None; table.len()];
    let mut interface_count = 0;
    for &id in ontology.classes() {
        let Some(class) = table.class(id) else {
            continue;
        };
        if constrainees.contains(id) {
            continue;
        }
        if class.is_abstract() || !ontology.descendants(id).is_empty() {
            interface_of[id.as_usize()] = Some(InterfaceId::new(interface_count));
            interface_count += 1;
        }
    }

    let mut symbols = Vec::with_capacity(table.len());
    for (id, symbol) in table.symbols() {
        let pending = match symbol {
            parsed::Symbol::Enumeration(enumeration) => {
                PendingSymbol::Enumeration(builder.enumeration(id, enumeration))
            }
            parsed::Symbol::Class(class) => {
                let stacked = stack(ontology, &own, id);
                match constrainees.get(id) {
                    Some(constrainee) => {
                        PendingSymbol::ConstrainedPrimitive(PendingConstrainedPrimitive {
                            name: class.name.clone(),
                            constrainee,
                            inheritances: class
                                .inheritances
                                .iter()
                                .filter(|parent| PrimitiveType::from_name(parent).is_none())
                                .map(|parent| builder.register_inheritance(id, parent))
                                .collect(),
                            invariants: stacked.invariants,
                            description: builder.description(class.description.as_ref(), Some(id)),
                            span: class.span.clone(),
                        })
                    }
                    None => PendingSymbol::Class(builder.class(
                        id,
                        class,
                        stacked,
                        interface_of[id.as_usize()],
                        Serialization {
                            with_model_type: serializations.with_model_type(id),
                        },
                        constructors,
                    )),
                }
            }
        };
        symbols.push(pending);
    }

    let interfaces: Vec<PendingInterface> = ontology
        .classes()
        .iter()
        .filter_map(|&id| match &symbols[id.as_usize()] {
            PendingSymbol::Class(class) if class.interface.is_some() => Some(PendingInterface {
                name: class.name.clone(),
                base: id,
                inheritances: class.interfaces.clone(),
            }),
            _ => None,
        })
        .collect();
    debug_assert_eq!(interfaces.len(), interface_count);

    let ref_association = builder
        .registries
        .associations
        .register(table.ref_association().clone());
    let description = builder.description(table.description(), None);

    let verification_functions = table
        .verification_functions()
        .iter()
        .zip(verifications)
        .filter_map(|(function, kind)| builder.verification(function, kind.clone()))
        .collect::<Vec<_>>();

    if !builder.errors.is_empty() {
        return Err(builder.errors);
    }

    tracing::debug!(
        symbols = symbols.len(),
        interfaces = interfaces.len(),
        verification_functions = verification_functions.len(),
        placeholders = builder.registries.len(),
        "first pass done"
    );

    Ok(FirstPass {
        symbols,
        interfaces,
        topologically_sorted: ontology.classes().to_vec(),
        ref_association,
        description,
        verification_functions,
        registries: builder.registries,
    })
}

/// Members a class declares itself.
#[derive(Debug, Clone, Default)]
struct OwnMembers {
    properties: Vec<PendingProperty>,
    methods: Vec<PendingMethod>,
    invariants: Vec<Invariant>,
}

/// Members of the antecedents first, then the own ones.
fn stack(ontology: &Ontology, own: &[OwnMembers], id: SymbolId) -> OwnMembers {
    let mut stacked = OwnMembers::default();
    for source in ontology.antecedents(id).into_iter().chain([id]) {
        let members = &own[source.as_usize()];
        stacked.properties.extend(members.properties.iter().cloned());
        stacked.methods.extend(members.methods.iter().cloned());
        stacked.invariants.extend(members.invariants.iter().cloned());
    }
    stacked
}

struct Builder {
    registries: Registries,
    errors: Vec<Diag>,
}

impl Builder {
    fn own_members(&mut self, id: SymbolId, class: &parsed::Class) -> OwnMembers {
        let mut members = OwnMembers::default();

        for property in &class.properties {
            let Some(type_annotation) = self.type_annotation(&property.type_annotation) else {
                continue;
            };
            members.properties.push(PendingProperty {
                name: property.name.clone(),
                type_annotation,
                description: self.description(property.description.as_ref(), Some(id)),
                specified_for: self.registries.declaring_symbols.register(class.name.clone()),
                is_implementation_specific: property.is_implementation_specific,
                span: property.span.clone(),
            });
        }

        for method in &class.methods {
            let returns = match &method.returns {
                Some(returns) => match self.type_annotation(returns) {
                    Some(returns) => Some(returns),
                    None => continue,
                },
                None => None,
            };
            members.methods.push(PendingMethod {
                name: method.name.clone(),
                arguments: self.arguments(&method.arguments),
                returns,
                description: self.description(method.description.as_ref(), Some(id)),
                contracts: method.contracts.clone(),
                specified_for: self.registries.declaring_symbols.register(class.name.clone()),
                is_implementation_specific: method.is_implementation_specific,
                span: method.span.clone(),
            });
        }

        members.invariants = class
            .invariants
            .iter()
            .map(|invariant| Invariant {
                description: invariant.description.clone(),
                body: invariant.body.clone(),
                specified_for: id,
                span: invariant.span.clone(),
            })
            .collect();

        members
    }

    fn class(
        &mut self,
        id: SymbolId,
        class: &parsed::Class,
        stacked: OwnMembers,
        interface: Option<InterfaceId>,
        serialization: Serialization,
        constructors: &InlinedConstructors,
    ) -> PendingClass {
        let inheritances = class
            .inheritances
            .iter()
            .map(|parent| self.register_inheritance(id, parent))
            .collect();
        let interfaces = class
            .inheritances
            .iter()
            .map(|parent| {
                self.registries.implemented_interfaces.register(ParentRequest {
                    class: id,
                    parent: parent.clone(),
                })
            })
            .collect();

        let constructor = match &class.constructor {
            Some(constructor) => PendingConstructor {
                arguments: self.arguments(&constructor.arguments),
                statements: constructors.statements(id).to_vec(),
                description: self.description(constructor.description.as_ref(), Some(id)),
                contracts: constructor.contracts.clone(),
                is_implementation_specific: constructor.is_implementation_specific,
                span: Some(constructor.span.clone()),
            },
            None => PendingConstructor::default(),
        };

        PendingClass {
            name: class.name.clone(),
            kind: class.kind,
            inheritances,
            interface,
            interfaces,
            properties: stacked.properties,
            methods: stacked.methods,
            constructor,
            invariants: stacked.invariants,
            serialization,
            description: self.description(class.description.as_ref(), Some(id)),
            span: class.span.clone(),
        }
    }

    fn enumeration(&mut self, id: SymbolId, enumeration: &parsed::Enumeration) -> PendingEnumeration {
        let mut literals = Vec::with_capacity(enumeration.literals.len());
        for literal in &enumeration.literals {
            literals.push(PendingLiteral {
                name: literal.name.clone(),
                value: literal.value.clone(),
                description: self.description(literal.description.as_ref(), Some(id)),
                span: literal.span.clone(),
            });
        }

        let is_superset_of = enumeration
            .is_superset_of
            .iter()
            .map(|subset| {
                self.registries.supersets.register(SupersetRequest {
                    enumeration: id,
                    subset: subset.clone(),
                })
            })
            .collect();

        PendingEnumeration {
            name: enumeration.name.clone(),
            literals,
            is_superset_of,
            description: self.description(enumeration.description.as_ref(), Some(id)),
            span: enumeration.span.clone(),
        }
    }

    fn register_inheritance(&mut self, id: SymbolId, parent: &Identifier) -> Pending<Inheritance> {
        self.registries.inheritances.register(ParentRequest {
            class: id,
            parent: parent.clone(),
        })
    }

    /// Arguments without the instance argument.
    fn arguments(&mut self, arguments: &[parsed::Argument]) -> Vec<PendingArgument> {
        arguments
            .iter()
            .filter(|argument| {
                !matches!(argument.type_annotation.node, TypeAnnotationKind::SelfType)
            })
            .filter_map(|argument| self.argument(argument))
            .collect()
    }

    fn argument(&mut self, argument: &parsed::Argument) -> Option<PendingArgument> {
        let type_annotation = self.type_annotation(&argument.type_annotation)?;
        let default = argument
            .default
            .clone()
            .map(|default| self.registries.argument_defaults.register(default));
        Some(PendingArgument {
            name: argument.name.clone(),
            type_annotation,
            default,
            span: argument.span.clone(),
        })
    }

    /// Functions have no instance argument, so ``Self`` is reported for
    /// every argument annotated with it.
    fn verification(
        &mut self,
        function: &parsed::Function,
        kind: VerificationKind,
    ) -> Option<PendingVerification> {
        let returns = match &function.returns {
            Some(returns) => Some(self.type_annotation(returns)?),
            None => None,
        };
        let arguments = function
            .arguments
            .iter()
            .filter_map(|argument| self.argument(argument))
            .collect();

        Some(PendingVerification {
            name: function.name.clone(),
            arguments,
            returns,
            description: self.description(function.description.as_ref(), None),
            contracts: function.contracts.clone(),
            kind,
            span: function.span.clone(),
        })
    }

    fn type_annotation(&mut self, annotation: &parsed::TypeAnnotation) -> Option<PendingTypeAnnotation> {
        let translated = match &annotation.node {
            TypeAnnotationKind::Atomic(name) => match PrimitiveType::from_name(name) {
                Some(primitive) => PendingTypeAnnotation::Primitive(primitive),
                None => PendingTypeAnnotation::Our(
                    self.registries
                        .type_names
                        .register(Spanned::new(name.clone(), annotation.span.clone())),
                ),
            },
            TypeAnnotationKind::List(items) => {
                PendingTypeAnnotation::List(Box::new(self.type_annotation(items)?))
            }
            TypeAnnotationKind::Optional(value) => {
                PendingTypeAnnotation::Optional(Box::new(self.type_annotation(value)?))
            }
            TypeAnnotationKind::Ref(value) => {
                PendingTypeAnnotation::Ref(Box::new(self.type_annotation(value)?))
            }
            TypeAnnotationKind::SelfType => {
                self.errors.push(
                    SemanticDiagBuilder::at(
                        SemanticDiagKind::InvalidTypeAnnotation,
                        annotation.span.clone(),
                        "The type annotation ``Self`` is only expected for the instance \
                         argument of a method or a constructor",
                    )
                    .build(),
                );
                return None;
            }
        };
        Some(translated)
    }

    fn description(
        &mut self,
        description: Option<&parsed::Description>,
        owner: Option<SymbolId>,
    ) -> Option<PendingDescription> {
        let description = description?;

        let mut references = Vec::new();
        for reference in scan_references(&description.text, description.span.start) {
            let raw = RawReference {
                target: reference.target,
                owner,
                span: reference.span.clone(),
            };
            let target = match reference.role {
                ReferenceRole::Symbol => {
                    PendingTarget::Symbol(self.registries.symbol_references.register(raw))
                }
                ReferenceRole::Attribute => {
                    PendingTarget::Attribute(self.registries.attribute_references.register(raw))
                }
                ReferenceRole::Argument => PendingTarget::Argument(Identifier::new(&raw.target)),
            };
            references.push(PendingReference {
                target,
                span: reference.span,
            });
        }

        Some(PendingDescription {
            text: description.text.clone(),
            span: description.span.clone(),
            references,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::ir::Contracts;
    use crate::parsed::{
        Argument, Class, Constructor, Description, Enumeration, Function, Method, Property,
        Symbol, SymbolTable, TypeAnnotation,
    };
    use crate::semantic::constrained_primitives::determine_constrained_primitives;
    use crate::semantic::construction::understand_all;
    use crate::semantic::inlining::inline_constructors;
    use crate::semantic::pattern_verification::understand_verification_functions;
    use crate::semantic::serialization::resolve_serializations;

    fn first_pass(table: &SymbolTable) -> Result<FirstPass, Vec<Diag>> {
        let ontology = Ontology::build(table).unwrap();
        let constrainees = determine_constrained_primitives(table, &ontology).unwrap();
        let serializations = resolve_serializations(table, &ontology).unwrap();
        let constructors = inline_constructors(&ontology, &understand_all(table).unwrap());
        let verifications = understand_verification_functions(table).unwrap();
        run(
            table,
            Prerequisites {
                ontology: &ontology,
                constrainees: &constrainees,
                serializations: &serializations,
                constructors: &constructors,
                verifications: &verifications,
            },
        )
    }

    fn table(symbols: Vec<Symbol>) -> SymbolTable {
        let mut symbols = symbols;
        symbols.push(Symbol::Class(Class::concrete("Reference")));
        SymbolTable::new(symbols, "Reference").unwrap()
    }

    #[test]
    fn inherited_properties_come_first_and_share_placeholders() {
        let table = table(vec![
            Symbol::Class(
                Class::abstract_class("Parent")
                    .with_property(Property::new("x", TypeAnnotation::atomic("Kind"))),
            ),
            Symbol::Class(
                Class::concrete("Child")
                    .with_parent("Parent")
                    .with_property(Property::new("y", TypeAnnotation::atomic("int"))),
            ),
            Symbol::Enumeration(Enumeration::new("Kind")),
        ]);
        let first = first_pass(&table).unwrap();

        let parent = first.class(table.find("Parent").unwrap()).unwrap();
        let child = first.class(table.find("Child").unwrap()).unwrap();
        let names: Vec<_> = child.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(child.properties[0], parent.properties[0]);
        assert_eq!(first.registries.type_names.len(), 1);
    }

    #[test]
    fn interfaces_exist_for_abstract_classes_and_classes_with_descendants() {
        let table = table(vec![
            Symbol::Class(Class::abstract_class("Abstract")),
            Symbol::Class(Class::concrete("Middle").with_parent("Abstract")),
            Symbol::Class(Class::concrete("Leaf").with_parent("Middle")),
        ]);
        let first = first_pass(&table).unwrap();

        let names: Vec<_> = first.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Abstract", "Middle"]);
        assert!(first.class(table.find("Leaf").unwrap()).unwrap().interface.is_none());
        assert_eq!(
            first.class(table.find("Leaf").unwrap()).unwrap().interfaces.len(),
            1
        );
    }

    #[test]
    fn instance_argument_is_dropped() {
        let table = table(vec![Symbol::Class(
            Class::concrete("Something")
                .with_property(Property::new("x", TypeAnnotation::atomic("int")))
                .with_constructor(
                    Constructor::new()
                        .with_argument(Argument::new("x", TypeAnnotation::atomic("int"))),
                )
                .with_method(Method::new("check")),
        )]);
        let first = first_pass(&table).unwrap();
        let class = first.class(table.find("Something").unwrap()).unwrap();

        assert_eq!(class.constructor.arguments.len(), 1);
        assert_eq!(class.constructor.arguments[0].name, "x");
        assert!(class.methods[0].arguments.is_empty());
    }

    #[test]
    fn self_type_outside_of_the_instance_argument_is_rejected() {
        let table = table(vec![Symbol::Class(
            Class::concrete("Something")
                .with_property(Property::new("me", TypeAnnotation::self_type())),
        )]);
        let errors = first_pass(&table).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("``Self``"));
    }

    #[test]
    fn description_references_become_placeholders() {
        let table = table(vec![Symbol::Class(
            Class::concrete("Something").with_description(Description::new(
                "See :class:`.Reference`, :attr:`x` and :paramref:`y`.",
            )),
        )]);
        let first = first_pass(&table).unwrap();
        let class = first.class(table.find("Something").unwrap()).unwrap();
        let description = class.description.as_ref().unwrap();

        assert_eq!(description.references.len(), 3);
        assert!(matches!(description.references[0].target, PendingTarget::Symbol(_)));
        assert!(matches!(description.references[1].target, PendingTarget::Attribute(_)));
        assert_eq!(
            description.references[2].target,
            PendingTarget::Argument(Identifier::new("y"))
        );
        assert_eq!(first.registries.symbol_references.requests()[0].target, ".Reference");
    }

    #[test]
    fn self_type_in_a_verification_function_is_rejected() {
        let table = table(vec![])
            .with_verification_function(
                Function::implementation_specific("is_me")
                    .with_argument(Argument::new("me", TypeAnnotation::self_type()))
                    .with_returns(TypeAnnotation::atomic("bool")),
            );
        let errors = first_pass(&table).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("``Self``"));
    }

    #[test]
    fn contracts_are_kept_on_methods() {
        let contracts = Contracts::default().with_precondition(crate::parsed::Contract::new(
            &["x"],
            Expr::opaque("x > 0", 0..0),
        ));
        let table = table(vec![Symbol::Class(
            Class::concrete("Something").with_method(
                Method::new("check")
                    .with_argument(Argument::new("x", TypeAnnotation::atomic("int")))
                    .with_contracts(contracts.clone()),
            ),
        )]);
        let first = first_pass(&table).unwrap();
        let class = first.class(table.find("Something").unwrap()).unwrap();

        assert_eq!(class.methods[0].contracts, contracts);
    }
}
