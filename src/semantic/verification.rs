//! Checks on the finished symbol table.
//!
//! These run after finalization and inspect the IR only. Each check
//! reports every violation it finds; none of them stops the others.
//!
//! The contract check resolves the bare function names called in
//! invariants and contracts against the verification functions.

use crate::ast::{Expr, ExprKind, Identifier, Span};
use crate::diag::Diag;
use crate::ir::{Class, ConstructorDefault, Contracts, Description, SymbolId, SymbolTable};
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use std::collections::HashSet;

/// Every class that appears as a property value type and has concrete
/// descendants must serialize with its model type, and so must every
/// concrete implementer of its interface. Otherwise the value could not be
/// told apart from the other candidates when de-serializing.
///
/// The classes are visited in topological order. An implementer of several
/// such interfaces is reported once, for the first of them.
pub fn verify_discriminators(table: &SymbolTable) -> Vec<Diag> {
    let mut used: HashSet<SymbolId> = HashSet::new();
    for (_, class) in table.classes() {
        for property in &class.properties {
            used.extend(property.type_annotation.value_symbols());
        }
    }

    let implementers = table.map_interface_implementers();
    let mut reported: HashSet<SymbolId> = HashSet::new();
    let mut errors = Vec::new();

    for &id in table.topologically_sorted() {
        if !used.contains(&id) {
            continue;
        }
        let Some(class) = table.class(id) else {
            continue;
        };

        if !class.concrete_descendants.is_empty() && !class.serialization.with_model_type {
            let descendants = class
                .concrete_descendants
                .iter()
                .map(|&descendant| format!("'{}'", table.get(descendant).name()))
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(
                SemanticDiagBuilder::missing_base_discriminator(
                    &class.name,
                    &descendants,
                    class.span.clone(),
                )
                .build(),
            );
        }

        let Some(concrete) = class
            .interface
            .and_then(|interface| implementers.get(&interface))
        else {
            continue;
        };

        for &implementer in concrete {
            let Some(implementing) = table.class(implementer) else {
                continue;
            };
            if implementing.serialization.with_model_type || !reported.insert(implementer) {
                continue;
            }

            errors.push(
                SemanticDiagBuilder::missing_discriminator(
                    &implementing.name,
                    &class.name,
                    implementing.span.clone(),
                )
                .build(),
            );
        }
    }

    tracing::trace!(errors = errors.len(), "verified the discriminators");
    errors
}

/// Every mandatory property of a concrete class must be assigned by the
/// constructor: from a mandatory argument, or from an optional one with a
/// fallback.
///
/// Classes with an implementation-specific constructor are skipped.
pub fn verify_property_initialization(table: &SymbolTable) -> Vec<Diag> {
    let mut errors = Vec::new();

    for (_, class) in table.classes() {
        if class.is_abstract() || class.constructor.is_implementation_specific {
            continue;
        }

        for property in &class.properties {
            if property.type_annotation.is_optional() || is_initialized(class, &property.name) {
                continue;
            }

            errors.push(
                SemanticDiagBuilder::at(
                    SemanticDiagKind::UninitializedProperty,
                    property.span.clone(),
                    format!(
                        "The property '{}' is not properly initialized in the constructor \
                         of the class '{}'.",
                        property.name, class.name
                    ),
                )
                .build(),
            );
        }
    }

    errors
}

fn is_initialized(class: &Class, property: &str) -> bool {
    class
        .constructor
        .statements
        .iter()
        .filter(|statement| statement.name == property)
        .any(|statement| {
            let mandatory_argument = class
                .constructor
                .argument(&statement.argument)
                .is_some_and(|argument| !argument.type_annotation.is_optional());

            mandatory_argument
                || matches!(
                    statement.default,
                    Some(ConstructorDefault::EmptyList | ConstructorDefault::EnumerationLiteral { .. })
                )
        })
}

/// Every ``:paramref:`` in the description of a method, a constructor or
/// a verification function must name one of its arguments.
///
/// Inherited methods are checked only in the class that declares them.
pub fn verify_argument_references(table: &SymbolTable) -> Vec<Diag> {
    let mut errors = Vec::new();

    for (id, class) in table.classes() {
        for method in class.methods.iter().filter(|method| method.specified_for == id) {
            check_argument_references(
                &mut errors,
                &method.name,
                method.description.as_ref(),
                |name| method.argument(name).is_some(),
            );
        }

        let constructor = &class.constructor;
        check_argument_references(
            &mut errors,
            "__init__",
            constructor.description.as_ref(),
            |name| constructor.argument(name).is_some(),
        );
    }

    for function in table.verification_functions() {
        check_argument_references(
            &mut errors,
            &function.name,
            function.description.as_ref(),
            |name| function.argument(name).is_some(),
        );
    }

    errors
}

fn check_argument_references(
    errors: &mut Vec<Diag>,
    signature: &str,
    description: Option<&Description>,
    has_argument: impl Fn(&str) -> bool,
) {
    let Some(description) = description else {
        return;
    };

    for (argument, span) in description.argument_references() {
        if has_argument(argument) {
            continue;
        }
        errors.push(
            SemanticDiagBuilder::at(
                SemanticDiagKind::InvalidArgumentReference,
                span.clone(),
                format!(
                    "The argument referenced in the docstring is not an argument \
                     of '{signature}': '{argument}'"
                ),
            )
            .build(),
        );
    }
}

/// Invariants and contracts may only call the verification functions and
/// ``len``, each with as many arguments as it expects. Contracts may only
/// depend on the arguments of their signature; postconditions may also
/// depend on ``result`` and, given snapshots, on ``OLD``.
///
/// Inherited invariants and methods are checked only where declared.
pub fn verify_contracts(table: &SymbolTable) -> Vec<Diag> {
    let mut checker = ContractChecker {
        table,
        errors: Vec::new(),
    };

    for (id, class) in table.classes() {
        for invariant in class.invariants.iter().filter(|i| i.specified_for == id) {
            checker.check_calls(&invariant.body);
        }

        for method in class.methods.iter().filter(|method| method.specified_for == id) {
            checker.check_contracts(&method.name, &method.contracts, |name| {
                name == "self" || method.argument(name).is_some()
            });
        }

        let constructor = &class.constructor;
        checker.check_contracts("__init__", &constructor.contracts, |name| {
            name == "self" || constructor.argument(name).is_some()
        });
    }

    for (id, primitive) in table.constrained_primitives() {
        for invariant in primitive.invariants.iter().filter(|i| i.specified_for == id) {
            checker.check_calls(&invariant.body);
        }
    }

    for function in table.verification_functions() {
        checker.check_contracts(&function.name, &function.contracts, |name| {
            function.argument(name).is_some()
        });
    }

    tracing::trace!(errors = checker.errors.len(), "verified the contracts");
    checker.errors
}

struct ContractChecker<'a> {
    table: &'a SymbolTable,
    errors: Vec<Diag>,
}

impl ContractChecker<'_> {
    fn check_contracts(
        &mut self,
        signature: &str,
        contracts: &Contracts,
        has_argument: impl Fn(&str) -> bool,
    ) {
        let has_snapshots = !contracts.snapshots.is_empty();

        for precondition in &contracts.preconditions {
            self.check_args(signature, &precondition.args, &precondition.span, |arg| {
                has_argument(arg)
            });
            self.check_calls(&precondition.body);
        }

        for snapshot in &contracts.snapshots {
            self.check_args(signature, &snapshot.args, &snapshot.span, |arg| {
                has_argument(arg)
            });
            self.check_calls(&snapshot.body);
        }

        for postcondition in &contracts.postconditions {
            self.check_args(signature, &postcondition.args, &postcondition.span, |arg| {
                arg == "result" || (arg == "OLD" && has_snapshots) || has_argument(arg)
            });
            self.check_calls(&postcondition.body);
        }
    }

    fn check_args(
        &mut self,
        signature: &str,
        args: &[Identifier],
        span: &Span,
        is_known: impl Fn(&str) -> bool,
    ) {
        for arg in args.iter().filter(|arg| !is_known(arg)) {
            self.errors.push(
                SemanticDiagBuilder::at(
                    SemanticDiagKind::InvalidContract,
                    span.clone(),
                    format!(
                        "The contract depends on an argument that is not available \
                         in '{signature}': '{arg}'"
                    ),
                )
                .build(),
            );
        }
    }

    fn check_calls(&mut self, body: &Expr) {
        let mut calls = Vec::new();
        body.walk(&mut |expr| {
            if let ExprKind::Call {
                func,
                args,
                keywords,
            } = &expr.node
            {
                if let ExprKind::Name(name) = &func.node {
                    calls.push((name, args.len() + keywords.len(), &expr.span));
                }
            }
        });

        for (name, provided, span) in calls {
            let expected = match self.table.find_verification_function(name) {
                Some(function) => function.arguments.len(),
                None if name == "len" => 1,
                None => {
                    self.errors.push(
                        SemanticDiagBuilder::at(
                            SemanticDiagKind::InvalidFunctionCall,
                            span.clone(),
                            format!("The handling of the function is not implemented: '{name}'"),
                        )
                        .build(),
                    );
                    continue;
                }
            };

            if provided != expected {
                self.errors.push(
                    SemanticDiagBuilder::at(
                        SemanticDiagKind::InvalidFunctionCall,
                        span.clone(),
                        format!(
                            "Expected exactly {expected} arguments to a function call \
                             to '{name}', but got: {provided}"
                        ),
                    )
                    .build(),
                );
            }
        }
    }
}
