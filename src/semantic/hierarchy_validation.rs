//! Cross-hierarchy checks over the sorted ontology.
//!
//! A class may not redefine a property or a method of any of its ancestors,
//! and it may not silently drop the arguments of an inherited constructor:
//! if an ancestor's constructor takes arguments beyond `self`, the class
//! must define a constructor of its own.

use crate::ast::{Identifier, Span};
use crate::diag::Diag;
use crate::parsed::{SymbolId, SymbolTable};
use crate::semantic::diag::SemanticDiagBuilder;
use crate::semantic::ontology::Ontology;
use std::collections::HashMap;

/// Runs all cross-hierarchy checks and returns every violation found.
pub fn check_hierarchy(table: &SymbolTable, ontology: &Ontology) -> Vec<Diag> {
    let mut diagnostics = Vec::new();

    check_member_conflicts(table, ontology, &mut diagnostics);
    check_inherited_constructors(table, ontology, &mut diagnostics);

    diagnostics
}

/// Where a member name was first seen among the ancestors.
struct FirstDefinition<'a> {
    ancestor: &'a Identifier,
    span: &'a Span,
}

fn check_member_conflicts(table: &SymbolTable, ontology: &Ontology, diagnostics: &mut Vec<Diag>) {
    for (id, class) in table.classes() {
        let mut observed_properties: HashMap<&Identifier, FirstDefinition<'_>> = HashMap::new();
        let mut observed_methods: HashMap<&Identifier, FirstDefinition<'_>> = HashMap::new();

        for ancestor in ancestor_classes(table, ontology, id) {
            for property in &ancestor.properties {
                observed_properties
                    .entry(&property.name)
                    .or_insert(FirstDefinition {
                        ancestor: &ancestor.name,
                        span: &property.span,
                    });
            }
            for method in &ancestor.methods {
                observed_methods.entry(&method.name).or_insert(FirstDefinition {
                    ancestor: &ancestor.name,
                    span: &method.span,
                });
            }
        }

        for property in &class.properties {
            if let Some(first) = observed_properties.get(&property.name) {
                diagnostics.push(
                    SemanticDiagBuilder::conflicting_property(
                        &property.name,
                        first.ancestor,
                        property.span.clone(),
                        first.span.clone(),
                    )
                    .build(),
                );
            }
        }

        for method in &class.methods {
            if let Some(first) = observed_methods.get(&method.name) {
                diagnostics.push(
                    SemanticDiagBuilder::conflicting_method(
                        &method.name,
                        first.ancestor,
                        method.span.clone(),
                        first.span.clone(),
                    )
                    .build(),
                );
            }
        }
    }
}

fn check_inherited_constructors(
    table: &SymbolTable,
    ontology: &Ontology,
    diagnostics: &mut Vec<Diag>,
) {
    for (id, class) in table.classes() {
        if class.constructor.is_some() {
            continue;
        }

        for ancestor_id in ontology.antecedents(id) {
            let Some(ancestor) = table.class(ancestor_id) else {
                continue;
            };
            let Some(constructor) = &ancestor.constructor else {
                continue;
            };

            if constructor.arguments.len() > 1 {
                diagnostics.push(
                    SemanticDiagBuilder::missing_constructor(
                        &class.name,
                        &ancestor.name,
                        &constructor.argument_names(),
                        class.span.clone(),
                    )
                    .build(),
                );
            }
        }
    }
}

fn ancestor_classes<'a>(
    table: &'a SymbolTable,
    ontology: &'a Ontology,
    id: SymbolId,
) -> impl Iterator<Item = &'a crate::parsed::Class> + 'a {
    ontology
        .ancestors(id)
        .iter()
        .filter_map(move |ancestor| table.class(*ancestor))
}
