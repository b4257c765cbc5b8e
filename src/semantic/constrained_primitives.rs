//! Classes that constrain a built-in type.
//!
//! A class whose single parent is a built-in type (e.g. `class
//! Non_empty_string(str)`) does not describe a structure but a restricted
//! value of that type. Descendants of such a class constrain the same
//! built-in type further.
//!
//! The initial set is the classes inheriting directly from a built-in type;
//! the extended set follows the ontology downwards from there.

use crate::diag::Diag;
use crate::parsed::{PrimitiveType, SymbolId, SymbolTable};
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use crate::semantic::ontology::Ontology;

/// The built-in type each constrained primitive constrains, by symbol.
#[derive(Debug, Clone, Default)]
pub struct Constrainees {
    by_symbol: Vec<Option<PrimitiveType>>,
}

impl Constrainees {
    /// The constrained built-in type, if the symbol is a constrained
    /// primitive.
    pub fn get(&self, id: SymbolId) -> Option<PrimitiveType> {
        self.by_symbol.get(id.as_usize()).copied().flatten()
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Determines the constrained primitives and checks their definitions.
pub fn determine_constrained_primitives(
    table: &SymbolTable,
    ontology: &Ontology,
) -> Result<Constrainees, Vec<Diag>> {
    let mut diagnostics = Vec::new();

    // Constrainee and the symbol of the initial set it stems from.
    let mut determined: Vec<Option<(PrimitiveType, SymbolId)>> = vec![None; table.len()];

    for (id, class) in table.classes() {
        let Some(primitive) = class
            .inheritances
            .iter()
            .find_map(|parent| PrimitiveType::from_name(parent))
        else {
            continue;
        };

        if class.inheritances.len() > 1 {
            diagnostics.push(
                SemanticDiagBuilder::at(
                    SemanticDiagKind::InvalidConstrainedPrimitive,
                    class.span.clone(),
                    format!(
                        "The class '{}' constrains a primitive type, but also inherits \
                         from other classes: {}. We do not know how to generate \
                         an implementation for that.",
                        class.name,
                        class.inheritances.join(", ")
                    ),
                )
                .build(),
            );
            continue;
        }

        determined[id.as_usize()] = Some((primitive, id));
    }

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let initial: Vec<bool> = determined.iter().map(Option::is_some).collect();

    for &id in ontology.classes() {
        if initial[id.as_usize()] {
            continue;
        }
        let Some(class) = table.class(id) else {
            continue;
        };

        let mut found: Option<(PrimitiveType, SymbolId)> = None;
        for parent in &class.inheritances {
            let Some(parent_id) = table.find(parent) else {
                continue;
            };
            let Some((constrainee, origin)) = determined[parent_id.as_usize()] else {
                continue;
            };

            match found {
                None => found = Some((constrainee, origin)),
                Some((other, other_origin)) if other != constrainee => {
                    diagnostics.push(
                        SemanticDiagBuilder::at(
                            SemanticDiagKind::InvalidConstrainedPrimitive,
                            class.span.clone(),
                            format!(
                                "The primitive type of the constrained primitive type '{}' \
                                 can not be resolved. The ancestor '{}' specifies '{}', \
                                 while another ancestor, '{}', specifies '{}'",
                                class.name,
                                table.get(origin).name(),
                                constrainee,
                                table.get(other_origin).name(),
                                other
                            ),
                        )
                        .build(),
                    );
                    break;
                }
                Some(_) => {}
            }
        }

        determined[id.as_usize()] = found;
    }

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    for (id, class) in table.classes() {
        let extended = determined[id.as_usize()].is_some() && !initial[id.as_usize()];
        if !extended {
            continue;
        }

        let (constrained, unexpected): (Vec<&str>, Vec<&str>) = class
            .inheritances
            .iter()
            .map(|parent| parent.as_str())
            .partition(|parent| {
                table
                    .find(parent)
                    .is_some_and(|parent_id| determined[parent_id.as_usize()].is_some())
            });

        if !unexpected.is_empty() {
            diagnostics.push(
                SemanticDiagBuilder::at(
                    SemanticDiagKind::InvalidConstrainedPrimitive,
                    class.span.clone(),
                    format!(
                        "The class {} inherits both from one or more constrained primitive \
                         types ({}), but also other classes which are not constraining \
                         primitive types ({}).",
                        class.name,
                        constrained.join(", "),
                        unexpected.join(", ")
                    ),
                )
                .build(),
            );
        }
    }

    for (id, class) in table.classes() {
        if determined[id.as_usize()].is_none() {
            continue;
        }

        let mut invalid = |message: String| {
            diagnostics.push(
                SemanticDiagBuilder::at(
                    SemanticDiagKind::InvalidConstrainedPrimitive,
                    class.span.clone(),
                    message,
                )
                .build(),
            );
        };

        if !class.properties.is_empty() || !class.methods.is_empty() {
            invalid(format!(
                "The class '{}' constrains a primitive type, but also specifies properties \
                 and/or methods. We do not know how to generate an implementation for that.",
                class.name
            ));
        }

        if class.serialization.with_model_type.is_some() {
            invalid(format!(
                "The class '{}' constrains a primitive type, but the serialization settings \
                 are set. We must serialize it as a primitive type and no custom \
                 serialization settings are possible.",
                class.name
            ));
        }

        if class.is_abstract() {
            invalid(format!(
                "The class '{}' constrains a primitive type, but it is denoted abstract. \
                 Every value that fulfills the constraints can be instantiated, so it can \
                 not be made abstract.",
                class.name
            ));
        }
    }

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let constrainees = Constrainees {
        by_symbol: determined
            .into_iter()
            .map(|entry| entry.map(|(constrainee, _)| constrainee))
            .collect(),
    };
    tracing::debug!(count = constrainees.len(), "determined constrained primitives");

    Ok(constrainees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed::{Class, Property, Symbol, TypeAnnotation};

    fn determine(classes: Vec<Class>) -> (SymbolTable, Result<Constrainees, Vec<Diag>>) {
        let table =
            SymbolTable::new(classes.into_iter().map(Symbol::Class).collect(), "Reference").unwrap();
        let ontology = Ontology::build(&table).unwrap();
        let result = determine_constrained_primitives(&table, &ontology);
        (table, result)
    }

    fn messages(result: Result<Constrainees, Vec<Diag>>) -> Vec<String> {
        result.unwrap_err().into_iter().map(|diag| diag.message).collect()
    }

    #[test]
    fn constrainee_propagates_to_descendants() {
        let (table, result) = determine(vec![
            Class::concrete("Non_empty_string").with_parent("str"),
            Class::concrete("Identifier").with_parent("Non_empty_string"),
            Class::concrete("Reference"),
        ]);
        let constrainees = result.unwrap();

        assert_eq!(
            constrainees.get(table.find("Identifier").unwrap()),
            Some(PrimitiveType::Str)
        );
        assert!(!constrainees.contains(table.find("Reference").unwrap()));
        assert_eq!(constrainees.len(), 2);
    }

    #[test]
    fn primitive_base_must_be_the_only_parent() {
        let (_, result) = determine(vec![
            Class::concrete("Reference"),
            Class::concrete("Mixed").with_parent("str").with_parent("Reference"),
        ]);
        assert_eq!(
            messages(result),
            vec![
                "The class 'Mixed' constrains a primitive type, but also inherits from other \
                 classes: str, Reference. We do not know how to generate an implementation \
                 for that."
            ]
        );
    }

    #[test]
    fn conflicting_constrainees_are_rejected() {
        let (_, result) = determine(vec![
            Class::concrete("Text").with_parent("str"),
            Class::concrete("Number").with_parent("int"),
            Class::concrete("Both").with_parent("Text").with_parent("Number"),
        ]);
        let messages = messages(result);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(
            "The primitive type of the constrained primitive type 'Both' can not be resolved."
        ));
    }

    #[test]
    fn constrained_primitive_may_not_mix_in_a_class() {
        let (_, result) = determine(vec![
            Class::concrete("Text").with_parent("str"),
            Class::concrete("Reference"),
            Class::concrete("Mixed").with_parent("Text").with_parent("Reference"),
        ]);
        assert_eq!(
            messages(result),
            vec![
                "The class Mixed inherits both from one or more constrained primitive types \
                 (Text), but also other classes which are not constraining primitive types \
                 (Reference)."
            ]
        );
    }

    #[test]
    fn constrained_primitive_restrictions_are_all_reported() {
        let (_, result) = determine(vec![Class::abstract_class("Text")
            .with_parent("str")
            .with_property(Property::new("x", TypeAnnotation::atomic("int")))
            .with_model_type(true)]);
        assert_eq!(messages(result).len(), 3);
    }
}
