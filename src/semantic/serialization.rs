//! Propagation of the serialization settings through the ontology.
//!
//! The only setting is ``with_model_type``: whether the serialized form of
//! an instance carries its concrete type as a discriminator. A class
//! inherits the setting of its parents and may declare it itself; all
//! these sources have to agree.
//!
//! An explicit ``with_model_type(false)`` counts as a declared setting, so
//! it conflicts with a parent that declares ``true``. Leaving the setting
//! out does not.

use crate::diag::Diag;
use crate::parsed::{PrimitiveType, SymbolId, SymbolTable};
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use crate::semantic::ontology::Ontology;

/// A resolved setting together with the class that declared it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SettingWithSource {
    value: bool,
    source: SymbolId,
}

/// The resolved ``with_model_type`` of every class, by symbol.
#[derive(Debug, Clone, Default)]
pub struct Serializations {
    with_model_type: Vec<bool>,
}

impl Serializations {
    /// The resolved setting; `false` unless some ancestor or the class
    /// itself declared otherwise.
    pub fn with_model_type(&self, id: SymbolId) -> bool {
        self.with_model_type
            .get(id.as_usize())
            .copied()
            .unwrap_or_default()
    }
}

/// Resolves the settings in ontology order and stops at the first
/// inconsistency.
pub fn resolve_serializations(table: &SymbolTable, ontology: &Ontology) -> Result<Serializations, Diag> {
    let mut resolved: Vec<Option<SettingWithSource>> = vec![None; table.len()];

    for &id in ontology.classes() {
        let Some(class) = table.class(id) else {
            continue;
        };

        if class
            .inheritances
            .iter()
            .any(|parent| PrimitiveType::from_name(parent).is_some())
        {
            // Serialized as the underlying primitive; nothing to steer.
            continue;
        }

        let mut settings = Vec::new();
        if let Some(value) = class.serialization.with_model_type {
            settings.push(SettingWithSource { value, source: id });
        }
        for parent in &class.inheritances {
            let Some(parent_id) = table.find(parent) else {
                continue;
            };
            if let Some(setting) = resolved[parent_id.as_usize()] {
                settings.push(setting);
            }
        }

        let Some(&first) = settings.first() else {
            continue;
        };

        if let Some(conflicting) = settings[1..].iter().find(|setting| setting.value != first.value) {
            return Err(SemanticDiagBuilder::at(
                SemanticDiagKind::InconsistentSerialization,
                class.span.clone(),
                format!(
                    "The serialization setting ``with_model_type`` between the class {} \
                     and {} is inconsistent",
                    table.get(conflicting.source).name(),
                    table.get(first.source).name()
                ),
            )
            .build());
        }

        resolved[id.as_usize()] = Some(first);
    }

    Ok(Serializations {
        with_model_type: resolved
            .into_iter()
            .map(|setting| setting.is_some_and(|setting| setting.value))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed::{Class, Symbol};

    fn resolve(classes: Vec<Class>) -> (SymbolTable, Result<Serializations, Diag>) {
        let table =
            SymbolTable::new(classes.into_iter().map(Symbol::Class).collect(), "Something").unwrap();
        let ontology = Ontology::build(&table).unwrap();
        let result = resolve_serializations(&table, &ontology);
        (table, result)
    }

    #[test]
    fn setting_is_inherited_by_descendants() {
        let (table, result) = resolve(vec![
            Class::abstract_class("Abstract").with_model_type(true),
            Class::abstract_class("Middle").with_parent("Abstract"),
            Class::concrete("Something").with_parent("Middle"),
            Class::concrete("Unrelated"),
        ]);
        let serializations = result.unwrap();

        assert!(serializations.with_model_type(table.find("Something").unwrap()));
        assert!(!serializations.with_model_type(table.find("Unrelated").unwrap()));
    }

    #[test]
    fn conflict_with_a_parent_fails_immediately() {
        let (_, result) = resolve(vec![
            Class::abstract_class("Abstract").with_model_type(true),
            Class::concrete("Something")
                .with_parent("Abstract")
                .with_model_type(false),
        ]);

        assert_eq!(
            result.unwrap_err().message,
            "The serialization setting ``with_model_type`` between the class Abstract \
             and Something is inconsistent"
        );
    }

    #[test]
    fn conflict_between_parents_names_both() {
        let (_, result) = resolve(vec![
            Class::abstract_class("Left").with_model_type(true),
            Class::abstract_class("Right").with_model_type(false),
            Class::concrete("Something").with_parent("Left").with_parent("Right"),
        ]);

        assert_eq!(
            result.unwrap_err().message,
            "The serialization setting ``with_model_type`` between the class Right \
             and Left is inconsistent"
        );
    }

    #[test]
    fn constrained_primitives_are_skipped() {
        let (table, result) = resolve(vec![
            Class::concrete("Non_empty_string").with_parent("str"),
            Class::concrete("Something"),
        ]);
        assert!(!result
            .unwrap()
            .with_model_type(table.find("Non_empty_string").unwrap()));
    }
}
