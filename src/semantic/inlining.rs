//! Flattening of constructor bodies along the inheritance.

use crate::parsed::SymbolId;
use crate::semantic::construction::{AssignArgument, ConstructorTable, Statement};
use crate::semantic::ontology::Ontology;
use std::collections::HashMap;

/// Assignments of every class, parent assignments first.
#[derive(Debug, Clone, Default)]
pub struct InlinedConstructors {
    by_class: HashMap<SymbolId, Vec<AssignArgument>>,
}

impl InlinedConstructors {
    pub fn statements(&self, id: SymbolId) -> &[AssignArgument] {
        self.by_class.get(&id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Replaces every delegation with the already inlined body of the parent.
///
/// Classes are processed in ontology order, so the parent body is always
/// complete when a child refers to it.
pub fn inline_constructors(ontology: &Ontology, constructors: &ConstructorTable) -> InlinedConstructors {
    let mut by_class: HashMap<SymbolId, Vec<AssignArgument>> = HashMap::new();

    for &id in ontology.classes() {
        let mut inlined = Vec::new();

        for statement in constructors.statements(id) {
            match statement {
                Statement::CallSuperConstructor { super_class, .. } => {
                    debug_assert!(
                        by_class.contains_key(super_class),
                        "parent constructor inlined after its child"
                    );
                    if let Some(parent) = by_class.get(super_class) {
                        inlined.extend(parent.iter().cloned());
                    }
                }
                Statement::AssignArgument(assign) => inlined.push(assign.clone()),
            }
        }

        by_class.insert(id, inlined);
    }

    tracing::trace!(classes = by_class.len(), "inlined the constructors");

    InlinedConstructors { by_class }
}
