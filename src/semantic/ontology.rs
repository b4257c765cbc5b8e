//! Linearization of the class hierarchy.
//!
//! The [`Ontology`] is the topologically sorted sequence of all classes
//! together with, per class, the sequence of its ancestors and the set of
//! its descendants. Every later pass walks classes in this order, so a
//! class is always processed after all of its ancestors.
//!
//! # Architecture
//!
//! 1. **Sort** - depth-first search with temporary and permanent marks.
//!    Classes not yet visited are kept sorted by name, so the resulting
//!    order depends only on the model and never on hashing. A class that is
//!    revisited while still temporarily marked closes a cycle; it is
//!    reported as the witness and sorting stops.
//! 2. **Ancestors** - for each class in sorted order, its parents are
//!    ordered by their sorted position, and each parent contributes its own
//!    ancestors followed by itself. Diamonds therefore repeat ancestors.
//! 3. **Descendants** - the inverse of the ancestor sequences.

use crate::ast::Identifier;
use crate::diag::Diag;
use crate::parsed::{Class, PrimitiveType, SymbolId, SymbolTable};
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use std::collections::{BTreeMap, HashSet};

/// Sorted classes with precomputed ancestor and descendant relations.
///
/// Relations are indexed by [`SymbolId`]; ids of enumerations map to empty
/// relations.
#[derive(Debug, Clone)]
pub struct Ontology {
    /// Classes, parents before children.
    classes: Vec<SymbolId>,

    /// Ancestor sequence of each symbol, root-most first, repetitions kept.
    ancestors: Vec<Vec<SymbolId>>,

    /// Descendants of each symbol in sorted order, without repetitions.
    descendants: Vec<Vec<SymbolId>>,
}

impl Ontology {
    /// Sorts the classes of `table` and precomputes their relations.
    ///
    /// Stops at the first problem: a cycle, or a parent that is not a
    /// defined class.
    #[tracing::instrument(skip_all)]
    pub fn build(table: &SymbolTable) -> Result<Ontology, Diag> {
        let classes = TopologicalSort::new(table).run()?;

        debug_assert!(
            first_not_in_topological_order(table, &classes).is_none(),
            "sorted classes violate the topological order"
        );

        let mut positions = vec![None; table.len()];
        for (position, id) in classes.iter().enumerate() {
            positions[id.as_usize()] = Some(position);
        }

        let mut ancestors: Vec<Vec<SymbolId>> = vec![Vec::new(); table.len()];
        for &id in &classes {
            let Some(class) = table.class(id) else {
                continue;
            };

            if class
                .inheritances
                .iter()
                .any(|parent| PrimitiveType::from_name(parent).is_some())
            {
                // A constrained primitive over a built-in type has no
                // ancestors in the ontology.
                continue;
            }

            let mut parents: Vec<(usize, SymbolId)> = class
                .inheritances
                .iter()
                .filter_map(|parent| table.find(parent))
                .filter_map(|parent| positions[parent.as_usize()].map(|pos| (pos, parent)))
                .collect();
            parents.sort_by_key(|(position, _)| *position);

            let mut sequence = Vec::new();
            for (_, parent) in parents {
                sequence.extend_from_slice(&ancestors[parent.as_usize()]);
                sequence.push(parent);
            }
            ancestors[id.as_usize()] = sequence;
        }

        let mut descendants: Vec<Vec<SymbolId>> = vec![Vec::new(); table.len()];
        for &id in &classes {
            for ancestor in &ancestors[id.as_usize()] {
                let inverse = &mut descendants[ancestor.as_usize()];
                if inverse.last() != Some(&id) {
                    inverse.push(id);
                }
            }
        }

        tracing::debug!(classes = classes.len(), "built the ontology");

        Ok(Ontology {
            classes,
            ancestors,
            descendants,
        })
    }

    /// All classes, parents before children.
    pub fn classes(&self) -> &[SymbolId] {
        &self.classes
    }

    /// The ancestor sequence of a class, root-most first.
    ///
    /// Under diamond inheritance an ancestor appears once per path.
    pub fn ancestors(&self, id: SymbolId) -> &[SymbolId] {
        self.ancestors
            .get(id.as_usize())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The descendants of a class in sorted order.
    pub fn descendants(&self, id: SymbolId) -> &[SymbolId] {
        self.descendants
            .get(id.as_usize())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The ancestors of a class, each listed once at its first occurrence.
    ///
    /// This is the order in which inherited members are stacked into a
    /// class.
    pub fn antecedents(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut seen = HashSet::new();
        self.ancestors(id)
            .iter()
            .copied()
            .filter(|ancestor| seen.insert(*ancestor))
            .collect()
    }
}

/// Returns the first class in `classes` that has a parent which does not
/// appear before it, ignoring built-in types.
///
/// Classes are identified by name, so ids unknown to `table` are skipped.
pub fn first_not_in_topological_order(table: &SymbolTable, classes: &[SymbolId]) -> Option<SymbolId> {
    let mut observed: HashSet<&Identifier> = HashSet::new();

    for &id in classes {
        let Some(class) = table.class(id) else {
            continue;
        };

        let misplaced = class.inheritances.iter().any(|parent| {
            PrimitiveType::from_name(parent).is_none() && !observed.contains(parent)
        });
        if misplaced {
            return Some(id);
        }

        observed.insert(&class.name);
    }

    None
}

/// Why a visit could not complete.
enum VisitError {
    /// The class was revisited while still in progress.
    Cycle(SymbolId),
    /// The class names a parent that is not a defined class.
    InvalidParent { class: SymbolId, parent: Identifier },
}

/// Depth-first topological sort with three-state marking.
struct TopologicalSort<'a> {
    table: &'a SymbolTable,
    /// Classes without a permanent mark, ordered by name.
    unvisited: BTreeMap<&'a Identifier, SymbolId>,
    /// Classes with a temporary mark.
    in_progress: HashSet<SymbolId>,
    sorted: Vec<SymbolId>,
}

impl<'a> TopologicalSort<'a> {
    fn new(table: &'a SymbolTable) -> Self {
        Self {
            table,
            unvisited: table.classes().map(|(id, class)| (&class.name, id)).collect(),
            in_progress: HashSet::new(),
            sorted: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<SymbolId>, Diag> {
        let table = self.table;

        while let Some(&id) = self.unvisited.values().next() {
            let Some(class) = table.class(id) else {
                self.unvisited.retain(|_, other| *other != id);
                continue;
            };

            if let Err(err) = self.visit(id, class) {
                return Err(self.report(err));
            }
        }

        Ok(self.sorted)
    }

    fn visit(&mut self, id: SymbolId, class: &'a Class) -> Result<(), VisitError> {
        if !self.unvisited.contains_key(&class.name) {
            return Ok(());
        }

        if !self.in_progress.insert(id) {
            return Err(VisitError::Cycle(id));
        }

        let table = self.table;
        for parent in &class.inheritances {
            if PrimitiveType::from_name(parent).is_some() {
                continue;
            }

            let Some((parent_id, parent_class)) = table.find_class(parent) else {
                return Err(VisitError::InvalidParent {
                    class: id,
                    parent: parent.clone(),
                });
            };

            self.visit(parent_id, parent_class)?;
        }

        self.in_progress.remove(&id);
        self.unvisited.remove(&class.name);
        self.sorted.push(id);

        Ok(())
    }

    fn report(&self, err: VisitError) -> Diag {
        match err {
            VisitError::Cycle(witness) => {
                let symbol = self.table.get(witness);
                tracing::debug!(witness = %symbol.name(), "inheritance cycle");
                SemanticDiagBuilder::inheritance_cycle(symbol.name(), symbol.span().clone())
                    .build()
            }
            VisitError::InvalidParent { class, parent } => {
                let symbol = self.table.get(class);
                let reason = if self.table.find(&parent).is_some() {
                    "is not a class"
                } else {
                    "has not been defined"
                };
                SemanticDiagBuilder::at(
                    SemanticDiagKind::InvalidInheritance,
                    symbol.span().clone(),
                    format!(
                        "The class {} inherits from {parent}, but {parent} {reason}",
                        symbol.name()
                    ),
                )
                .build()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsed::{Enumeration, Symbol};

    fn table(classes: Vec<Class>) -> SymbolTable {
        SymbolTable::new(classes.into_iter().map(Symbol::Class).collect(), "Reference").unwrap()
    }

    fn names(table: &SymbolTable, ids: &[SymbolId]) -> Vec<String> {
        ids.iter().map(|id| table.get(*id).name().to_string()).collect()
    }

    fn diamond() -> SymbolTable {
        table(vec![
            Class::abstract_class("Another_grand_parent"),
            Class::abstract_class("Grand_parent"),
            Class::abstract_class("Parent")
                .with_parent("Grand_parent")
                .with_parent("Another_grand_parent"),
            Class::abstract_class("Another_parent")
                .with_parent("Grand_parent")
                .with_parent("Another_grand_parent"),
            Class::concrete("Something")
                .with_parent("Parent")
                .with_parent("Another_parent"),
        ])
    }

    #[test]
    fn class_without_parents_has_no_ancestors() {
        let table = table(vec![Class::concrete("Something")]);
        let ontology = Ontology::build(&table).unwrap();
        let id = table.find("Something").unwrap();
        assert!(ontology.ancestors(id).is_empty());
    }

    #[test]
    fn diamond_ancestors_repeat_shared_roots() {
        let table = diamond();
        let ontology = Ontology::build(&table).unwrap();
        let something = table.find("Something").unwrap();

        assert_eq!(
            names(&table, ontology.ancestors(something)),
            vec![
                "Another_grand_parent",
                "Grand_parent",
                "Another_parent",
                "Another_grand_parent",
                "Grand_parent",
                "Parent",
            ]
        );
        assert_eq!(
            names(&table, &ontology.antecedents(something)),
            vec!["Another_grand_parent", "Grand_parent", "Another_parent", "Parent"]
        );
    }

    #[test]
    fn sorted_order_is_by_name_among_independent_classes() {
        let table = diamond();
        let ontology = Ontology::build(&table).unwrap();
        assert_eq!(
            names(&table, ontology.classes()),
            vec![
                "Another_grand_parent",
                "Grand_parent",
                "Another_parent",
                "Parent",
                "Something",
            ]
        );
        assert!(first_not_in_topological_order(&table, ontology.classes()).is_none());
    }

    #[test]
    fn descendants_invert_ancestors_without_repetition() {
        let table = diamond();
        let ontology = Ontology::build(&table).unwrap();
        let root = table.find("Another_grand_parent").unwrap();
        assert_eq!(
            names(&table, ontology.descendants(root)),
            vec!["Another_parent", "Parent", "Something"]
        );
    }

    #[test]
    fn cycle_is_reported_with_a_single_witness() {
        let table = table(vec![
            Class::concrete("Cycle").with_parent("Something"),
            Class::concrete("Something").with_parent("Cycle"),
        ]);
        let err = Ontology::build(&table).unwrap_err();
        assert_eq!(
            err.message,
            "Expected no cycles in the inheritance, but the class Cycle has been observed in a cycle"
        );
        assert!(err.is_leaf());
    }

    #[test]
    fn undefined_and_non_class_parents_are_rejected() {
        let undefined = table(vec![Class::concrete("Something").with_parent("Missing")]);
        assert_eq!(
            Ontology::build(&undefined).unwrap_err().message,
            "The class Something inherits from Missing, but Missing has not been defined"
        );

        let enumeration = SymbolTable::new(
            vec![
                Symbol::Enumeration(Enumeration::new("Kind")),
                Symbol::Class(Class::concrete("Something").with_parent("Kind")),
            ],
            "Something",
        )
        .unwrap();
        assert_eq!(
            Ontology::build(&enumeration).unwrap_err().message,
            "The class Something inherits from Kind, but Kind is not a class"
        );
    }

    #[test]
    fn primitive_base_is_not_an_ontology_member() {
        let table = table(vec![
            Class::concrete("Non_empty_string").with_parent("str"),
            Class::concrete("Identifier").with_parent("Non_empty_string"),
        ]);
        let ontology = Ontology::build(&table).unwrap();
        let base = table.find("Non_empty_string").unwrap();
        let derived = table.find("Identifier").unwrap();

        assert!(ontology.ancestors(base).is_empty());
        assert_eq!(ontology.ancestors(derived), &[base]);
        assert_eq!(ontology.classes().len(), 2);
    }

    #[test]
    fn out_of_order_sequence_is_detected() {
        let table = table(vec![
            Class::concrete("Parent"),
            Class::concrete("Child").with_parent("Parent"),
        ]);
        let parent = table.find("Parent").unwrap();
        let child = table.find("Child").unwrap();

        assert_eq!(first_not_in_topological_order(&table, &[child, parent]), Some(child));
        assert_eq!(first_not_in_topological_order(&table, &[parent, child]), None);
    }
}
