//! Semantic translation of a parsed symbol table into the IR.
//!
//! The parsed table still refers to other symbols by name and describes
//! every class in isolation. This module checks the model as a whole and
//! produces a [`crate::ir::SymbolTable`] in which all names are resolved,
//! constructors are flattened and inherited members are stacked.
//!
//! # Architecture
//!
//! The translator follows a multi-pass architecture:
//!
//! 1. **Ontology** - Topologically sort the classes, compute ancestors and
//!    descendants
//! 2. **Hierarchy Validation** - Redefined members, missing constructors
//! 3. **Constructor Understanding** - Map constructor bodies to statements
//! 4. **Serialization Settings** - Propagate ``with_model_type`` down the
//!    ontology; **Verification Functions** - Implementation-specific or
//!    pattern matching
//! 5. **Constructor Inlining** - Flatten delegations to parent constructors
//! 6. **Constrained Primitives** - Classes restricting a built-in type
//! 7. **First Pass** - IR nodes with typed placeholders for names
//! 8. **Resolution** - Resolve every placeholder category, then finalize
//! 9. **Verification** - Discriminators, property initialization, argument
//!    references and function calls in invariants and contracts on the
//!    finished table
//!
//! # Error policy
//!
//! Building the ontology and resolving the serialization settings stop at
//! the first problem, since everything after builds upon them. The other
//! passes report every problem they find, and the translator stops after
//! the first pass that found any.
//!
//! # Example
//!
//! ```
//! use metamodel_ir::parsed::{Class, Symbol, SymbolTable};
//! use metamodel_ir::semantic::Translator;
//!
//! let table = SymbolTable::new(
//!     vec![Symbol::Class(Class::concrete("Reference"))],
//!     "Reference",
//! )
//! .unwrap();
//!
//! let outcome = Translator::new().translate(&table);
//! assert!(outcome.is_success());
//! ```

pub mod constrained_primitives;
pub mod construction;
pub mod diag;
pub mod first_pass;
pub mod hierarchy_validation;
pub mod inlining;
pub mod ontology;
pub mod pattern_verification;
pub mod placeholder;
pub mod resolver;
pub mod serialization;
pub mod translator;
pub mod verification;

pub use ontology::{Ontology, first_not_in_topological_order};
pub use translator::{TranslationConfig, Translator};
