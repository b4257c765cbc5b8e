//! Semantic analysis for data-model descriptions.
//!
//! This library takes the parsed symbol table of a meta-model (classes,
//! enumerations, their properties, methods, constructors and invariants)
//! and translates it into a linked intermediate representation for code
//! generators. Errors are reported as trees of [`Diag`]s that render
//! through miette.
//!
//! # Example
//!
//! ```
//! use metamodel_ir::parsed::{Class, Property, Symbol, SymbolTable, TypeAnnotation};
//! use metamodel_ir::translate;
//!
//! let table = SymbolTable::new(
//!     vec![
//!         Symbol::Class(Class::abstract_class("Referable").with_property(
//!             Property::new("id", TypeAnnotation::optional(TypeAnnotation::atomic("str"))),
//!         )),
//!         Symbol::Class(Class::concrete("Reference")),
//!     ],
//!     "Reference",
//! )
//! .unwrap();
//!
//! let symbol_table = translate(&table).unwrap();
//! let referable = symbol_table.find_class("Referable").unwrap();
//! assert!(referable.interface.is_some());
//! ```

pub mod ast;
pub mod diag;
pub mod ir;
pub mod lexer;
pub mod parsed;
pub mod semantic;

// Re-export syntax span primitives.
pub use ast::{Span, Spanned};

pub use diag::{Diag, DiagLabel, SourceFile, convert_diag_to_report};
pub use ir::{TranslationOutcome, TranslationResult};
pub use semantic::{TranslationConfig, Translator};

/// Translates `table` with the default configuration.
///
/// On failure, all diagnostics are bundled under a single top-level error.
pub fn translate(table: &parsed::SymbolTable) -> TranslationResult {
    Translator::new().translate(table).into_result()
}
