//! Intermediate Representation (IR) of a data model.
//!
//! The IR is what code generators consume: every name has been resolved
//! to a [`SymbolId`] (or an [`InterfaceId`]), constructors are flattened
//! over the inheritance, and properties, methods and invariants are
//! stacked from the ancestors. Verification functions are kept apart from
//! the symbols, as in the parsed table. Nothing here refers to a not yet resolved
//! name; the types of the first translation pass are separate and never
//! leave the `semantic` module.
//!
//! The ids of the symbols are those of the parsed symbol table, so a
//! parsed symbol and its IR counterpart share an id.

pub mod symbol_table;
mod symbols;
mod types;

use crate::diag::Diag;
pub use crate::parsed::{ClassKind, Contract, Contracts, PrimitiveType, Snapshot, SymbolId};
pub use symbol_table::{InterfaceId, SymbolTable};
pub use symbols::{
    Argument, AssignArgument, Class, ConstrainedPrimitive, Constructor, ConstructorDefault,
    Enumeration, EnumerationLiteral, Interface, Invariant, Method, Property, Serialization, Symbol,
    Verification, VerificationKind,
};
pub use types::{
    DefaultValue, Description, DescriptionReference, ReferenceTarget, TypeAnnotation,
    TypeAnnotationDisplay,
};

/// Result type for translation operations.
pub type TranslationResult = Result<SymbolTable, Diag>;

/// Outcome of a translation, always carrying diagnostics.
///
/// On failure the diagnostics hold the stage errors (each possibly a tree
/// of underlying errors) in the order the stages ran.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// The symbol table, if translation produced no errors.
    pub symbol_table: Option<SymbolTable>,

    /// All diagnostics collected during translation.
    pub diagnostics: Vec<Diag>,
}

impl TranslationOutcome {
    /// Creates a successful outcome.
    pub fn success(symbol_table: SymbolTable) -> Self {
        Self {
            symbol_table: Some(symbol_table),
            diagnostics: Vec::new(),
        }
    }

    /// Creates a failed outcome with the given errors.
    pub fn failure(diagnostics: Vec<Diag>) -> Self {
        Self {
            symbol_table: None,
            diagnostics,
        }
    }

    /// Returns true if translation succeeded (the symbol table is available).
    pub fn is_success(&self) -> bool {
        self.symbol_table.is_some()
    }

    /// Returns true if translation failed (no symbol table available).
    pub fn is_failure(&self) -> bool {
        self.symbol_table.is_none()
    }

    /// Bundles the diagnostics under the top-level translation error.
    pub fn into_result(self) -> TranslationResult {
        match self.symbol_table {
            Some(symbol_table) => Ok(symbol_table),
            None => Err(Diag::composite(
                "Failed to translate the parsed symbol table to an intermediate symbol table",
                self.diagnostics,
            )),
        }
    }
}
