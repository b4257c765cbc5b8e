//! Common test utilities
//!
//! This module contains shared test helpers, fixtures, and utilities
//! used across multiple test modules.
//!
//! # Diagnostic Helpers
//! - [`format_diag_diagnostics`] - Format diagnostics for display in assertions
//! - [`leaf_messages`] - Flatten the diagnostics of an outcome into messages
//! - [`assert_has_error_containing`] - Assert that an error message contains specific text
//!
//! # Model Helpers
//! - [`model`] - Build a parsed symbol table with the association class added
//! - [`int_property`], [`int_argument`] - Members of type `int`
//! - [`assigning_constructor`] - A constructor assigning each of its arguments
//! - [`super_init`] - A delegation to the constructor of a parent
//!
//! # Translation Helpers
//! - [`translate_model`] - Run the translator with the default configuration
//! - [`translate_cleanly`] - Translate, panicking on any diagnostic

#![allow(dead_code)]

use metamodel_ir::ast::{Expr, Keyword, Stmt};
use metamodel_ir::diag::Diag;
use metamodel_ir::ir::{SymbolTable as IrSymbolTable, TranslationOutcome};
use metamodel_ir::parsed::{
    Argument, Class, Constructor, Property, Symbol, SymbolTable, TypeAnnotation,
};
use metamodel_ir::semantic::Translator;

/// Name of the class every test model designates for association references.
pub const ASSOCIATION: &str = "Reference";

// ============================================================================
// Diagnostic Formatting and Assertion Helpers
// ============================================================================

/// Format Diag diagnostics for display in assertion messages.
pub fn format_diag_diagnostics(diags: &[Diag]) -> String {
    diags
        .iter()
        .map(|diag| format!("{:?}", diag))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Messages of all leaf diagnostics, in the order they were reported.
pub fn leaf_messages(outcome: &TranslationOutcome) -> Vec<String> {
    outcome
        .diagnostics
        .iter()
        .flat_map(|diag| diag.leaf_messages())
        .map(str::to_string)
        .collect()
}

/// Assert that a translation outcome contains an error with a message
/// containing the specified text.
///
/// # Panics
/// Panics if no error containing the specified text is found.
pub fn assert_has_error_containing(outcome: &TranslationOutcome, text: &str) {
    let has_matching_error = leaf_messages(outcome)
        .iter()
        .any(|message| message.contains(text));

    assert!(
        has_matching_error,
        "expected error containing '{}', but found:\n{}",
        text,
        format_diag_diagnostics(&outcome.diagnostics)
    );
}

// ============================================================================
// Model Helpers
// ============================================================================

/// Builds a parsed symbol table from `symbols`, appending the concrete
/// association class [`ASSOCIATION`].
///
/// # Panics
/// Panics if two symbols share a name.
pub fn model(symbols: Vec<Symbol>) -> SymbolTable {
    let mut symbols = symbols;
    symbols.push(Symbol::Class(Class::concrete(ASSOCIATION)));
    SymbolTable::new(symbols, ASSOCIATION)
        .unwrap_or_else(|err| panic!("invalid test model: {err:?}"))
}

/// Builds a parsed symbol table of classes only.
pub fn classes(classes: Vec<Class>) -> SymbolTable {
    model(classes.into_iter().map(Symbol::Class).collect())
}

pub fn int_property(name: &str) -> Property {
    Property::new(name, TypeAnnotation::atomic("int"))
}

pub fn int_argument(name: &str) -> Argument {
    Argument::new(name, TypeAnnotation::atomic("int"))
}

pub fn name(identifier: &str) -> Expr {
    Expr::name(identifier, 0..0)
}

/// `self.<property> = <property>`
pub fn assign(property: &str) -> Stmt {
    Stmt::assign_property(property, name(property), 0..0)
}

/// A constructor taking one `int` argument per property and assigning it.
pub fn assigning_constructor(properties: &[&str]) -> Constructor {
    properties
        .iter()
        .fold(Constructor::new(), |constructor, property| {
            constructor
                .with_argument(int_argument(property))
                .with_statement(assign(property))
        })
}

/// `Parent.__init__(self, a=a, b=b)`
pub fn super_init(parent: &str, arguments: &[&str]) -> Stmt {
    let keywords = arguments
        .iter()
        .map(|argument| Keyword {
            arg: Some((*argument).into()),
            value: name(argument),
            span: 0..0,
        })
        .collect();

    Stmt::expr(
        Expr::call(
            Expr::attribute(name(parent), "__init__", 0..0),
            vec![name("self")],
            keywords,
            0..0,
        ),
        0..0,
    )
}

// ============================================================================
// Translation Helpers
// ============================================================================

/// Run the translator with the default configuration.
pub fn translate_model(table: &SymbolTable) -> TranslationOutcome {
    Translator::new().translate(table)
}

/// Translate and return the symbol table, panicking on any diagnostic.
///
/// # Panics
/// Panics if the translation fails.
pub fn translate_cleanly(table: &SymbolTable) -> IrSymbolTable {
    let outcome = translate_model(table);
    let diagnostics = format_diag_diagnostics(&outcome.diagnostics);
    outcome
        .symbol_table
        .unwrap_or_else(|| panic!("translation should succeed, but found:\n{diagnostics}"))
}

/// Names of the symbols behind `ids` in `table`.
pub fn names(table: &IrSymbolTable, ids: &[metamodel_ir::ir::SymbolId]) -> Vec<String> {
    ids.iter()
        .map(|id| table.get(*id).name().to_string())
        .collect()
}
