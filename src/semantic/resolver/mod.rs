//! Second pass of the translation: resolution of the placeholders.
//!
//! Each category of placeholders is resolved by its own sub-pass, in this
//! order: type names, symbol references and attribute references in
//! descriptions, argument defaults, supersets of enumerations,
//! inheritances, implemented interfaces, declaring symbols and the
//! association symbol. All sub-passes run even if an earlier one failed,
//! so that a single run reports every dangling name.
//!
//! Once everything resolved, [`finalize`] builds the IR. Finalization
//! cannot fail: every handle it looks up has a resolution.

mod descriptions;
mod finalize;
mod names;
mod values;

pub use finalize::finalize;

use crate::diag::Diag;
use crate::parsed;
use crate::semantic::first_pass::{
    ArgumentDefault, Association, AttributeReference, DeclaringSymbol, FirstPass,
    ImplementedInterface, Inheritance, Superset, SymbolReference, TypeName,
};
use crate::semantic::placeholder::{Category, Resolutions};

/// Resolutions of all placeholder categories.
#[derive(Debug)]
pub struct Resolved {
    pub type_names: Resolutions<TypeName>,
    pub symbol_references: Resolutions<SymbolReference>,
    pub attribute_references: Resolutions<AttributeReference>,
    pub argument_defaults: Resolutions<ArgumentDefault>,
    pub supersets: Resolutions<Superset>,
    pub inheritances: Resolutions<Inheritance>,
    pub implemented_interfaces: Resolutions<ImplementedInterface>,
    pub declaring_symbols: Resolutions<DeclaringSymbol>,
    pub associations: Resolutions<Association>,
}

/// Resolves every placeholder registered by the first pass.
#[tracing::instrument(skip_all)]
pub fn resolve(table: &parsed::SymbolTable, first: &FirstPass) -> Result<Resolved, Vec<Diag>> {
    let registries = &first.registries;
    let mut errors = Vec::new();

    let type_names = keep(&mut errors, names::resolve_type_names(table, &registries.type_names));
    let symbol_references = keep(
        &mut errors,
        descriptions::resolve_symbol_references(table, &registries.symbol_references),
    );
    let attribute_references = keep(
        &mut errors,
        descriptions::resolve_attribute_references(table, first, &registries.attribute_references),
    );
    let argument_defaults = keep(
        &mut errors,
        values::resolve_argument_defaults(table, &registries.argument_defaults),
    );
    let supersets = keep(&mut errors, values::resolve_supersets(table, &registries.supersets));
    if let Some(supersets) = &supersets {
        errors.extend(values::check_superset_literals(
            table,
            &registries.supersets,
            supersets,
        ));
    }
    let inheritances = keep(
        &mut errors,
        names::resolve_inheritances(table, &registries.inheritances),
    );
    let implemented_interfaces = keep(
        &mut errors,
        names::resolve_implemented_interfaces(table, first, &registries.implemented_interfaces),
    );
    let declaring_symbols = keep(
        &mut errors,
        names::resolve_declaring_symbols(table, &registries.declaring_symbols),
    );
    let associations = keep(
        &mut errors,
        names::resolve_associations(table, first, &registries.associations),
    );

    tracing::debug!(errors = errors.len(), "resolved the placeholders");

    match (
        type_names,
        symbol_references,
        attribute_references,
        argument_defaults,
        supersets,
        inheritances,
        implemented_interfaces,
        declaring_symbols,
        associations,
    ) {
        (
            Some(type_names),
            Some(symbol_references),
            Some(attribute_references),
            Some(argument_defaults),
            Some(supersets),
            Some(inheritances),
            Some(implemented_interfaces),
            Some(declaring_symbols),
            Some(associations),
        ) if errors.is_empty() => Ok(Resolved {
            type_names,
            symbol_references,
            attribute_references,
            argument_defaults,
            supersets,
            inheritances,
            implemented_interfaces,
            declaring_symbols,
            associations,
        }),
        _ => Err(errors),
    }
}

fn keep<C: Category>(
    errors: &mut Vec<Diag>,
    result: Result<Resolutions<C>, Vec<Diag>>,
) -> Option<Resolutions<C>> {
    match result {
        Ok(resolutions) => Some(resolutions),
        Err(mut failed) => {
            errors.append(&mut failed);
            None
        }
    }
}

/// Whether `text` is a valid identifier of the modeling notation.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_start_with_a_letter_or_an_underscore() {
        assert!(is_identifier("Something"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2nd"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier("dotted.name"));
    }
}
