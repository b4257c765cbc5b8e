//! Resolution of the cross-references in descriptions.
//!
//! Symbol references must be written with a leading dot (``.Asset``).
//! Attribute references are either a single member name, resolved against
//! the symbol whose description contains the reference, or
//! `Symbol.member`. Members of classes are looked up among the stacked
//! properties, so inherited properties can be referenced through a
//! descendant.

use super::is_identifier;
use crate::ast::Identifier;
use crate::diag::Diag;
use crate::ir::{ReferenceTarget, SymbolId};
use crate::parsed::SymbolTable;
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use crate::semantic::first_pass::{
    AttributeReference, FirstPass, PendingSymbol, RawReference, SymbolReference,
};
use crate::semantic::placeholder::{Registry, Resolutions};

fn invalid(reference: &RawReference, message: String) -> Diag {
    SemanticDiagBuilder::at(
        SemanticDiagKind::InvalidDescriptionReference,
        reference.span.clone(),
        message,
    )
    .build()
}

pub(super) fn resolve_symbol_references(
    table: &SymbolTable,
    registry: &Registry<SymbolReference>,
) -> Result<Resolutions<SymbolReference>, Vec<Diag>> {
    registry.resolve_with(|reference| {
        let Some(name) = reference.target.strip_prefix('.') else {
            return Err(invalid(
                reference,
                format!(
                    "The identifier of the symbol reference is invalid: {}; \
                     expected an identifier starting with a dot",
                    reference.target
                ),
            ));
        };

        if !is_identifier(name) {
            return Err(invalid(
                reference,
                format!("The identifier of the symbol reference is invalid: {name}"),
            ));
        }

        table.find(name).ok_or_else(|| {
            invalid(
                reference,
                format!(
                    "The identifier of the symbol reference could not be found \
                     in the symbol table: {name}"
                ),
            )
        })
    })
}

pub(super) fn resolve_attribute_references(
    table: &SymbolTable,
    first: &FirstPass,
    registry: &Registry<AttributeReference>,
) -> Result<Resolutions<AttributeReference>, Vec<Diag>> {
    registry.resolve_with(|reference| resolve_attribute_reference(table, first, reference))
}

fn resolve_attribute_reference(
    table: &SymbolTable,
    first: &FirstPass,
    reference: &RawReference,
) -> Result<ReferenceTarget, Diag> {
    let path = &reference.target;
    let parts: Vec<&str> = path.split('.').collect();

    if !parts.iter().all(|part| is_identifier(part)) {
        return Err(invalid(
            reference,
            format!(
                "Invalid reference to a property or a literal; each part of the path \
                 needs to be an identifier, but it is not: {path}"
            ),
        ));
    }

    let (symbol, member): (SymbolId, &str) = match parts.as_slice() {
        [member] => match reference.owner {
            Some(owner) => (owner, *member),
            None => {
                return Err(invalid(
                    reference,
                    format!(
                        "The attribute reference can not be resolved as there is \
                         no encompassing symbol in the given context: {path}"
                    ),
                ));
            }
        },
        [name, member] => match table.find(name) {
            Some(symbol) => (symbol, *member),
            None => {
                return Err(invalid(
                    reference,
                    format!("Dangling reference to a non-existing symbol: {path}"),
                ));
            }
        },
        _ => {
            return Err(invalid(
                reference,
                format!(
                    "We did not implement the resolution of such a reference \
                     to a property or a literal: {path}"
                ),
            ));
        }
    };

    match &first.symbols[symbol.as_usize()] {
        PendingSymbol::Enumeration(enumeration) => {
            if enumeration.literals.iter().any(|literal| literal.name == member) {
                Ok(ReferenceTarget::EnumerationLiteral {
                    enumeration: symbol,
                    literal: Identifier::new(member),
                })
            } else {
                Err(invalid(
                    reference,
                    format!(
                        "Dangling reference to a non-existing literal in the enumeration '{}': {path}",
                        enumeration.name
                    ),
                ))
            }
        }
        PendingSymbol::ConstrainedPrimitive(primitive) => Err(invalid(
            reference,
            format!(
                "Unexpected references to a property of a constrained primitive '{}': {path}",
                primitive.name
            ),
        )),
        PendingSymbol::Class(class) => {
            if class.has_property(member) {
                Ok(ReferenceTarget::Property {
                    class: symbol,
                    name: Identifier::new(member),
                })
            } else {
                Err(invalid(
                    reference,
                    format!(
                        "Dangling reference to a non-existing property of a class '{}': {path}",
                        class.name
                    ),
                ))
            }
        }
    }
}
