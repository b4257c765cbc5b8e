//! Sub-passes that look plain names up in the symbol table.

use super::is_identifier;
use crate::diag::Diag;
use crate::ir::{InterfaceId, SymbolId};
use crate::parsed::SymbolTable;
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use crate::semantic::first_pass::{
    Association, DeclaringSymbol, FirstPass, ImplementedInterface, Inheritance, ParentRequest,
    TypeName,
};
use crate::semantic::placeholder::{Registry, Resolutions};

pub(super) fn resolve_type_names(
    table: &SymbolTable,
    registry: &Registry<TypeName>,
) -> Result<Resolutions<TypeName>, Vec<Diag>> {
    registry.resolve_with(|name| {
        if !is_identifier(&name.node) {
            return Err(SemanticDiagBuilder::at(
                SemanticDiagKind::UndefinedSymbol,
                name.span.clone(),
                format!("The symbol is invalid: '{}'", name.node),
            )
            .build());
        }

        table
            .find(&name.node)
            .ok_or_else(|| SemanticDiagBuilder::undefined_symbol(&name.node, name.span.clone()).build())
    })
}

pub(super) fn resolve_inheritances(
    table: &SymbolTable,
    registry: &Registry<Inheritance>,
) -> Result<Resolutions<Inheritance>, Vec<Diag>> {
    registry.resolve_with(|request| find_parent(table, request))
}

/// Parent classes are checked while the ontology is built, so this only
/// fails on tables the ontology has not seen.
fn find_parent(table: &SymbolTable, request: &ParentRequest) -> Result<SymbolId, Diag> {
    table
        .find_class(&request.parent)
        .map(|(id, _)| id)
        .ok_or_else(|| {
            let class = table.get(request.class);
            SemanticDiagBuilder::at(
                SemanticDiagKind::InvalidInheritance,
                class.span().clone(),
                format!(
                    "The class {} inherits from {}, but {} is not a defined class",
                    class.name(),
                    request.parent,
                    request.parent
                ),
            )
            .build()
        })
}

pub(super) fn resolve_implemented_interfaces(
    table: &SymbolTable,
    first: &FirstPass,
    registry: &Registry<ImplementedInterface>,
) -> Result<Resolutions<ImplementedInterface>, Vec<Diag>> {
    registry.resolve_with(|request| -> Result<InterfaceId, Diag> {
        let parent = find_parent(table, request)?;
        first
            .class(parent)
            .and_then(|class| class.interface)
            .ok_or_else(|| {
                let class = table.get(request.class);
                SemanticDiagBuilder::at(
                    SemanticDiagKind::InvalidInheritance,
                    class.span().clone(),
                    format!(
                        "The class {} inherits from {}, but {} defines no interface",
                        class.name(),
                        request.parent,
                        request.parent
                    ),
                )
                .build()
            })
    })
}

pub(super) fn resolve_declaring_symbols(
    table: &SymbolTable,
    registry: &Registry<DeclaringSymbol>,
) -> Result<Resolutions<DeclaringSymbol>, Vec<Diag>> {
    registry.resolve_with(|name| {
        table
            .find(name)
            .ok_or_else(|| SemanticDiagBuilder::undefined_symbol(name, 0..0).build())
    })
}

pub(super) fn resolve_associations(
    table: &SymbolTable,
    first: &FirstPass,
    registry: &Registry<Association>,
) -> Result<Resolutions<Association>, Vec<Diag>> {
    registry.resolve_with(|name| {
        let id = table
            .find(&name.node)
            .ok_or_else(|| SemanticDiagBuilder::undefined_symbol(&name.node, name.span.clone()).build())?;

        if first.class(id).is_none() {
            return Err(SemanticDiagBuilder::at(
                SemanticDiagKind::UndefinedSymbol,
                name.span.clone(),
                format!(
                    "Expected the symbol representing the association references, {}, \
                     to be a class, but it is not",
                    name.node
                ),
            )
            .build());
        }

        Ok(id)
    })
}
