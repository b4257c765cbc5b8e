//! Argument defaults and enumeration supersets.

use crate::ast::ExprKind;
use crate::diag::Diag;
use crate::ir::DefaultValue;
use crate::parsed::SymbolTable;
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use crate::semantic::first_pass::{ArgumentDefault, Superset};
use crate::semantic::placeholder::{Registry, Resolutions};

/// Defaults may be constants, the empty list or a literal of an
/// enumeration (`Kind.Template`).
pub(super) fn resolve_argument_defaults(
    table: &SymbolTable,
    registry: &Registry<ArgumentDefault>,
) -> Result<Resolutions<ArgumentDefault>, Vec<Diag>> {
    registry.resolve_with(|default| {
        match &default.node {
            ExprKind::Constant(constant) => return Ok(DefaultValue::Constant(constant.clone())),
            ExprKind::List(items) if items.is_empty() => return Ok(DefaultValue::EmptyList),
            _ => {}
        }

        if let Some((enumeration, literal)) = default.as_qualified_name() {
            if let Some((id, found)) = table.find_enumeration(enumeration) {
                if found.literal(literal).is_none() {
                    return Err(SemanticDiagBuilder::at(
                        SemanticDiagKind::UnsupportedDefault,
                        default.span.clone(),
                        format!(
                            "The default value refers to the literal {literal}, \
                             but it is not defined in the enumeration {enumeration}"
                        ),
                    )
                    .build());
                }
                return Ok(DefaultValue::EnumerationLiteral {
                    enumeration: id,
                    literal: literal.clone(),
                });
            }
        }

        Err(SemanticDiagBuilder::at(
            SemanticDiagKind::UnsupportedDefault,
            default.span.clone(),
            format!(
                "The translation of the default value to the intermediate layer \
                 has not been implemented: {}",
                default.node
            ),
        )
        .build())
    })
}

pub(super) fn resolve_supersets(
    table: &SymbolTable,
    registry: &Registry<Superset>,
) -> Result<Resolutions<Superset>, Vec<Diag>> {
    registry.resolve_with(|request| {
        let subset = &request.subset;
        let Some(id) = table.find(&subset.node) else {
            return Err(SemanticDiagBuilder::at(
                SemanticDiagKind::InvalidSuperset,
                subset.span.clone(),
                format!(
                    "The subset enumeration in ``is_superset_of`` has not been defined: {}",
                    subset.node
                ),
            )
            .build());
        };

        if table.get(id).as_enumeration().is_none() {
            return Err(SemanticDiagBuilder::at(
                SemanticDiagKind::InvalidSuperset,
                subset.span.clone(),
                format!(
                    "An element, {}, of ``is_superset_of`` is not an Enumeration",
                    subset.node
                ),
            )
            .build());
        }

        Ok(id)
    })
}

/// Every literal of a subset must appear in the superset under the same
/// name and with the same value.
pub(super) fn check_superset_literals(
    table: &SymbolTable,
    registry: &Registry<Superset>,
    supersets: &Resolutions<Superset>,
) -> Vec<Diag> {
    let mut errors = Vec::new();

    for (request, &subset_id) in registry.requests().iter().zip(supersets.outputs()) {
        let (Some(enumeration), Some(subset)) = (
            table.get(request.enumeration).as_enumeration(),
            table.get(subset_id).as_enumeration(),
        ) else {
            continue;
        };

        for literal in &subset.literals {
            let message = match enumeration.literal(&literal.name) {
                None => format!(
                    "The literal {} from the subset enumeration {} is missing \
                     in the enumeration {}",
                    literal.name, subset.name, enumeration.name
                ),
                Some(counterpart) if counterpart.value != literal.value => format!(
                    "The value '{}' of the literal {} from the subset enumeration {} \
                     does not equal the value '{}' of the literal {} in the enumeration {}",
                    literal.value,
                    literal.name,
                    subset.name,
                    counterpart.value,
                    counterpart.name,
                    enumeration.name
                ),
                Some(_) => continue,
            };

            errors.push(
                SemanticDiagBuilder::at(
                    SemanticDiagKind::InvalidSuperset,
                    enumeration.span.clone(),
                    message,
                )
                .with_secondary_label(request.subset.span.clone(), "declared a subset here")
                .build(),
            );
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, Expr, Identifier, Spanned};
    use crate::parsed::{Enumeration, Symbol};
    use crate::semantic::first_pass::SupersetRequest;

    fn table() -> SymbolTable {
        SymbolTable::new(
            vec![
                Symbol::Enumeration(
                    Enumeration::new("Kind")
                        .with_literal("Template", "Template")
                        .with_literal("Instance", "Instance"),
                ),
                Symbol::Enumeration(Enumeration::new("Sub_kind").with_literal("Template", "template")),
            ],
            "Kind",
        )
        .unwrap()
    }

    #[test]
    fn enumeration_literals_and_constants_are_accepted() {
        let table = table();
        let mut registry = Registry::<ArgumentDefault>::default();
        let literal = registry.register(Expr::attribute(Expr::name("Kind", 0..4), "Instance", 0..13));
        let constant = registry.register(Expr::constant(Constant::Int(3), 0..1));

        let resolved = resolve_argument_defaults(&table, &registry).unwrap();
        assert_eq!(
            resolved.resolved(literal),
            DefaultValue::EnumerationLiteral {
                enumeration: table.find("Kind").unwrap(),
                literal: Identifier::new("Instance"),
            }
        );
        assert_eq!(resolved.resolved(constant), DefaultValue::Constant(Constant::Int(3)));
    }

    #[test]
    fn other_defaults_have_not_been_implemented() {
        let table = table();
        let mut registry = Registry::<ArgumentDefault>::default();
        registry.register(Expr::call(Expr::name("compute", 0..7), vec![], vec![], 0..9));

        let errors = resolve_argument_defaults(&table, &registry).unwrap_err();
        assert!(errors[0].message.starts_with(
            "The translation of the default value to the intermediate layer has not been implemented: "
        ));
    }

    #[test]
    fn differing_literal_values_are_reported() {
        let table = table();
        let mut registry = Registry::<Superset>::default();
        registry.register(SupersetRequest {
            enumeration: table.find("Kind").unwrap(),
            subset: Spanned::detached(Identifier::new("Sub_kind")),
        });

        let supersets = resolve_supersets(&table, &registry).unwrap();
        let errors = check_superset_literals(&table, &registry, &supersets);
        assert_eq!(
            errors[0].message,
            "The value 'template' of the literal Template from the subset enumeration Sub_kind \
             does not equal the value 'Template' of the literal Template in the enumeration Kind"
        );
    }
}
