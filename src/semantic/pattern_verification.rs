//! Understanding of verification functions.
//!
//! A verification function is either implementation-specific or checks its
//! single string argument against a regular expression. Only the latter
//! shape is understood, since anything else could not be transpiled to the
//! schemas:
//!
//! ```text
//! def matches_id_short(text: str) -> bool:
//!     return match(r"^[a-zA-Z][a-zA-Z0-9_]*$", text) is not None
//! ```

use crate::ast::{CompareOp, Constant, Expr, ExprKind, Span, StmtKind};
use crate::diag::Diag;
use crate::ir::VerificationKind;
use crate::parsed::{Function, SymbolTable, TypeAnnotation, TypeAnnotationKind};
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use std::collections::HashSet;

/// Understands every verification function of `table`.
///
/// The kinds are returned in the order of
/// [`SymbolTable::verification_functions`]. Errors are bundled under a
/// single "Failed to understand the verification functions" diagnostic.
#[tracing::instrument(skip_all)]
pub fn understand_verification_functions(
    table: &SymbolTable,
) -> Result<Vec<VerificationKind>, Diag> {
    let functions = table.verification_functions();
    let mut kinds = Vec::with_capacity(functions.len());
    let mut failures = Vec::new();
    let mut seen = HashSet::new();

    for function in functions {
        if !seen.insert(function.name.as_str()) {
            failures.push(invalid(
                function.span.clone(),
                format!(
                    "The verification function has been defined more than once: {}",
                    function.name
                ),
            ));
            continue;
        }

        match understand(function) {
            Ok(kind) => kinds.push(kind),
            Err(diag) => failures.push(diag),
        }
    }

    if !failures.is_empty() {
        return Err(Diag::composite(
            "Failed to understand the verification functions",
            failures,
        ));
    }

    tracing::debug!(functions = kinds.len(), "verification functions understood");
    Ok(kinds)
}

/// Understands a single verification function.
pub fn understand(function: &Function) -> Result<VerificationKind, Diag> {
    if function.is_implementation_specific {
        return Ok(VerificationKind::ImplementationSpecific);
    }

    match pattern(function)? {
        Some(pattern) => Ok(VerificationKind::Pattern { pattern }),
        None => Err(invalid(
            function.span.clone(),
            format!(
                "We do not know how to interpret the verification function '{}' \
                 as it does not match our pre-defined interpretation rules. \
                 Please contact the developers if you expect this function \
                 to be understood.",
                function.name
            ),
        )),
    }
}

/// The pattern of a function shaped like a pattern matching.
///
/// Returns `Ok(None)` if the function does not look like one at all, and
/// an error if it does but deviates in a detail.
fn pattern(function: &Function) -> Result<Option<String>, Diag> {
    let [argument] = function.arguments.as_slice() else {
        return Ok(None);
    };
    let returns_bool = function
        .returns
        .as_ref()
        .is_some_and(|returns| is_atomic(returns, "bool"));
    if !is_atomic(&argument.type_annotation, "str") || !returns_bool {
        return Ok(None);
    }

    let [statement] = function.body.as_slice() else {
        return Ok(None);
    };
    let StmtKind::Return(value) = &statement.node else {
        return Ok(None);
    };

    if is_match_call(value) {
        return Err(invalid(
            value.span.clone(),
            "The ``match`` function returns a re.Match object, \
             but this function expected the return value to be a boolean. \
             Did you maybe want to write ``return match(...) is not None``?",
        ));
    }

    let ExprKind::Compare {
        left,
        op: CompareOp::IsNot,
        right,
    } = &value.node
    else {
        return Ok(None);
    };
    if !matches!(right.node, ExprKind::Constant(Constant::None)) || !is_match_call(left) {
        return Ok(None);
    }
    let ExprKind::Call { args, keywords, .. } = &left.node else {
        return Ok(None);
    };

    let provided = args.len() + keywords.len();
    if provided < 2 {
        return Err(invalid(
            left.span.clone(),
            format!(
                "The ``match`` function expects two arguments \
                 (pattern and the text to be matched), \
                 but you provided {provided} argument(s)"
            ),
        ));
    }
    if provided > 2 {
        return Err(invalid(
            left.span.clone(),
            "We do not support calls to the ``match`` function with more than \
             two arguments (pattern and the text to be matched) \
             since we could not transpile to other languages and schemas \
             (*e.g.*, flags such as multi-line matching)",
        ));
    }

    let [pattern, text] = args.as_slice() else {
        return Err(invalid(
            left.span.clone(),
            "The pattern and the text to be matched need to be passed to ``match`` \
             as positional arguments",
        ));
    };

    if !matches!(&text.node, ExprKind::Name(name) if *name == argument.name) {
        return Err(invalid(
            text.span.clone(),
            format!(
                "The second argument, the text to be matched, to ``match`` \
                 needs to correspond to the single argument of \
                 the verification function, '{}'. \
                 Otherwise, we can not transpile the pattern to schemas.",
                argument.name
            ),
        ));
    }

    match &pattern.node {
        ExprKind::Constant(Constant::Str(pattern)) => Ok(Some(pattern.clone())),
        _ => Err(invalid(
            pattern.span.clone(),
            "The first argument, the pattern, to ``match`` needs to be a string \
             literal. Otherwise, we can not transpile the pattern to schemas.",
        )),
    }
}

fn is_atomic(annotation: &TypeAnnotation, identifier: &str) -> bool {
    matches!(&annotation.node, TypeAnnotationKind::Atomic(name) if name == identifier)
}

fn is_match_call(expr: &Expr) -> bool {
    matches!(
        &expr.node,
        ExprKind::Call { func, .. } if matches!(&func.node, ExprKind::Name(name) if name == "match")
    )
}

fn invalid(span: Span, message: impl Into<String>) -> Diag {
    SemanticDiagBuilder::at(SemanticDiagKind::InvalidVerificationFunction, span, message).build()
}
