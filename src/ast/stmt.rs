//! Statement nodes, as they appear in constructor and function bodies.

use super::expr::{Expr, ExprKind};
use super::{Span, Spanned};
use std::fmt;

pub type Stmt = Spanned<StmtKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Pass,
    /// An expression evaluated for its effect, e.g. a call.
    Expr(Expr),
    /// `target = value`; chained assignments carry several targets.
    Assign { targets: Vec<Expr>, value: Expr },
    /// `return value`
    Return(Expr),
    /// Any other statement, kept verbatim.
    Opaque(String),
}

impl Spanned<StmtKind> {
    pub fn pass(span: Span) -> Self {
        Spanned::new(StmtKind::Pass, span)
    }

    pub fn expr(expr: Expr, span: Span) -> Self {
        Spanned::new(StmtKind::Expr(expr), span)
    }

    pub fn assign(target: Expr, value: Expr, span: Span) -> Self {
        Spanned::new(
            StmtKind::Assign {
                targets: vec![target],
                value,
            },
            span,
        )
    }

    pub fn return_value(value: Expr, span: Span) -> Self {
        Spanned::new(StmtKind::Return(value), span)
    }

    pub fn opaque(text: impl Into<String>, span: Span) -> Self {
        Spanned::new(StmtKind::Opaque(text.into()), span)
    }

    /// `self.<property> = <value>`
    pub fn assign_property(property: &str, value: Expr, span: Span) -> Self {
        let target = Spanned::new(
            ExprKind::Attribute {
                value: Box::new(Expr::name("self", span.clone())),
                attr: property.into(),
            },
            span.clone(),
        );
        Self::assign(target, value, span)
    }
}

impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StmtKind::Pass => write!(f, "pass"),
            StmtKind::Expr(expr) => write!(f, "{}", expr.node),
            StmtKind::Assign { targets, value } => {
                for target in targets {
                    write!(f, "{} = ", target.node)?;
                }
                write!(f, "{}", value.node)
            }
            StmtKind::Return(value) => write!(f, "return {}", value.node),
            StmtKind::Opaque(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_assignment_renders_with_self_target() {
        let stmt = Stmt::assign_property("x", Expr::name("x", 0..0), 0..0);
        assert_eq!(stmt.node.to_string(), "self.x = x");
    }
}
