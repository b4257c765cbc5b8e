//! Expression nodes of the modeling notation.
//!
//! Only the shapes the semantic passes need to inspect are modeled
//! structurally: names, attribute access, calls, conditional expressions,
//! comparisons, boolean operations, constants and list displays. Anything else the front end
//! encountered is kept as [`ExprKind::Opaque`] with its source text so that
//! it can still be quoted in a diagnostic.

use super::{Span, Spanned};
use smol_str::SmolStr;
use std::fmt;

/// Name of a symbol, member or argument.
pub type Identifier = SmolStr;

/// An expression together with its source location.
pub type Expr = Spanned<ExprKind>;

/// A literal constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    None,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(true) => write!(f, "True"),
            Constant::Bool(false) => write!(f, "False"),
            Constant::Int(value) => write!(f, "{value}"),
            Constant::Float(value) => write!(f, "{value:?}"),
            Constant::Str(value) => write!(f, "{value:?}"),
            Constant::None => write!(f, "None"),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Is,
    IsNot,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtE => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtE => ">=",
        }
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

/// A keyword argument of a call; `arg` is `None` for a `**mapping` splat.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Option<Identifier>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A bare name, e.g. `x`.
    Name(Identifier),
    /// Attribute access, e.g. `self.x` or `Kind.Literal`.
    Attribute { value: Box<Expr>, attr: Identifier },
    /// A call with positional and keyword arguments.
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    /// `body if test else orelse`
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    /// A single binary comparison.
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    /// `a and b and ...` or `a or b or ...`
    BoolOp { op: BoolOp, values: Vec<Expr> },
    /// `not operand`
    Not(Box<Expr>),
    Constant(Constant),
    List(Vec<Expr>),
    /// Any other expression, kept verbatim.
    Opaque(String),
}

impl Spanned<ExprKind> {
    pub fn name(identifier: impl Into<Identifier>, span: Span) -> Self {
        Spanned::new(ExprKind::Name(identifier.into()), span)
    }

    pub fn attribute(value: Expr, attr: impl Into<Identifier>, span: Span) -> Self {
        Spanned::new(
            ExprKind::Attribute {
                value: Box::new(value),
                attr: attr.into(),
            },
            span,
        )
    }

    pub fn call(func: Expr, args: Vec<Expr>, keywords: Vec<Keyword>, span: Span) -> Self {
        Spanned::new(
            ExprKind::Call {
                func: Box::new(func),
                args,
                keywords,
            },
            span,
        )
    }

    pub fn if_exp(test: Expr, body: Expr, orelse: Expr, span: Span) -> Self {
        Spanned::new(
            ExprKind::IfExp {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            },
            span,
        )
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr, span: Span) -> Self {
        Spanned::new(
            ExprKind::Compare {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn bool_op(op: BoolOp, values: Vec<Expr>, span: Span) -> Self {
        Spanned::new(ExprKind::BoolOp { op, values }, span)
    }

    pub fn not(operand: Expr, span: Span) -> Self {
        Spanned::new(ExprKind::Not(Box::new(operand)), span)
    }

    pub fn constant(constant: Constant, span: Span) -> Self {
        Spanned::new(ExprKind::Constant(constant), span)
    }

    pub fn list(items: Vec<Expr>, span: Span) -> Self {
        Spanned::new(ExprKind::List(items), span)
    }

    pub fn opaque(text: impl Into<String>, span: Span) -> Self {
        Spanned::new(ExprKind::Opaque(text.into()), span)
    }

    /// Returns the identifier if this is a bare name.
    pub fn as_name(&self) -> Option<&Identifier> {
        match &self.node {
            ExprKind::Name(identifier) => Some(identifier),
            _ => None,
        }
    }

    /// Matches `Something.member` where `Something` is a bare name.
    pub fn as_qualified_name(&self) -> Option<(&Identifier, &Identifier)> {
        match &self.node {
            ExprKind::Attribute { value, attr } => value.as_name().map(|name| (name, attr)),
            _ => None,
        }
    }

    /// Whether this is the constant `None`.
    pub fn is_none_constant(&self) -> bool {
        matches!(self.node, ExprKind::Constant(Constant::None))
    }

    /// Visits this expression and all its sub-expressions, parents first.
    ///
    /// Opaque expressions are visited but have no children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match &self.node {
            ExprKind::Name(_) | ExprKind::Constant(_) | ExprKind::Opaque(_) => {}
            ExprKind::Attribute { value, .. } => value.walk(visit),
            ExprKind::Call {
                func,
                args,
                keywords,
            } => {
                func.walk(visit);
                for arg in args {
                    arg.walk(visit);
                }
                for keyword in keywords {
                    keyword.value.walk(visit);
                }
            }
            ExprKind::IfExp { test, body, orelse } => {
                test.walk(visit);
                body.walk(visit);
                orelse.walk(visit);
            }
            ExprKind::Compare { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            ExprKind::BoolOp { values, .. } => {
                for value in values {
                    value.walk(visit);
                }
            }
            ExprKind::Not(operand) => operand.walk(visit),
            ExprKind::List(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
        }
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Name(identifier) => write!(f, "{identifier}"),
            ExprKind::Attribute { value, attr } => write!(f, "{}.{attr}", value.node),
            ExprKind::Call {
                func,
                args,
                keywords,
            } => {
                write!(f, "{}(", func.node)?;
                let mut first = true;
                for arg in args {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{}", arg.node)?;
                }
                for keyword in keywords {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    match &keyword.arg {
                        Some(arg) => write!(f, "{arg}={}", keyword.value.node)?,
                        None => write!(f, "**{}", keyword.value.node)?,
                    }
                }
                write!(f, ")")
            }
            ExprKind::IfExp { test, body, orelse } => {
                write!(f, "{} if {} else {}", body.node, test.node, orelse.node)
            }
            ExprKind::Compare { left, op, right } => {
                write!(f, "{} {} {}", left.node, op.as_str(), right.node)
            }
            ExprKind::BoolOp { op, values } => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, " {} ", op.as_str())?;
                    }
                    write!(f, "{}", value.node)?;
                }
                Ok(())
            }
            ExprKind::Not(operand) => write!(f, "not {}", operand.node),
            ExprKind::Constant(constant) => write!(f, "{constant}"),
            ExprKind::List(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.node)?;
                }
                write!(f, "]")
            }
            ExprKind::Opaque(text) => write!(f, "{text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditional_default_renders_like_source() {
        let x = || Expr::name("x", 0..0);
        let expr = Expr::if_exp(
            Expr::compare(x(), CompareOp::IsNot, Expr::constant(Constant::None, 0..0), 0..0),
            x(),
            Expr::list(Vec::new(), 0..0),
            0..0,
        );

        assert_eq!(expr.node.to_string(), "x if x is not None else []");
    }

    #[test]
    fn call_renders_positional_then_keyword_arguments() {
        let call = Expr::call(
            Expr::attribute(Expr::name("Parent", 0..0), "__init__", 0..0),
            vec![Expr::name("self", 0..0)],
            vec![Keyword {
                arg: Some("x".into()),
                value: Expr::name("x", 0..0),
                span: 0..0,
            }],
            0..0,
        );

        assert_eq!(call.node.to_string(), "Parent.__init__(self, x=x)");
    }

    #[test]
    fn qualified_name_requires_a_bare_name_on_the_left() {
        let literal = Expr::attribute(Expr::name("Kind", 0..0), "Something", 0..0);
        let (enumeration, member) = literal.as_qualified_name().unwrap();
        assert_eq!(enumeration, "Kind");
        assert_eq!(member, "Something");

        let nested = Expr::attribute(literal.clone(), "other", 0..0);
        assert!(nested.as_qualified_name().is_none());
    }

    #[test]
    fn walk_reaches_calls_nested_in_boolean_operations() {
        let call = |name: &str| {
            Expr::call(Expr::name(name, 0..0), vec![Expr::name("x", 0..0)], vec![], 0..0)
        };
        let expr = Expr::bool_op(
            BoolOp::Or,
            vec![Expr::not(call("is_empty"), 0..0), call("is_valid")],
            0..0,
        );
        assert_eq!(expr.node.to_string(), "not is_empty(x) or is_valid(x)");

        let mut called = Vec::new();
        expr.walk(&mut |node| {
            if let ExprKind::Call { func, .. } = &node.node {
                called.extend(func.as_name().cloned());
            }
        });
        assert_eq!(called, vec!["is_empty", "is_valid"]);
    }

    #[test]
    fn constants_render_with_source_spelling() {
        assert_eq!(Constant::Bool(true).to_string(), "True");
        assert_eq!(Constant::Float(1.0).to_string(), "1.0");
        assert_eq!(Constant::Str("a".into()).to_string(), "\"a\"");
    }
}
