//! Syntax-level building blocks shared by the parsed model and the passes.
//!
//! The front end hands over constructor bodies, default values and
//! invariant bodies as these restricted trees; everything the semantic
//! passes do not inspect structurally is preserved as opaque text.

pub mod expr;
mod span;
pub mod stmt;

pub use expr::{BoolOp, CompareOp, Constant, Expr, ExprKind, Identifier, Keyword};
pub use span::{Span, Spanned};
pub use stmt::{Stmt, StmtKind};
