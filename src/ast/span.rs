//! Source locations attached to syntax nodes and model definitions.

use std::ops::Range;

/// A byte range into the model source.
///
/// The front end owns the source text; this crate only carries the ranges
/// so that diagnostics can point back at the offending definition.
pub type Span = Range<usize>;

/// A value paired with the location it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub node: T,
    /// Where the value appears in the model source.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned value.
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Wraps a value that has no meaningful source location, e.g. a node
    /// synthesized by a test or by a programmatic front end.
    pub fn detached(node: T) -> Self {
        Self { node, span: 0..0 }
    }
}
