//! Extraction of cross-references from description text.
//!
//! Descriptions refer to other parts of the model through roles:
//!
//! - ``:class:`.Name` `` names a symbol (the leading dot is mandatory and
//!   is checked during resolution, not here);
//! - ``:attr:`Name.member` `` or ``:attr:`member` `` names a property or
//!   an enumeration literal;
//! - ``:paramref:`name` `` names an argument of the documented method.
//!
//! A leading `~` (short display form) is stripped from symbol and
//! attribute targets.
//!
//! # Example
//!
//! ```
//! use metamodel_ir::lexer::{scan_references, ReferenceRole};
//!
//! let references = scan_references("Points to :class:`~.Asset`.", 100);
//! assert_eq!(references.len(), 1);
//! assert_eq!(references[0].role, ReferenceRole::Symbol);
//! assert_eq!(references[0].target, ".Asset");
//! ```

pub mod token;

use crate::ast::Span;
use logos::Logos;
use token::TokenKind;

/// Which kind of model element a reference points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    Symbol,
    Attribute,
    Argument,
}

/// A cross-reference found in a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocReference {
    pub role: ReferenceRole,
    /// The target as written, without the role and the backticks.
    pub target: String,
    /// Location of the whole role in the model source.
    pub span: Span,
}

/// Scans `text` for cross-reference roles.
///
/// `offset` is the position of `text` in the model source; the spans of
/// the returned references are shifted by it.
pub fn scan_references(text: &str, offset: usize) -> Vec<DocReference> {
    let mut lexer = TokenKind::lexer(text);
    let mut references = Vec::new();

    while let Some(token) = lexer.next() {
        // Every input is covered by `Text` or `Colon`, so there is nothing
        // to report for a lexing error.
        let Ok(kind) = token else { continue };
        let Some(prefix_len) = kind.prefix_len() else {
            continue;
        };

        let slice = lexer.slice();
        let inner = &slice[prefix_len..slice.len() - 1];
        let (role, target) = match kind {
            TokenKind::ClassRole => (ReferenceRole::Symbol, inner.trim_start_matches('~')),
            TokenKind::AttrRole => (ReferenceRole::Attribute, inner.trim_start_matches('~')),
            _ => (ReferenceRole::Argument, inner),
        };

        let span = lexer.span();
        references.push(DocReference {
            role,
            target: target.to_string(),
            span: (span.start + offset)..(span.end + offset),
        });
    }

    references
}
