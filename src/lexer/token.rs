//! Tokens of description text.

use logos::Logos;

/// The kind of a lexical token in a description.
///
/// Descriptions are free text with embedded roles of the form
/// ``:role:`target` ``. Only the roles that refer to model elements are
/// distinguished; every other role and all plain text are skipped over by
/// the reference scanner.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// ``:class:`.Asset` ``
    #[regex(r":class:`[^`]*`", priority = 10)]
    ClassRole,

    /// ``:attr:`Asset.id` `` or ``:attr:`id` ``
    #[regex(r":attr:`[^`]*`", priority = 10)]
    AttrRole,

    /// ``:paramref:`value` ``
    #[regex(r":paramref:`[^`]*`", priority = 10)]
    ParamRefRole,

    /// Any other role, e.g. ``:constraintref:`AASd-100` ``.
    #[regex(r":[A-Za-z_][A-Za-z0-9_-]*:`[^`]*`", priority = 2)]
    OtherRole,

    /// A colon that does not open a role.
    #[token(":")]
    Colon,

    #[regex(r"[^:]+")]
    Text,
}

impl TokenKind {
    /// Length of the `:role:`` prefix, for the roles with a target.
    pub(crate) fn prefix_len(self) -> Option<usize> {
        match self {
            TokenKind::ClassRole => Some(":class:`".len()),
            TokenKind::AttrRole => Some(":attr:`".len()),
            TokenKind::ParamRefRole => Some(":paramref:`".len()),
            TokenKind::OtherRole | TokenKind::Colon | TokenKind::Text => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        TokenKind::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn roles_are_recognized_by_name() {
        assert_eq!(
            kinds("See :class:`.Asset` and :attr:`id`."),
            vec![
                TokenKind::Text,
                TokenKind::ClassRole,
                TokenKind::Text,
                TokenKind::AttrRole,
                TokenKind::Text,
            ]
        );
    }

    #[test]
    fn unknown_roles_and_stray_colons_are_kept_apart() {
        assert_eq!(
            kinds("Note: :constraintref:`AASd-100` :paramref:`value`"),
            vec![
                TokenKind::Text,
                TokenKind::Colon,
                TokenKind::Text,
                TokenKind::OtherRole,
                TokenKind::Text,
                TokenKind::ParamRefRole,
            ]
        );
    }
}
