//! Name-indexed storage of the parsed symbols.

use super::{Class, Description, Enumeration, Function};
use crate::ast::{Identifier, Span, Spanned};
use crate::diag::Diag;
use std::collections::HashMap;
use std::fmt;

/// Stable handle of a symbol.
///
/// A symbol keeps its id from the parsed table through to the finished
/// IR, so ids handed out by [`SymbolTable::find`] remain valid for
/// [`crate::ir::SymbolTable`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(usize);

impl SymbolId {
    /// Creates a new symbol ID.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A top-level definition of the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Class(Class),
    Enumeration(Enumeration),
}

impl Symbol {
    pub fn name(&self) -> &Identifier {
        match self {
            Symbol::Class(class) => &class.name,
            Symbol::Enumeration(enumeration) => &enumeration.name,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Symbol::Class(class) => &class.span,
            Symbol::Enumeration(enumeration) => &enumeration.span,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Symbol::Class(class) => Some(class),
            Symbol::Enumeration(_) => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&Enumeration> {
        match self {
            Symbol::Enumeration(enumeration) => Some(enumeration),
            Symbol::Class(_) => None,
        }
    }
}

/// Symbols of the model in declaration order, with a name index.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// All symbols in declaration order.
    symbols: Vec<Symbol>,

    /// Symbol ids indexed by name.
    by_name: HashMap<Identifier, SymbolId>,

    /// Name of the class that association references (`Ref[...]`) are
    /// represented with.
    ref_association: Spanned<Identifier>,

    /// Description of the model as a whole.
    description: Option<Description>,

    /// Verification functions in declaration order. Their names may
    /// coincide with symbol names.
    verification_functions: Vec<Function>,
}

impl SymbolTable {
    /// Indexes `symbols` by name.
    ///
    /// Fails if two symbols share a name.
    pub fn new(
        symbols: Vec<Symbol>,
        ref_association: impl Into<Identifier>,
    ) -> Result<Self, Diag> {
        let mut by_name = HashMap::with_capacity(symbols.len());
        let mut duplicates = Vec::new();

        for (index, symbol) in symbols.iter().enumerate() {
            if let Some(previous) = by_name.insert(symbol.name().clone(), SymbolId(index)) {
                duplicates.push(
                    Diag::at(
                        symbol.span().clone(),
                        format!("The symbol has been defined more than once: {}", symbol.name()),
                    )
                    .with_secondary_label(symbols[previous.0].span().clone(), "first defined here"),
                );
            }
        }

        if !duplicates.is_empty() {
            return Err(Diag::composite(
                "Failed to index the parsed symbols",
                duplicates,
            ));
        }

        Ok(Self {
            symbols,
            by_name,
            ref_association: Spanned::detached(ref_association.into()),
            description: None,
            verification_functions: Vec::new(),
        })
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_verification_function(mut self, function: Function) -> Self {
        self.verification_functions.push(function);
        self
    }

    pub fn with_ref_association_span(mut self, span: Span) -> Self {
        self.ref_association.span = span;
        self
    }

    /// Looks up a symbol by name.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    /// Looks up a class by name.
    pub fn find_class(&self, name: &str) -> Option<(SymbolId, &Class)> {
        let id = self.find(name)?;
        self.get(id).as_class().map(|class| (id, class))
    }

    /// Looks up an enumeration by name.
    pub fn find_enumeration(&self, name: &str) -> Option<(SymbolId, &Enumeration)> {
        let id = self.find(name)?;
        self.get(id).as_enumeration().map(|enumeration| (id, enumeration))
    }

    /// Returns the symbol with the given id.
    ///
    /// Ids are only ever handed out by this table, so the lookup cannot
    /// miss.
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    /// Returns the class with the given id, if the symbol is a class.
    pub fn class(&self, id: SymbolId) -> Option<&Class> {
        self.get(id).as_class()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over all symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId(index), symbol))
    }

    /// Iterates over the classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = (SymbolId, &Class)> {
        self.symbols()
            .filter_map(|(id, symbol)| symbol.as_class().map(|class| (id, class)))
    }

    /// Iterates over the enumerations in declaration order.
    pub fn enumerations(&self) -> impl Iterator<Item = (SymbolId, &Enumeration)> {
        self.symbols().filter_map(|(id, symbol)| {
            symbol.as_enumeration().map(|enumeration| (id, enumeration))
        })
    }

    pub fn ref_association(&self) -> &Spanned<Identifier> {
        &self.ref_association
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn verification_functions(&self) -> &[Function] {
        &self.verification_functions
    }
}
