//! The finished symbol table.
//!
//! All symbols live in a single arena indexed by [`SymbolId`]; every
//! cross-reference in the IR is such an id (or an [`InterfaceId`] into the
//! interface arena), so the table is the only owner of the model.

use super::symbols::{
    Class, ConstrainedPrimitive, Enumeration, Interface, Method, Property, Symbol, Verification,
};
use super::types::Description;
use super::SymbolId;
use crate::ast::Identifier;
use std::collections::{BTreeMap, HashMap};

/// Unique identifier for an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(usize);

impl InterfaceId {
    /// Creates a new interface ID.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Resolved symbols of the model.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// All symbols in declaration order.
    symbols: Vec<Symbol>,

    /// Symbol ids indexed by name.
    by_name: HashMap<Identifier, SymbolId>,

    /// Interfaces in the topological order of their base classes.
    interfaces: Vec<Interface>,

    /// Classes and constrained primitives, parents before children.
    topologically_sorted: Vec<SymbolId>,

    /// The class that association references are represented with.
    ref_association: SymbolId,

    /// Description of the model as a whole.
    description: Option<Description>,

    /// Verification functions in declaration order.
    verification_functions: Vec<Verification>,
}

impl SymbolTable {
    pub(crate) fn new(
        symbols: Vec<Symbol>,
        interfaces: Vec<Interface>,
        topologically_sorted: Vec<SymbolId>,
        ref_association: SymbolId,
        description: Option<Description>,
        verification_functions: Vec<Verification>,
    ) -> Self {
        let by_name = symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (symbol.name().clone(), SymbolId::new(index)))
            .collect();

        Self {
            symbols,
            by_name,
            interfaces,
            topologically_sorted,
            ref_association,
            description,
            verification_functions,
        }
    }

    /// Looks up a symbol by name.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    /// Looks up a symbol by name and returns the symbol itself.
    pub fn find_symbol(&self, name: &str) -> Option<&Symbol> {
        self.find(name).map(|id| self.get(id))
    }

    /// Looks up a class by name.
    pub fn find_class(&self, name: &str) -> Option<&Class> {
        self.find_symbol(name).and_then(Symbol::as_class)
    }

    /// Looks up an enumeration by name.
    pub fn find_enumeration(&self, name: &str) -> Option<&Enumeration> {
        self.find_symbol(name).and_then(Symbol::as_enumeration)
    }

    /// Returns the symbol with the given id.
    ///
    /// Ids are only ever handed out by the translation that built this
    /// table, so the lookup cannot miss.
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.as_usize()]
    }

    pub fn class(&self, id: SymbolId) -> Option<&Class> {
        self.get(id).as_class()
    }

    pub fn constrained_primitive(&self, id: SymbolId) -> Option<&ConstrainedPrimitive> {
        self.get(id).as_constrained_primitive()
    }

    pub fn enumeration(&self, id: SymbolId) -> Option<&Enumeration> {
        self.get(id).as_enumeration()
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
            .map(|(index, symbol)| (SymbolId::new(index), symbol))
    }

    /// Iterates over the classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = (SymbolId, &Class)> {
        self.symbols()
            .filter_map(|(id, symbol)| symbol.as_class().map(|class| (id, class)))
    }

    pub fn constrained_primitives(&self) -> impl Iterator<Item = (SymbolId, &ConstrainedPrimitive)> {
        self.symbols().filter_map(|(id, symbol)| {
            symbol
                .as_constrained_primitive()
                .map(|primitive| (id, primitive))
        })
    }

    pub fn enumerations(&self) -> impl Iterator<Item = (SymbolId, &Enumeration)> {
        self.symbols().filter_map(|(id, symbol)| {
            symbol.as_enumeration().map(|enumeration| (id, enumeration))
        })
    }

    /// Classes and constrained primitives, parents before children.
    pub fn topologically_sorted(&self) -> &[SymbolId] {
        &self.topologically_sorted
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.interfaces[id.as_usize()]
    }

    /// Iterates over the interfaces, parents before children.
    pub fn interfaces(&self) -> impl Iterator<Item = (InterfaceId, &Interface)> {
        self.interfaces
            .iter()
            .enumerate()
            .map(|(index, interface)| (InterfaceId(index), interface))
    }

    /// The class an interface is built upon.
    pub fn interface_base(&self, id: InterfaceId) -> Option<&Class> {
        self.class(self.interface(id).base)
    }

    /// Properties of an interface, including the inherited ones.
    pub fn interface_properties(&self, id: InterfaceId) -> &[Property] {
        self.interface_base(id)
            .map(|class| class.properties.as_slice())
            .unwrap_or_default()
    }

    /// Method signatures of an interface, including the inherited ones.
    pub fn interface_signatures(&self, id: InterfaceId) -> &[Method] {
        self.interface_base(id)
            .map(|class| class.methods.as_slice())
            .unwrap_or_default()
    }

    /// The class that association references are represented with.
    pub fn ref_association(&self) -> SymbolId {
        self.ref_association
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn verification_functions(&self) -> &[Verification] {
        &self.verification_functions
    }

    /// Looks up a verification function by name.
    pub fn find_verification_function(&self, name: &str) -> Option<&Verification> {
        self.verification_functions
            .iter()
            .find(|function| function.name == name)
    }

    /// Ancestor sequence of a class, root-most first; empty for other
    /// symbols.
    pub fn ancestors(&self, id: SymbolId) -> &[SymbolId] {
        self.class(id)
            .map(|class| class.ancestors.as_slice())
            .unwrap_or_default()
    }

    /// Descendants of a class or a constrained primitive.
    pub fn descendants(&self, id: SymbolId) -> &[SymbolId] {
        match self.get(id) {
            Symbol::Class(class) => &class.descendants,
            Symbol::ConstrainedPrimitive(primitive) => &primitive.descendants,
            Symbol::Enumeration(_) => &[],
        }
    }

    /// Maps every interface to its concrete implementers.
    ///
    /// An implementer is a concrete class whose own interface inherits,
    /// directly or transitively, from the interface, or which is the base
    /// of the interface. Implementers are listed in topological order.
    pub fn map_interface_implementers(&self) -> BTreeMap<InterfaceId, Vec<SymbolId>> {
        let mut implementers: BTreeMap<InterfaceId, Vec<SymbolId>> = self
            .interfaces()
            .map(|(id, _)| (id, Vec::new()))
            .collect();

        for &id in &self.topologically_sorted {
            let Some(class) = self.class(id) else {
                continue;
            };
            if class.is_abstract() {
                continue;
            }

            // Interfaces reachable from the class, each once.
            let mut reachable: Vec<InterfaceId> = Vec::new();
            let mut stack: Vec<InterfaceId> = class.interfaces.clone();
            stack.extend(class.interface);
            while let Some(interface) = stack.pop() {
                if reachable.contains(&interface) {
                    continue;
                }
                reachable.push(interface);
                stack.extend(self.interface(interface).inheritances.iter().copied());
            }

            for interface in reachable {
                implementers.entry(interface).or_default().push(id);
            }
        }

        implementers
    }
}
