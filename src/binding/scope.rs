use std::{collections::HashMap, rc::Rc};

use crate::symbols::symbols::{FunctionSymbol, Symbol, VariableSymbol};

/// One level of lexical scope. Variables and functions share a namespace;
/// declaration order is kept so the global scope can hand its symbols out
/// in source order.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: Vec<Symbol>,
    lookup: HashMap<String, usize>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Declares `symbol` unless this level already has something with the
    /// same name.
    pub fn try_declare(&mut self, symbol: Symbol) -> bool {
        if self.lookup.contains_key(symbol.name()) {
            return false;
        }

        self.lookup.insert(symbol.name().to_string(), self.symbols.len());
        self.symbols.push(symbol);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.lookup.get(name).map(|index| &self.symbols[*index])
    }

    pub fn variables(&self) -> Vec<Rc<VariableSymbol>> {
        self.symbols
            .iter()
            .filter_map(|symbol| match symbol {
                Symbol::Variable(variable) => Some(Rc::clone(variable)),
                _ => None,
            })
            .collect()
    }

    pub fn functions(&self) -> Vec<Rc<FunctionSymbol>> {
        self.symbols
            .iter()
            .filter_map(|symbol| match symbol {
                Symbol::Function(function) => Some(Rc::clone(function)),
                _ => None,
            })
            .collect()
    }
}

/// The chain of scopes visible at the current binding point, stored
/// innermost last. A scope's parent is simply the entry below it.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack::default()
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    pub fn current(&self) -> &Scope {
        self.scopes
            .last()
            .expect("the binder always has at least one scope")
    }

    /// Declares into the innermost scope.
    pub fn try_declare(&mut self, symbol: Symbol) -> bool {
        self.scopes
            .last_mut()
            .expect("the binder always has at least one scope")
            .try_declare(symbol)
    }

    /// Walks outward from the innermost scope until `name` is found.
    pub fn try_lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
