//! Definition symbols.
//!
//! Symbols are entered by the namer before the packager runs. The packager
//! only reads them: class and module definitions carry their symbol, and the
//! nesting tracker records which ones enclose the current node.

use std::fmt;

use rustc_hash::FxHashMap;

use super::{NameRef, NameTable};

/// Handle to a definition symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolRef(pub u32);

impl SymbolRef {
    /// The synthetic top-level definition every file is wrapped in.
    pub const ROOT: SymbolRef = SymbolRef(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolData {
    pub name: NameRef,
    pub owner: SymbolRef,
}

/// Arena of definition symbols, keyed by (owner, name).
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<SymbolData>,
    by_owner: FxHashMap<(SymbolRef, NameRef), SymbolRef>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: vec![SymbolData {
                name: NameRef::ROOT,
                owner: SymbolRef::ROOT,
            }],
            by_owner: FxHashMap::default(),
        }
    }

    /// Enter a class or module named `name` inside `owner`.
    ///
    /// Entering the same (owner, name) pair twice returns the first symbol.
    pub fn enter_class(&mut self, owner: SymbolRef, name: NameRef) -> SymbolRef {
        if let Some(existing) = self.by_owner.get(&(owner, name)) {
            return *existing;
        }
        let symbol = SymbolRef(self.symbols.len() as u32);
        self.symbols.push(SymbolData { name, owner });
        self.by_owner.insert((owner, name), symbol);
        symbol
    }

    /// Enter every segment of `path` as nested classes under the root and
    /// return the innermost one.
    pub fn enter_class_path(&mut self, path: &[NameRef]) -> SymbolRef {
        path.iter()
            .fold(SymbolRef::ROOT, |owner, name| self.enter_class(owner, *name))
    }

    pub fn get(&self, symbol: SymbolRef) -> Option<&SymbolData> {
        self.symbols.get(symbol.index())
    }

    pub fn lookup(&self, owner: SymbolRef, name: NameRef) -> Option<SymbolRef> {
        self.by_owner.get(&(owner, name)).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Names from the root (exclusive) down to `symbol`.
    pub fn full_name(&self, symbol: SymbolRef) -> Vec<NameRef> {
        let mut path = Vec::new();
        let mut current = symbol;
        while !current.is_root() {
            let Some(data) = self.get(current) else { break };
            path.push(data.name);
            current = data.owner;
        }
        path.reverse();
        path
    }

    pub fn show(&self, symbol: SymbolRef, names: &NameTable) -> String {
        if symbol.is_root() {
            return names.show(NameRef::ROOT);
        }
        names.show_path(&self.full_name(symbol))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
