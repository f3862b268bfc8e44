//! Tracking of the enclosing class and module definitions.

use crate::base::SymbolRef;
use crate::syntax::ClassDef;

use super::error::{ResolveError, ResolveResult};

/// The definitions enclosing the node currently being visited, innermost
/// last. The synthetic root definition is never on the stack.
#[derive(Debug, Clone, Default)]
pub struct NestingStack {
    scopes: Vec<SymbolRef>,
    max_depth: usize,
}

impl NestingStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `def`. Returns whether a scope was pushed, which tells the
    /// caller whether the matching [`exit`](Self::exit) is due.
    ///
    /// A definition without a resolved name must be the root; anything else
    /// is a fault.
    pub fn enter(&mut self, def: &ClassDef) -> ResolveResult<bool> {
        if def.has_resolved_name() {
            self.scopes.push(def.symbol);
            self.max_depth = self.max_depth.max(self.scopes.len());
            return Ok(true);
        }
        if def.symbol.is_root() {
            return Ok(false);
        }
        Err(ResolveError::UnnamedDefinition {
            symbol: def.symbol,
            loc: def.loc,
        })
    }

    /// Leave the innermost definition.
    pub fn exit(&mut self) -> Option<SymbolRef> {
        self.scopes.pop()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The innermost enclosing definition.
    pub fn current(&self) -> Option<SymbolRef> {
        self.scopes.last().copied()
    }

    /// Enclosing definitions, outermost first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = SymbolRef> + '_ {
        self.scopes.iter().copied()
    }

    /// Deepest nesting seen so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
