//! Scope paths of constant references.
//!
//! For `Baz::Qux::Widget` the scope path is `[Baz, Qux]` with terminal name
//! `Widget`. The chain is linked from the tip outward, so segments are
//! gathered innermost-first and reversed at the end.

use crate::base::{NameRef, NameTable};
use crate::syntax::{ConstantRef, Expr};

/// What ended the walk up a candidate chain.
///
/// Either way the edge to splice into is the reference's own scope edge,
/// which holds the whole qualifying prefix and is owned by whoever holds the
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// The chain reached a package marker (the registry or a
    /// package-private constant), which was not included in the path.
    PackageMarker,
    /// The chain reached the top of the tree (nothing, or the root
    /// constant `::`) after at least one segment.
    ChainRoot,
}

/// Ancestors of one constant reference, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePath {
    pub segments: Vec<NameRef>,
    pub name: NameRef,
    pub insertion: Option<InsertionPoint>,
}

impl ScopePath {
    /// Whether the reference may be rewritten at all.
    pub fn is_candidate(&self) -> bool {
        self.insertion.is_some()
    }

    pub fn segments(&self) -> &[NameRef] {
        &self.segments
    }

    pub fn show(&self, names: &NameTable) -> String {
        names.show_path(&self.segments)
    }
}

/// Collect the scope path of `node`.
///
/// References that are themselves package markers belong to an already
/// rewritten chain and never become candidates, which keeps the rewrite
/// idempotent. An unqualified reference has no insertion point, and neither
/// has a chain rooted at anything but the top of the tree (`x::A::B`, or a
/// constant already resolved to some other symbol).
pub fn collect(names: &NameTable, node: &ConstantRef) -> ScopePath {
    let mut path = ScopePath {
        segments: Vec::new(),
        name: node.name,
        insertion: None,
    };
    if names.is_packager_name(node.name) {
        return path;
    }

    let mut scope = &node.scope;
    let insertion = loop {
        match scope {
            Expr::ConstantRef(parent) if names.is_packager_name(parent.name) => {
                break Some(InsertionPoint::PackageMarker);
            }
            Expr::ConstantRef(parent) => {
                path.segments.push(parent.name);
                scope = &parent.scope;
            }
            _ if path.segments.is_empty() => break None,
            Expr::EmptyTree => break Some(InsertionPoint::ChainRoot),
            Expr::Constant(root) if root.symbol.is_root() => {
                break Some(InsertionPoint::ChainRoot);
            }
            _ => break None,
        }
    };

    path.segments.reverse();
    path.insertion = insertion;
    path
}
