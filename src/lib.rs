//! # packager-base
//!
//! The package resolver pass of a compiler that groups source files into
//! packages with explicit import lists. Constant references that reach into
//! an imported package are rewritten to go through that package's private
//! name, so later phases can tell cross-package references apart.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! resolve   → Package resolver pass (scope paths, nesting, rewriting)
//!   ↓
//! packages  → Package database, imports, file ownership
//!   ↓
//! syntax    → Desugared trees, TreeMap rewriting, printing
//!   ↓
//! base      → Primitives (FileId, Loc, name table, symbols)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → packages → resolve)
// ============================================================================

/// Foundation types: FileId, Loc, name interning, symbols
pub mod base;

/// Syntax: desugared trees and tree rewriting
pub mod syntax;

/// Packages: declared packages, imports, file ownership
pub mod packages;

/// Package resolution over a batch of trees
pub mod resolve;

// Re-export foundation types
pub use base::{FileId, Loc, NameRef, NameTable, SymbolRef, SymbolTable, TextRange, TextSize};

// Re-export the pass entry points
pub use resolve::{
    PackageResolver, PackageResolverPass, ParsedFilesOrCancelled, ResolveError, ResolveOptions,
};
