//! Foundation types for the packager.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Interned file identifiers
//! - [`Loc`], [`TextRange`], [`TextSize`] - Source locations (byte offsets)
//! - [`NameRef`], [`NameTable`], [`MutationPermit`] - Shared name interning
//! - [`SymbolRef`], [`SymbolTable`] - Definition symbols
//!
//! This module has NO dependencies on other packager modules.

mod file_id;
mod intern;
mod span;
mod symbol;

pub use file_id::FileId;
pub use intern::{MutationPermit, NameData, NameRef, NameTable, NameTableError, UniqueNameKind};
pub use span::{Loc, TextRange, TextSize};
pub use symbol::{SymbolData, SymbolRef, SymbolTable};

// Re-export text-size types for convenience
pub use text_size;
