//! Internal-consistency faults of the package resolver.
//!
//! None of these are user diagnostics: each one means an earlier phase (or
//! the packager itself) broke an invariant, and the batch is abandoned.

use thiserror::Error;

use crate::base::{FileId, Loc, NameTableError, SymbolRef};
use crate::packages::PackageRef;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// A class or module without a resolved name that is not the root.
    #[error("definition {symbol} at {loc:?} has no resolved name but is not the root")]
    UnnamedDefinition { symbol: SymbolRef, loc: Loc },

    /// A declared import that names no known package.
    #[error("package {package} imports unknown package {imported}")]
    UnknownImport {
        package: PackageRef,
        imported: PackageRef,
    },

    /// A file no package owns, when unowned files are not allowed.
    #[error("{0} does not belong to any package")]
    UnownedFile(FileId),

    #[error(transparent)]
    NameTable(#[from] NameTableError),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
