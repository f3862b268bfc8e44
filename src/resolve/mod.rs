//! Package resolution: rewriting cross-package constant references.
//!
//! Run once per batch, after naming and before constant resolution. For
//! every file the owning package's [`ImportEnv`] is consulted and each
//! constant reference whose scope path names a regular import is routed
//! through that import's package-private name.
//!
//! Entry points:
//! - [`PackageResolver::run`] - a whole batch, sequentially or on rayon
//! - [`PackageResolverPass`] - a single tree against a prepared environment

mod env;
mod error;
mod nesting;
mod options;
mod pass;
mod rewrite;
mod scope_path;

pub use env::{ImportEnv, ResolvedImport};
pub use error::{ResolveError, ResolveResult};
pub use nesting::NestingStack;
pub use options::{Parallelism, ResolveOptions};
pub use pass::{PackageResolver, PackageResolverPass, ParsedFilesOrCancelled};
pub use rewrite::{PRIVATE_NAME_NUM, PrivateNames, RewriteOutcome, try_rewrite};
pub use scope_path::{InsertionPoint, ScopePath, collect};
