//! Packages: named groups of files with explicit import lists.
//!
//! The database is assembled from validated package manifests before the
//! packager runs; the packager only reads it.

mod db;
mod info;

pub use db::{PackageDb, PackageDbBuilder, PackageDbError};
pub use info::{Import, ImportInfo, ImportKind, PackageInfo, PackageRef};
