//! Import environments.
//!
//! An [`ImportEnv`] is what a package's files can reach through its regular
//! imports, with each imported package's full path looked up once so that
//! matching a scope path is a plain slice comparison.

use crate::base::NameRef;
use crate::packages::{ImportInfo, PackageDb, PackageInfo, PackageRef};

use super::error::{ResolveError, ResolveResult};

/// A regular import with the imported package's names cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    pub package: PackageRef,
    pub full_name: Vec<NameRef>,
    pub mangled_name: NameRef,
}

/// The regular imports available to one package.
#[derive(Debug, Clone)]
pub struct ImportEnv {
    package: PackageRef,
    package_name: Vec<NameRef>,
    info: ImportInfo,
    regular: Vec<ResolvedImport>,
}

impl ImportEnv {
    /// Materialize the regular imports of `package`.
    ///
    /// Every import must name a package in `db`; manifests are validated
    /// before this runs, so a miss is reported as a fault.
    pub fn build(db: &PackageDb, package: &PackageInfo) -> ResolveResult<Self> {
        let info = package.imports().clone();
        let regular = info
            .regular_imports()
            .map(|import| {
                let imported = db
                    .package(import.package)
                    .ok_or(ResolveError::UnknownImport {
                        package: package.id(),
                        imported: import.package,
                    })?;
                Ok(ResolvedImport {
                    package: imported.id(),
                    full_name: imported.full_name().to_vec(),
                    mangled_name: imported.mangled_name(),
                })
            })
            .collect::<ResolveResult<Vec<_>>>()?;

        debug_assert_eq!(regular.len(), info.regular_count());
        Ok(Self {
            package: package.id(),
            package_name: package.full_name().to_vec(),
            info,
            regular,
        })
    }

    /// The first regular import whose full name is exactly `path`.
    pub fn match_path(&self, path: &[NameRef]) -> Option<&ResolvedImport> {
        self.regular
            .iter()
            .find(|import| import.full_name.as_slice() == path)
    }

    /// The package this environment belongs to.
    pub fn package(&self) -> PackageRef {
        self.package
    }

    pub fn package_name(&self) -> &[NameRef] {
        &self.package_name
    }

    pub fn info(&self) -> &ImportInfo {
        &self.info
    }

    pub fn regular_imports(&self) -> &[ResolvedImport] {
        &self.regular
    }

    pub fn len(&self) -> usize {
        self.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_empty()
    }
}
