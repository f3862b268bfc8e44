//! The package database: which packages exist, what they import, and which
//! package owns each file.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::base::{FileId, MutationPermit, NameRef};

use super::info::{Import, ImportInfo, ImportKind, PackageInfo, PackageRef};

/// Errors raised while assembling a [`PackageDb`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackageDbError {
    #[error("a package name needs at least one segment")]
    EmptyName,

    #[error("package name `{name}` contains `_`")]
    UnderscoreInName { name: String },

    #[error("package `{name}` is declared more than once")]
    DuplicatePackage { name: String },

    #[error("unknown package {0}")]
    UnknownPackage(PackageRef),

    #[error("{file} already belongs to package {package}")]
    FileAlreadyAssigned { file: FileId, package: PackageRef },
}

/// Read-only view of every declared package.
#[derive(Debug, Clone, Default)]
pub struct PackageDb {
    packages: Vec<PackageInfo>,
    /// Full name -> package (IndexMap preserves declaration order).
    by_name: IndexMap<Vec<NameRef>, PackageRef>,
    files: FxHashMap<FileId, PackageRef>,
}

impl PackageDb {
    pub fn builder() -> PackageDbBuilder {
        PackageDbBuilder::default()
    }

    pub fn package(&self, package: PackageRef) -> Option<&PackageInfo> {
        self.packages.get(package.index())
    }

    /// The package owning `file`, if any.
    pub fn package_for_file(&self, file: FileId) -> Option<&PackageInfo> {
        self.files
            .get(&file)
            .and_then(|package| self.package(*package))
    }

    pub fn import_info(&self, package: PackageRef) -> Option<&ImportInfo> {
        self.package(package).map(PackageInfo::imports)
    }

    pub fn full_name(&self, package: PackageRef) -> Option<&[NameRef]> {
        self.package(package).map(PackageInfo::full_name)
    }

    /// Find a package by its full name.
    pub fn lookup(&self, full_name: &[NameRef]) -> Option<PackageRef> {
        self.by_name.get(full_name).copied()
    }

    /// All packages in declaration order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageInfo> {
        self.by_name
            .values()
            .filter_map(|package| self.package(*package))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Incrementally declares packages, then freezes them into a [`PackageDb`].
///
/// Imports are recorded as declared. Whether an imported package exists or
/// may be imported is the manifest validator's business, not the builder's.
#[derive(Debug, Default)]
pub struct PackageDbBuilder {
    db: PackageDb,
}

impl PackageDbBuilder {
    /// Declare a package. Its mangled name (`Foo_Bar_Package` for `Foo::Bar`)
    /// is interned through `permit`. Segments may not contain `_`, which
    /// keeps mangled names distinct.
    pub fn add_package(
        &mut self,
        permit: &mut MutationPermit<'_>,
        full_name: Vec<NameRef>,
    ) -> Result<PackageRef, PackageDbError> {
        if full_name.is_empty() {
            return Err(PackageDbError::EmptyName);
        }
        let names = permit.table();
        if full_name
            .iter()
            .any(|segment| names.show(*segment).contains('_'))
        {
            return Err(PackageDbError::UnderscoreInName {
                name: names.show_path(&full_name),
            });
        }
        if self.db.by_name.contains_key(&full_name) {
            return Err(PackageDbError::DuplicatePackage {
                name: names.show_path(&full_name),
            });
        }

        let mut mangled = full_name
            .iter()
            .map(|segment| names.show(*segment))
            .collect::<Vec<_>>()
            .join("_");
        mangled.push_str("_Package");
        let mangled_name = permit.enter_utf8(&mangled);

        let id = PackageRef(self.db.packages.len() as u32);
        tracing::trace!("[PACKAGE_DB] declared {} as {}", mangled, id);
        self.db
            .packages
            .push(PackageInfo::new(id, full_name.clone(), mangled_name));
        self.db.by_name.insert(full_name, id);
        Ok(id)
    }

    pub fn add_import(
        &mut self,
        package: PackageRef,
        imported: PackageRef,
        kind: ImportKind,
    ) -> Result<(), PackageDbError> {
        self.package_mut(package)?
            .imports_mut()
            .imports
            .push(Import {
                package: imported,
                kind,
            });
        Ok(())
    }

    pub fn add_export(
        &mut self,
        package: PackageRef,
        prefix: Vec<NameRef>,
    ) -> Result<(), PackageDbError> {
        self.package_mut(package)?.imports_mut().exports.push(prefix);
        Ok(())
    }

    /// Record that `file` belongs to `package`.
    pub fn assign_file(&mut self, file: FileId, package: PackageRef) -> Result<(), PackageDbError> {
        self.package_mut(package)?;
        if let Some(existing) = self.db.files.get(&file) {
            return Err(PackageDbError::FileAlreadyAssigned {
                file,
                package: *existing,
            });
        }
        self.db.files.insert(file, package);
        Ok(())
    }

    pub fn build(self) -> PackageDb {
        self.db
    }

    fn package_mut(&mut self, package: PackageRef) -> Result<&mut PackageInfo, PackageDbError> {
        self.db
            .packages
            .get_mut(package.index())
            .ok_or(PackageDbError::UnknownPackage(package))
    }
}
