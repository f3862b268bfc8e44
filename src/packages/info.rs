//! Package identities and their declared imports.

use std::fmt;

use crate::base::{NameRef, NameTable};

/// Handle to a package in a [`PackageDb`](super::PackageDb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageRef(pub u32);

impl PackageRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pkg#{}", self.0)
    }
}

/// How a package depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// A direct dependency usable from every file of the package.
    Regular,
    /// A dependency only test files may use.
    Test,
}

/// One declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub package: PackageRef,
    pub kind: ImportKind,
}

/// Everything a package's manifest declares about its dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    pub package: PackageRef,
    /// Imports in declaration order.
    pub imports: Vec<Import>,
    /// Name prefixes this package re-exports to its importers.
    pub exports: Vec<Vec<NameRef>>,
}

impl ImportInfo {
    pub(super) fn new(package: PackageRef) -> Self {
        Self {
            package,
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }

    /// Regular imports, in declaration order.
    pub fn regular_imports(&self) -> impl Iterator<Item = &Import> {
        self.imports
            .iter()
            .filter(|import| import.kind == ImportKind::Regular)
    }

    pub fn regular_count(&self) -> usize {
        self.regular_imports().count()
    }

    pub fn test_imports(&self) -> impl Iterator<Item = &Import> {
        self.imports
            .iter()
            .filter(|import| import.kind == ImportKind::Test)
    }
}

/// A declared package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    id: PackageRef,
    full_name: Vec<NameRef>,
    mangled_name: NameRef,
    imports: ImportInfo,
}

impl PackageInfo {
    pub(super) fn new(id: PackageRef, full_name: Vec<NameRef>, mangled_name: NameRef) -> Self {
        Self {
            id,
            full_name,
            mangled_name,
            imports: ImportInfo::new(id),
        }
    }

    pub fn id(&self) -> PackageRef {
        self.id
    }

    /// The package's fully qualified constant path, e.g. `[Foo, Bar]`.
    pub fn full_name(&self) -> &[NameRef] {
        &self.full_name
    }

    /// The unqualified name that identifies the package in generated code,
    /// e.g. `Foo_Bar_Package`.
    pub fn mangled_name(&self) -> NameRef {
        self.mangled_name
    }

    pub fn imports(&self) -> &ImportInfo {
        &self.imports
    }

    pub(super) fn imports_mut(&mut self) -> &mut ImportInfo {
        &mut self.imports
    }

    pub fn show(&self, names: &NameTable) -> String {
        names.show_path(&self.full_name)
    }
}
