//! The shared name table.
//!
//! Every name in the batch (identifiers, constant names, and the unique names
//! minted by compiler passes) is interned here and referred to by a
//! [`NameRef`]. Reads are always allowed. Writes require a [`MutationPermit`],
//! of which at most one is alive per table: a pass takes the permit at the
//! start of a run and drops it at the end, so all mutations during the run
//! appear to come from a single writer.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;

/// Handle to an interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameRef(u32);

impl NameRef {
    /// The `<PackageRegistry>` constant. Package-private names live under it.
    pub const PACKAGE_REGISTRY: NameRef = NameRef(1);

    /// The `<root>` name of the top-level definition.
    pub const ROOT: NameRef = NameRef(2);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kinds of compiler-generated unique names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueNameKind {
    /// The private access surface of an imported package.
    PackagerPrivate,
}

/// What a [`NameRef`] stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameData {
    /// A plain identifier.
    Utf8(SmolStr),
    /// A name no source text can spell, disambiguated by `num`.
    Unique {
        kind: UniqueNameKind,
        original: NameRef,
        num: u32,
    },
    /// The constant-namespace version of `original`.
    Constant { original: NameRef },
}

/// Errors raised by the name table itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameTableError {
    /// A second writer tried to start while a permit was still alive.
    #[error("the name table mutation permit is already held")]
    PermitHeld,
}

#[derive(Debug, Default)]
struct Names {
    data: Vec<NameData>,
    index: FxHashMap<NameData, NameRef>,
}

impl Names {
    fn lookup(&self, data: &NameData) -> Option<NameRef> {
        self.index.get(data).copied()
    }

    fn enter(&mut self, data: NameData) -> NameRef {
        if let Some(existing) = self.lookup(&data) {
            return existing;
        }
        let name = NameRef(self.data.len() as u32);
        self.data.push(data.clone());
        self.index.insert(data, name);
        name
    }

    fn get(&self, name: NameRef) -> Option<&NameData> {
        self.data.get(name.index())
    }

    fn is_packager_name(&self, name: NameRef) -> bool {
        if name == NameRef::PACKAGE_REGISTRY {
            return true;
        }
        match self.get(name) {
            Some(NameData::Constant { original }) => matches!(
                self.get(*original),
                Some(NameData::Unique {
                    kind: UniqueNameKind::PackagerPrivate,
                    ..
                })
            ),
            _ => false,
        }
    }

    fn write_name(&self, out: &mut String, name: NameRef) {
        use std::fmt::Write;

        match self.get(name) {
            Some(NameData::Utf8(text)) => out.push_str(text),
            Some(NameData::Unique { original, num, .. }) => {
                out.push('<');
                self.write_name(out, *original);
                let _ = write!(out, "${num}>");
            }
            Some(NameData::Constant { original }) => self.write_name(out, *original),
            None => {
                let _ = write!(out, "<invalid name {}>", name.0);
            }
        }
    }
}

/// Interning table for every name in a batch.
#[derive(Debug)]
pub struct NameTable {
    names: RwLock<Names>,
    writer_active: AtomicBool,
}

impl NameTable {
    /// Create a table holding only the reserved names.
    pub fn new() -> Self {
        let mut names = Names::default();
        let registry = names.enter(NameData::Utf8(SmolStr::new_static("<PackageRegistry>")));
        let registry = names.enter(NameData::Constant { original: registry });
        let root = names.enter(NameData::Utf8(SmolStr::new_static("<root>")));
        debug_assert_eq!(registry, NameRef::PACKAGE_REGISTRY);
        debug_assert_eq!(root, NameRef::ROOT);

        Self {
            names: RwLock::new(names),
            writer_active: AtomicBool::new(false),
        }
    }

    /// Acquire the right to mutate this table.
    ///
    /// The permit is released when it is dropped. Fails instead of blocking
    /// if another permit is alive.
    pub fn mutation_permit(&self) -> Result<MutationPermit<'_>, NameTableError> {
        self.writer_active
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| NameTableError::PermitHeld)?;
        tracing::trace!("[NAME_TABLE] mutation permit acquired");
        Ok(MutationPermit { table: self })
    }

    /// Whether a mutation permit is currently alive.
    pub fn is_permit_held(&self) -> bool {
        self.writer_active.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.names.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self, name: NameRef) -> Option<NameData> {
        self.names.read().get(name).cloned()
    }

    pub fn lookup_utf8(&self, text: &str) -> Option<NameRef> {
        self.names.read().lookup(&NameData::Utf8(SmolStr::new(text)))
    }

    pub fn lookup_unique(
        &self,
        kind: UniqueNameKind,
        original: NameRef,
        num: u32,
    ) -> Option<NameRef> {
        self.names.read().lookup(&NameData::Unique {
            kind,
            original,
            num,
        })
    }

    pub fn lookup_constant(&self, original: NameRef) -> Option<NameRef> {
        self.names.read().lookup(&NameData::Constant { original })
    }

    /// Whether `name` marks a package boundary: the package registry itself or
    /// a package-private constant.
    pub fn is_packager_name(&self, name: NameRef) -> bool {
        self.names.read().is_packager_name(name)
    }

    /// Render a name for logs and test assertions.
    pub fn show(&self, name: NameRef) -> String {
        let mut out = String::new();
        self.names.read().write_name(&mut out, name);
        out
    }

    /// Render a path of names joined by `::`.
    pub fn show_path(&self, path: &[NameRef]) -> String {
        let names = self.names.read();
        let mut out = String::new();
        for (i, name) in path.iter().enumerate() {
            if i > 0 {
                out.push_str("::");
            }
            names.write_name(&mut out, *name);
        }
        out
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped write access to a [`NameTable`].
///
/// All mutating operations live here, so the table cannot be written
/// without holding one.
pub struct MutationPermit<'t> {
    table: &'t NameTable,
}

impl<'t> MutationPermit<'t> {
    /// The table this permit writes to.
    pub fn table(&self) -> &'t NameTable {
        self.table
    }

    pub fn enter_utf8(&mut self, text: &str) -> NameRef {
        self.table
            .names
            .write()
            .enter(NameData::Utf8(SmolStr::new(text)))
    }

    /// Intern a path of identifiers, e.g. `["Foo", "Bar"]`, as constant names.
    pub fn enter_constant_path(&mut self, segments: &[&str]) -> Vec<NameRef> {
        segments
            .iter()
            .map(|segment| {
                let utf8 = self.enter_utf8(segment);
                self.enter_constant(utf8)
            })
            .collect()
    }

    pub fn enter_unique(&mut self, kind: UniqueNameKind, original: NameRef, num: u32) -> NameRef {
        self.table.names.write().enter(NameData::Unique {
            kind,
            original,
            num,
        })
    }

    pub fn enter_constant(&mut self, original: NameRef) -> NameRef {
        self.table
            .names
            .write()
            .enter(NameData::Constant { original })
    }

    pub fn lookup_unique(
        &self,
        kind: UniqueNameKind,
        original: NameRef,
        num: u32,
    ) -> Option<NameRef> {
        self.table.lookup_unique(kind, original, num)
    }
}

impl fmt::Debug for MutationPermit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationPermit").finish_non_exhaustive()
    }
}

impl Drop for MutationPermit<'_> {
    fn drop(&mut self) {
        self.table.writer_active.store(false, Ordering::Release);
        tracing::trace!("[NAME_TABLE] mutation permit released");
    }
}
