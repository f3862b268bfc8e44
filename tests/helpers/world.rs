//! Test worlds: a name table, symbols, and a package database, plus
//! shorthands for building the trees the resolver sees.

use packager::base::{FileId, Loc, NameRef, NameTable, SymbolRef, SymbolTable, UniqueNameKind};
use packager::packages::{ImportKind, PackageDb, PackageDbBuilder, PackageRef};
use packager::resolve::{PackageResolver, ParsedFilesOrCancelled, ResolveOptions, ResolveResult};
use packager::syntax::{ClassDefKind, Expr, LiteralValue, ParsedFile};
use tokio_util::sync::CancellationToken;

/// Declares packages before any tree is built.
pub struct WorldBuilder {
    names: NameTable,
    packages: PackageDbBuilder,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            names: NameTable::new(),
            packages: PackageDb::builder(),
        }
    }

    /// Declare a package by its `::`-separated full name.
    pub fn package(&mut self, full_name: &str) -> PackageRef {
        let mut permit = self.names.mutation_permit().unwrap();
        let segments: Vec<&str> = full_name.split("::").collect();
        let path = permit.enter_constant_path(&segments);
        self.packages.add_package(&mut permit, path).unwrap()
    }

    pub fn import(&mut self, package: PackageRef, imported: PackageRef) -> &mut Self {
        self.packages
            .add_import(package, imported, ImportKind::Regular)
            .unwrap();
        self
    }

    pub fn test_import(&mut self, package: PackageRef, imported: PackageRef) -> &mut Self {
        self.packages
            .add_import(package, imported, ImportKind::Test)
            .unwrap();
        self
    }

    pub fn file(&mut self, file: u32, package: PackageRef) -> FileId {
        let file = FileId::new(file);
        self.packages.assign_file(file, package).unwrap();
        file
    }

    pub fn build(self) -> World {
        World {
            names: self.names,
            symbols: SymbolTable::new(),
            db: self.packages.build(),
        }
    }
}

pub struct World {
    pub names: NameTable,
    pub symbols: SymbolTable,
    pub db: PackageDb,
}

impl World {
    pub fn loc(file: FileId) -> Loc {
        Loc::from_offsets(file, 0, 16)
    }

    pub fn name(&self, text: &str) -> NameRef {
        self.names.mutation_permit().unwrap().enter_utf8(text)
    }

    pub fn constant_path(&self, text: &str) -> Vec<NameRef> {
        let segments: Vec<&str> = text.split("::").collect();
        self.names
            .mutation_permit()
            .unwrap()
            .enter_constant_path(&segments)
    }

    /// A constant reference such as `Baz::Qux::Widget`.
    pub fn cref(&self, file: FileId, text: &str) -> Expr {
        Expr::constant_path(Self::loc(file), &self.constant_path(text))
    }

    /// Enter a class or module symbol named `name` inside `owner`.
    pub fn class(&mut self, owner: SymbolRef, name: &str) -> SymbolRef {
        let name = self.constant_path(name)[0];
        self.symbols.enter_class(owner, name)
    }

    pub fn module(file: FileId, symbol: SymbolRef, body: Vec<Expr>) -> Expr {
        Expr::class_def(World::loc(file), ClassDefKind::Module, symbol, Vec::new(), body)
    }

    /// `w = <reference>.new(3)`
    pub fn widget_call(&self, file: FileId, reference: &str) -> Expr {
        let loc = Self::loc(file);
        Expr::assign(
            loc,
            Expr::local(loc, self.name("w")),
            Expr::call(
                loc,
                self.cref(file, reference),
                self.name("new"),
                vec![Expr::literal(loc, LiteralValue::Integer(3))],
            ),
        )
    }

    /// A file holding
    ///
    /// ```text
    /// module <module>
    ///   def build
    ///     w = <reference>.new(3)
    ///   end
    /// end
    /// ```
    pub fn widget_file(&mut self, file: FileId, module: &str, reference: &str) -> ParsedFile {
        let symbol = self.class(SymbolRef::ROOT, module);
        let build = self.name("build");
        let body = Expr::method_def(Self::loc(file), build, self.widget_call(file, reference));
        let tree = Expr::root(Self::loc(file), vec![World::module(file, symbol, vec![body])]);
        ParsedFile::new(file, tree)
    }

    pub fn show(&self, file: &ParsedFile) -> String {
        file.tree.show(&self.names, &self.symbols)
    }

    pub fn show_all(&self, files: &[ParsedFile]) -> Vec<String> {
        files.iter().map(|file| self.show(file)).collect()
    }

    pub fn run(
        &self,
        trees: Vec<ParsedFile>,
        options: &ResolveOptions,
    ) -> ResolveResult<ParsedFilesOrCancelled> {
        let cancel = CancellationToken::new();
        PackageResolver::run(&self.names, &self.symbols, &self.db, trees, options, &cancel)
    }

    /// Run to completion and return the rewritten trees.
    pub fn resolve(&self, trees: Vec<ParsedFile>, options: &ResolveOptions) -> Vec<ParsedFile> {
        self.run(trees, options)
            .unwrap()
            .into_trees()
            .expect("run was not cancelled")
    }

    /// The private name minted for `package`, if any.
    pub fn private_name(&self, package: PackageRef) -> Option<NameRef> {
        let mangled = self.db.package(package)?.mangled_name();
        let unique = self
            .names
            .lookup_unique(UniqueNameKind::PackagerPrivate, mangled, 1)?;
        self.names.lookup_constant(unique)
    }
}
