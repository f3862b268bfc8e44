//! The package resolver pass.
//!
//! Walks every file of a batch once and rewrites constant references that
//! reach into a regularly imported package so they go through that
//! package's private name:
//!
//! ```text
//! Baz::Qux::Widget  =>  Baz::Qux::<PackageRegistry>::<Baz_Qux_Package$1>::Widget
//! ```
//!
//! Definitions are tracked on a [`NestingStack`] on the way down. Each
//! constant chain is rewritten at most once, at its longest imported prefix.

use std::collections::hash_map::Entry;
use std::mem;

use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use crate::base::{FileId, MutationPermit, NameTable, SymbolTable};
use crate::packages::{PackageDb, PackageInfo, PackageRef};
use crate::syntax::{ClassDef, ConstantRef, Expr, ParsedFile, TreeMap, apply, walk_class_def};

use super::env::ImportEnv;
use super::error::{ResolveError, ResolveResult};
use super::nesting::NestingStack;
use super::options::{Parallelism, ResolveOptions};
use super::rewrite::{PrivateNames, RewriteOutcome, try_rewrite};
use super::scope_path::{InsertionPoint, collect};

/// Result of a run: every tree, in input order, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFilesOrCancelled {
    Trees(Vec<ParsedFile>),
    Cancelled,
}

impl ParsedFilesOrCancelled {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ParsedFilesOrCancelled::Cancelled)
    }

    pub fn into_trees(self) -> Option<Vec<ParsedFile>> {
        match self {
            ParsedFilesOrCancelled::Trees(trees) => Some(trees),
            ParsedFilesOrCancelled::Cancelled => None,
        }
    }
}

// ============================================================================
// Per-file pass
// ============================================================================

/// Rewrites the trees of one package.
pub struct PackageResolverPass<'a, 't> {
    names: &'a NameTable,
    symbols: &'a SymbolTable,
    env: &'a ImportEnv,
    private: PrivateNames<'a, 't>,
    nesting: NestingStack,
    rewrites: usize,
}

impl<'a, 't> PackageResolverPass<'a, 't> {
    pub fn new(
        names: &'a NameTable,
        symbols: &'a SymbolTable,
        env: &'a ImportEnv,
        private: PrivateNames<'a, 't>,
    ) -> Self {
        Self {
            names,
            symbols,
            env,
            private,
            nesting: NestingStack::new(),
            rewrites: 0,
        }
    }

    /// Rewrite one file's tree.
    pub fn transform_file(&mut self, tree: Expr) -> ResolveResult<Expr> {
        apply(self, tree)
    }

    pub fn nesting(&self) -> &NestingStack {
        &self.nesting
    }

    /// References rewritten so far.
    pub fn rewrites(&self) -> usize {
        self.rewrites
    }
}

impl TreeMap for PackageResolverPass<'_, '_> {
    type Error = ResolveError;

    fn transform_class_def(&mut self, node: Box<ClassDef>) -> ResolveResult<Expr> {
        let entered = self.nesting.enter(&node)?;
        if entered {
            tracing::trace!(
                "[PKG_RESOLVE] entered {} at depth {}",
                self.symbols.show(node.symbol, self.names),
                self.nesting.depth()
            );
        }

        let result = walk_class_def(self, node);
        if entered {
            self.nesting.exit();
        }
        Ok(Expr::ClassDef(result?))
    }

    /// Only the outermost reference of a chain reaches this hook; the chain
    /// beneath it is handled here as a unit.
    fn transform_constant_ref(&mut self, mut node: Box<ConstantRef>) -> ResolveResult<Expr> {
        self.transform_chain_root(&mut node)?;
        self.rewrite_chain(&mut node);
        Ok(Expr::ConstantRef(node))
    }
}

impl PackageResolverPass<'_, '_> {
    /// Transform whatever the chain below `tip` is rooted at.
    fn transform_chain_root(&mut self, tip: &mut ConstantRef) -> ResolveResult<()> {
        let mut scope = &mut tip.scope;
        loop {
            match scope {
                Expr::ConstantRef(node) => scope = &mut node.scope,
                root => {
                    *root = self.transform_expr(mem::take(root))?;
                    return Ok(());
                }
            }
        }
    }

    /// Route the chain ending in `tip` through the longest prefix that names
    /// a regular import. Prefixes are tried from the tip downwards, so
    /// `A::B::Widget` goes through `A::B` even when `A` is imported too.
    ///
    /// A chain that already carries markers is left alone, and so is one
    /// naming the current package.
    fn rewrite_chain(&mut self, tip: &mut ConstantRef) {
        if collect(self.names, tip).insertion != Some(InsertionPoint::ChainRoot) {
            return;
        }

        let mut node = tip;
        loop {
            let path = collect(self.names, node);
            let outcome = try_rewrite(&path, self.env, &mut self.private, node);
            match outcome {
                RewriteOutcome::NoMatch => {}
                RewriteOutcome::Rewritten { package } => {
                    self.rewrites += 1;
                    tracing::trace!(
                        "[PKG_RESOLVE] {}::{} -> {} (inside {:?})",
                        path.show(self.names),
                        self.names.show(path.name),
                        package,
                        self.nesting.current()
                    );
                    return;
                }
                RewriteOutcome::SamePackage | RewriteOutcome::NoInsertionPoint => return,
            }
            match &mut node.scope {
                Expr::ConstantRef(next) => node = &mut **next,
                _ => return,
            }
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Runs the package resolver over a batch of files.
pub struct PackageResolver;

impl PackageResolver {
    /// Rewrite every file in `trees`.
    ///
    /// Holds the name table's mutation permit for the whole run. Cancellation
    /// is checked between files; once it is observed, every tree is dropped
    /// and [`ParsedFilesOrCancelled::Cancelled`] is returned.
    pub fn run(
        names: &NameTable,
        symbols: &SymbolTable,
        db: &PackageDb,
        trees: Vec<ParsedFile>,
        options: &ResolveOptions,
        cancel: &CancellationToken,
    ) -> ResolveResult<ParsedFilesOrCancelled> {
        let permit = names.mutation_permit()?;
        tracing::debug!(
            "[PKG_RESOLVE] resolving {} files ({:?})",
            trees.len(),
            options.parallelism
        );

        let run = Run {
            names,
            symbols,
            db,
            options,
            cancel,
        };
        match options.parallelism {
            Parallelism::Sequential => run.sequential(permit, trees),
            Parallelism::Threads { threads } => run.parallel(permit, trees, threads),
        }
    }
}

struct Run<'r> {
    names: &'r NameTable,
    symbols: &'r SymbolTable,
    db: &'r PackageDb,
    options: &'r ResolveOptions,
    cancel: &'r CancellationToken,
}

impl<'r> Run<'r> {
    fn sequential(
        &self,
        mut permit: MutationPermit<'_>,
        trees: Vec<ParsedFile>,
    ) -> ResolveResult<ParsedFilesOrCancelled> {
        let mut envs: FxHashMap<PackageRef, ImportEnv> = FxHashMap::default();
        let mut out = Vec::with_capacity(trees.len());

        for file in trees {
            if self.cancel.is_cancelled() {
                tracing::debug!("[PKG_RESOLVE] cancelled before {}", file.file);
                return Ok(ParsedFilesOrCancelled::Cancelled);
            }
            let Some(package) = self.owner(file.file)? else {
                out.push(file);
                continue;
            };
            let env = match envs.entry(package.id()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(ImportEnv::build(self.db, package)?),
            };

            let private = PrivateNames::Exclusive(&mut permit);
            out.push(self.resolve_file(file, env, private)?);
        }

        if self.cancel.is_cancelled() {
            tracing::debug!("[PKG_RESOLVE] cancelled after the last file");
            return Ok(ParsedFilesOrCancelled::Cancelled);
        }
        Ok(ParsedFilesOrCancelled::Trees(out))
    }

    fn parallel(
        &self,
        permit: MutationPermit<'_>,
        trees: Vec<ParsedFile>,
        threads: Option<usize>,
    ) -> ResolveResult<ParsedFilesOrCancelled> {
        // Environments are built up front so workers only read them.
        let mut envs: FxHashMap<PackageRef, ImportEnv> = FxHashMap::default();
        let mut owners = Vec::with_capacity(trees.len());
        for file in &trees {
            let owner = self.owner(file.file)?;
            if let Some(package) = owner {
                if let Entry::Vacant(entry) = envs.entry(package.id()) {
                    entry.insert(ImportEnv::build(self.db, package)?);
                }
            }
            owners.push(owner.map(PackageInfo::id));
        }

        let permit = Mutex::new(permit);
        let work = || {
            trees
                .into_par_iter()
                .zip(owners)
                .map(|(file, owner)| -> ResolveResult<Option<ParsedFile>> {
                    if self.cancel.is_cancelled() {
                        return Ok(None);
                    }
                    match owner.and_then(|package| envs.get(&package)) {
                        Some(env) => {
                            let private = PrivateNames::Shared(&permit);
                            self.resolve_file(file, env, private).map(Some)
                        }
                        None => Ok(Some(file)),
                    }
                })
                .collect::<ResolveResult<Option<Vec<ParsedFile>>>>()
        };

        let trees = match threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(work)?,
            None => work()?,
        };

        match trees {
            Some(trees) if !self.cancel.is_cancelled() => {
                Ok(ParsedFilesOrCancelled::Trees(trees))
            }
            _ => {
                tracing::debug!("[PKG_RESOLVE] cancelled");
                Ok(ParsedFilesOrCancelled::Cancelled)
            }
        }
    }

    /// The package owning `file`. Unowned files are skipped or rejected
    /// depending on the options.
    fn owner(&self, file: FileId) -> ResolveResult<Option<&'r PackageInfo>> {
        match self.db.package_for_file(file) {
            Some(package) => Ok(Some(package)),
            None if self.options.skip_unowned_files => {
                tracing::debug!("[PKG_RESOLVE] {} belongs to no package, passing through", file);
                Ok(None)
            }
            None => Err(ResolveError::UnownedFile(file)),
        }
    }

    fn resolve_file(
        &self,
        mut file: ParsedFile,
        env: &ImportEnv,
        private: PrivateNames<'_, '_>,
    ) -> ResolveResult<ParsedFile> {
        let mut pass = PackageResolverPass::new(self.names, self.symbols, env, private);
        file.tree = pass.transform_file(mem::take(&mut file.tree))?;
        tracing::debug!(
            "[PKG_RESOLVE] {} in {}: {} rewrites, max depth {}",
            file.file,
            self.names.show_path(env.package_name()),
            pass.rewrites(),
            pass.nesting().max_depth()
        );
        Ok(file)
    }
}
