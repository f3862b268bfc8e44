//! Splicing package-private markers into matched references.
//!
//! A reference `Baz::Qux::Widget` whose scope path matches the regular
//! import `Baz::Qux` becomes
//!
//! ```text
//! Baz::Qux::<PackageRegistry>::<Baz_Qux_Package$1>::Widget
//! ```
//!
//! The two marker nodes are spliced into the tip's scope edge, so the
//! original prefix survives intact beneath them.

use std::mem;

use parking_lot::Mutex;

use crate::base::{MutationPermit, NameRef, UniqueNameKind};
use crate::packages::PackageRef;
use crate::syntax::{ConstantRef, Expr};

use super::env::ImportEnv;
use super::scope_path::ScopePath;

/// Disambiguator of every package-private name. There is exactly one
/// private name per imported package.
pub const PRIVATE_NAME_NUM: u32 = 1;

/// Write access used to mint package-private names.
pub enum PrivateNames<'a, 't> {
    /// The caller owns the permit outright.
    Exclusive(&'a mut MutationPermit<'t>),
    /// The permit is shared between worker threads.
    Shared(&'a Mutex<MutationPermit<'t>>),
}

impl PrivateNames<'_, '_> {
    /// The package-private constant name for a package mangled as `mangled`,
    /// entered on first use.
    pub fn package_private_name(&mut self, mangled: NameRef) -> NameRef {
        match self {
            PrivateNames::Exclusive(permit) => lookup_or_enter(permit, mangled),
            PrivateNames::Shared(permit) => lookup_or_enter(&mut permit.lock(), mangled),
        }
    }
}

fn lookup_or_enter(permit: &mut MutationPermit<'_>, mangled: NameRef) -> NameRef {
    let kind = UniqueNameKind::PackagerPrivate;
    let unique = match permit.lookup_unique(kind, mangled, PRIVATE_NAME_NUM) {
        Some(unique) => unique,
        None => {
            let unique = permit.enter_unique(kind, mangled, PRIVATE_NAME_NUM);
            tracing::trace!("[PKG_RESOLVE] minted {}", permit.table().show(unique));
            unique
        }
    };
    permit.enter_constant(unique)
}

/// What [`try_rewrite`] did with a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Unqualified, a marker itself, or a chain hanging off a value.
    NoInsertionPoint,
    /// The reference names the current package itself.
    SamePackage,
    /// No regular import matches the scope path.
    NoMatch,
    /// Markers for `package` were spliced in.
    Rewritten { package: PackageRef },
}

impl RewriteOutcome {
    pub fn is_rewritten(self) -> bool {
        matches!(self, RewriteOutcome::Rewritten { .. })
    }
}

/// Rewrite `node` if its scope path names one of the package's regular
/// imports.
pub fn try_rewrite(
    path: &ScopePath,
    env: &ImportEnv,
    private: &mut PrivateNames<'_, '_>,
    node: &mut ConstantRef,
) -> RewriteOutcome {
    if !path.is_candidate() {
        return RewriteOutcome::NoInsertionPoint;
    }
    if path.segments() == env.package_name() {
        return RewriteOutcome::SamePackage;
    }
    let Some(import) = env.match_path(path.segments()) else {
        return RewriteOutcome::NoMatch;
    };

    let private_name = private.package_private_name(import.mangled_name);
    let original = mem::take(&mut node.scope);
    let loc = original.loc().unwrap_or(node.loc);
    let registry = Expr::constant_ref(loc, NameRef::PACKAGE_REGISTRY, original);
    node.scope = Expr::constant_ref(loc, private_name, registry);

    RewriteOutcome::Rewritten {
        package: import.package,
    }
}
