//! Package resolver tests - sequential runs
//!
//! Scenarios of the pass over whole files: which references are rewritten,
//! which are left alone, and the properties every run must keep
//! (idempotence, non-interference, input order).

use packager::base::{FileId, NameRef, SymbolRef};
use packager::packages::PackageRef;
use packager::resolve::{
    ImportEnv, PackageResolver, PackageResolverPass, ParsedFilesOrCancelled, PrivateNames,
    ResolveOptions,
};
use packager::syntax::{ClassDefKind, Expr, ParsedFile};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::world::{World, WorldBuilder};

/// `Foo::Bar` imports `Baz::Qux`; `Other` imports nothing.
struct Scenario {
    world: World,
    foo_bar: PackageRef,
    baz_qux: PackageRef,
    first: FileId,
    second: FileId,
    other: FileId,
    unowned: FileId,
}

fn scenario() -> Scenario {
    let mut builder = WorldBuilder::new();
    let foo_bar = builder.package("Foo::Bar");
    let baz_qux = builder.package("Baz::Qux");
    let other = builder.package("Other");
    builder.import(foo_bar, baz_qux);
    let first = builder.file(1, foo_bar);
    let second = builder.file(2, foo_bar);
    let other = builder.file(3, other);

    Scenario {
        world: builder.build(),
        foo_bar,
        baz_qux,
        first,
        second,
        other,
        unowned: FileId::new(40),
    }
}

fn single_expr_file(file: FileId, expr: Expr) -> ParsedFile {
    ParsedFile::new(file, Expr::root(World::loc(file), vec![expr]))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_imported_package_reference_is_rewritten() {
    let mut s = scenario();
    let first = s.world.widget_file(s.first, "Foo", "Baz::Qux::Widget");
    let second = s.world.widget_file(s.second, "Foo", "Baz::Qux::Widget");
    let names_before = s.world.names.len();

    let out = s.world.resolve(vec![first, second], &ResolveOptions::default());

    let expected = "\
module Foo
  def build
    w = Baz::Qux::<PackageRegistry>::<Baz_Qux_Package$1>::Widget.new(3)
  end
end
";
    assert_eq!(s.world.show_all(&out), vec![expected, expected]);

    // One unique name and its constant, shared by both files
    assert_eq!(s.world.names.len(), names_before + 2);
    let private = s.world.private_name(s.baz_qux).unwrap();
    assert!(s.world.names.is_packager_name(private));
    assert!(!s.world.names.is_permit_held());
}

#[test]
fn test_unimported_package_is_untouched() {
    let mut s = scenario();
    let file = s.world.widget_file(s.other, "Other", "Baz::Qux::Widget");

    let out = s
        .world
        .resolve(vec![file.clone()], &ResolveOptions::default());

    assert_eq!(out, vec![file]);
    assert_eq!(s.world.private_name(s.baz_qux), None);
}

#[test]
fn test_unqualified_reference_is_untouched() {
    let mut s = scenario();
    let file = s.world.widget_file(s.first, "Foo", "Widget");

    let out = s
        .world
        .resolve(vec![file.clone()], &ResolveOptions::default());

    assert_eq!(out, vec![file]);
}

#[test]
fn test_nesting_is_tracked_through_definitions() {
    let mut s = scenario();
    let w = &mut s.world;
    let a = w.class(SymbolRef::ROOT, "A");
    let b = w.class(a, "B");
    let c = w.class(b, "C");
    let innermost = World::module(s.first, c, vec![w.widget_call(s.first, "Baz::Qux::Widget")]);
    let tree = Expr::root(
        World::loc(s.first),
        vec![World::module(
            s.first,
            a,
            vec![World::module(s.first, b, vec![innermost])],
        )],
    );

    let env = ImportEnv::build(&w.db, w.db.package(s.foo_bar).unwrap()).unwrap();
    let mut permit = w.names.mutation_permit().unwrap();
    let mut pass = PackageResolverPass::new(
        &w.names,
        &w.symbols,
        &env,
        PrivateNames::Exclusive(&mut permit),
    );
    let tree = pass.transform_file(tree).unwrap();

    assert_eq!(pass.nesting().max_depth(), 3);
    assert_eq!(pass.nesting().depth(), 0);
    assert_eq!(pass.rewrites(), 1);
    drop(pass);
    drop(permit);

    let expected = "\
module A
  module A::B
    module A::B::C
      w = Baz::Qux::<PackageRegistry>::<Baz_Qux_Package$1>::Widget.new(3)
    end
  end
end
";
    assert_eq!(tree.show(&w.names, &w.symbols), expected);
}

// ============================================================================
// Matching
// ============================================================================

#[rstest]
#[case("A::B::Widget", "A::B::<PackageRegistry>::<A_B_Package$1>::Widget")]
#[case("B::A::Widget", "B::A::Widget")]
#[case("A::Widget", "A::Widget")]
#[case("A::B", "A::B")]
#[case("Widget", "Widget")]
// The inner prefix `A::B::C` names a constant inside `A::B`
#[case("A::B::C::Widget", "A::B::<PackageRegistry>::<A_B_Package$1>::C::Widget")]
fn test_match_is_exact_and_order_sensitive(#[case] reference: &str, #[case] expected: &str) {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let ab = builder.package("A::B");
    // Test-only imports never match
    let ba = builder.package("B::A");
    builder.import(app, ab);
    builder.test_import(app, ba);
    let file = builder.file(1, app);
    let world = builder.build();

    let input = single_expr_file(file, world.cref(file, reference));
    let out = world.resolve(vec![input], &ResolveOptions::default());

    assert_eq!(world.show(&out[0]), format!("{expected}\n"));
}

/// `App` imports both `A` and its nested package `A::B`.
#[rstest]
#[case("A::B::Widget", "A::B::<PackageRegistry>::<A_B_Package$1>::Widget")]
#[case("A::B::C::Widget", "A::B::<PackageRegistry>::<A_B_Package$1>::C::Widget")]
#[case("A::Widget", "A::<PackageRegistry>::<A_Package$1>::Widget")]
#[case("A::C::Widget", "A::<PackageRegistry>::<A_Package$1>::C::Widget")]
// `B` is a constant inside `A` here
#[case("A::B", "A::<PackageRegistry>::<A_Package$1>::B")]
fn test_nested_imports_use_the_longest_match(#[case] reference: &str, #[case] expected: &str) {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let a = builder.package("A");
    let ab = builder.package("A::B");
    builder.import(app, a);
    builder.import(app, ab);
    let file = builder.file(1, app);
    let world = builder.build();

    let input = single_expr_file(file, world.cref(file, reference));
    let once = world.resolve(vec![input], &ResolveOptions::default());
    assert_eq!(world.show(&once[0]), format!("{expected}\n"));

    let twice = world.resolve(once.clone(), &ResolveOptions::default());
    assert_eq!(twice, once);
}

#[test]
fn test_nested_package_gets_its_own_private_name() {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let a = builder.package("A");
    let ab = builder.package("A::B");
    builder.import(app, a);
    builder.import(app, ab);
    let file = builder.file(1, app);
    let world = builder.build();

    let input = single_expr_file(file, world.cref(file, "A::B::Widget"));
    world.resolve(vec![input], &ResolveOptions::default());

    assert!(world.private_name(ab).is_some());
    assert_eq!(world.private_name(a), None);
}

#[test]
fn test_own_nested_package_is_not_routed_through_its_parent() {
    let mut builder = WorldBuilder::new();
    let parent = builder.package("App");
    let app = builder.package("App::Core");
    builder.import(app, parent);
    let file = builder.file(1, app);
    let world = builder.build();

    let input = single_expr_file(file, world.cref(file, "App::Core::Thing"));
    let out = world.resolve(vec![input.clone()], &ResolveOptions::default());

    assert_eq!(out, vec![input]);
    assert_eq!(world.private_name(parent), None);
}

#[test]
fn test_chain_below_a_local_is_untouched() {
    let s = scenario();
    let loc = World::loc(s.first);
    // x::Baz::Qux::Widget
    let reference = Expr::constant_path_from(
        loc,
        Expr::local(loc, s.world.name("x")),
        &s.world.constant_path("Baz::Qux::Widget"),
    );
    let input = single_expr_file(s.first, reference);

    let out = s.world.resolve(vec![input.clone()], &ResolveOptions::default());

    assert_eq!(out, vec![input]);
    assert_eq!(s.world.private_name(s.baz_qux), None);
}

#[test]
fn test_own_package_is_never_rewritten() {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App::Core");
    // A package listing itself as an import
    builder.import(app, app);
    let file = builder.file(1, app);
    let world = builder.build();

    let input = single_expr_file(file, world.cref(file, "App::Core::Thing"));
    let out = world.resolve(vec![input.clone()], &ResolveOptions::default());

    assert_eq!(out, vec![input]);
    assert_eq!(world.private_name(app), None);
}

#[test]
fn test_test_imports_are_not_rewritten() {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let support = builder.package("Spec::Support");
    builder.test_import(app, support);
    let file = builder.file(1, app);
    let world = builder.build();

    let input = single_expr_file(file, world.cref(file, "Spec::Support::Helper"));
    let out = world.resolve(vec![input.clone()], &ResolveOptions::default());

    assert_eq!(out, vec![input]);
}

#[test]
fn test_ancestors_are_rewritten() {
    let mut s = scenario();
    let gadget = s.world.class(SymbolRef::ROOT, "Gadget");
    let loc = World::loc(s.first);
    let class = Expr::class_def(
        loc,
        ClassDefKind::Class,
        gadget,
        vec![s.world.cref(s.first, "Baz::Qux::Base")],
        Vec::new(),
    );
    let input = single_expr_file(s.first, class);

    let out = s.world.resolve(vec![input], &ResolveOptions::default());

    let expected = "\
class Gadget < Baz::Qux::<PackageRegistry>::<Baz_Qux_Package$1>::Base
end
";
    assert_eq!(s.world.show(&out[0]), expected);
}

#[test]
fn test_markers_carry_the_prefix_location() {
    let s = scenario();
    let input = single_expr_file(s.first, s.world.cref(s.first, "Baz::Qux::Widget"));

    let out = s.world.resolve(vec![input], &ResolveOptions::default());

    let root = out[0].tree.as_class_def().unwrap();
    let tip = root.body[0].as_constant_ref().unwrap();
    let private = tip.scope.as_constant_ref().unwrap();
    let registry = private.scope.as_constant_ref().unwrap();
    let prefix = registry.scope.as_constant_ref().unwrap();

    assert_eq!(registry.name, NameRef::PACKAGE_REGISTRY);
    assert_eq!(private.loc, prefix.loc);
    assert_eq!(registry.loc, prefix.loc);
    assert_eq!(s.world.names.show_path(&[prefix.name]), "Qux");
}

// ============================================================================
// Run properties
// ============================================================================

#[test]
fn test_second_run_changes_nothing() {
    let mut s = scenario();
    let files = vec![
        s.world.widget_file(s.first, "Foo", "Baz::Qux::Widget"),
        s.world.widget_file(s.second, "Foo", "Baz::Qux::Gadget::Part"),
    ];

    let once = s.world.resolve(files, &ResolveOptions::default());
    let names_after_once = s.world.names.len();
    let twice = s.world.resolve(once.clone(), &ResolveOptions::default());

    assert_eq!(twice, once);
    assert_eq!(s.world.names.len(), names_after_once);
}

#[test]
fn test_non_matching_trees_are_structurally_identical() {
    let mut s = scenario();
    let files = vec![
        s.world.widget_file(s.first, "Foo", "Qux::Baz::Widget"),
        s.world.widget_file(s.second, "Foo", "Baz::Widget"),
        s.world.widget_file(s.other, "Other", "Baz::Qux::Widget"),
    ];
    let names_before = s.world.names.len();

    let out = s.world.resolve(files.clone(), &ResolveOptions::default());

    assert_eq!(out, files);
    assert_eq!(s.world.names.len(), names_before);
}

#[test]
fn test_output_keeps_input_order() {
    let mut s = scenario();
    let files = vec![
        s.world.widget_file(s.other, "Other", "Widget"),
        s.world.widget_file(s.second, "Foo", "Baz::Qux::Widget"),
        s.world.widget_file(s.unowned, "Loose", "Baz::Qux::Widget"),
        s.world.widget_file(s.first, "Foo", "Widget"),
    ];

    let out = s.world.resolve(files, &ResolveOptions::default());

    let order: Vec<_> = out.iter().map(|file| file.file).collect();
    assert_eq!(order, vec![s.other, s.second, s.unowned, s.first]);
}

#[test]
fn test_unowned_files_pass_through_by_default() {
    let mut s = scenario();
    let file = s.world.widget_file(s.unowned, "Loose", "Baz::Qux::Widget");

    let out = s
        .world
        .resolve(vec![file.clone()], &ResolveOptions::default());

    assert_eq!(out, vec![file]);
}

#[rstest]
#[case(ResolveOptions::sequential())]
#[case(ResolveOptions::threaded(None))]
#[case(ResolveOptions::threaded(Some(2)))]
fn test_cancelled_run_returns_no_trees(#[case] options: ResolveOptions) {
    let mut s = scenario();
    let files = vec![
        s.world.widget_file(s.first, "Foo", "Baz::Qux::Widget"),
        s.world.widget_file(s.second, "Foo", "Baz::Qux::Widget"),
    ];
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = PackageResolver::run(
        &s.world.names,
        &s.world.symbols,
        &s.world.db,
        files,
        &options,
        &cancel,
    )
    .unwrap();

    assert_eq!(result, ParsedFilesOrCancelled::Cancelled);
    assert!(result.is_cancelled());
    assert!(!s.world.names.is_permit_held());
}

#[test]
fn test_empty_batch() {
    let s = scenario();
    let out = s.world.resolve(Vec::new(), &ResolveOptions::default());
    assert!(out.is_empty());
}
