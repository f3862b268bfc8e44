//! Package resolver tests - internal-consistency faults
//!
//! Each of these aborts the whole batch with an error; no partially
//! rewritten trees come back, and the name table's permit is released.

use packager::base::{FileId, NameTableError, SymbolRef};
use packager::packages::PackageRef;
use packager::resolve::{ResolveError, ResolveOptions};
use packager::syntax::{Expr, ParsedFile};
use rstest::rstest;

use crate::helpers::world::{World, WorldBuilder};

fn options(threaded: bool) -> ResolveOptions {
    if threaded {
        ResolveOptions::threaded(Some(2))
    } else {
        ResolveOptions::sequential()
    }
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_unnamed_definition_outside_the_root(#[case] threaded: bool) {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let file = builder.file(1, app);
    let mut world = builder.build();

    let symbol = world.class(SymbolRef::ROOT, "Anonymous");
    let mut def = World::module(file, symbol, Vec::new());
    if let Expr::ClassDef(node) = &mut def {
        node.name = Expr::EmptyTree;
    }
    let input = ParsedFile::new(file, Expr::root(World::loc(file), vec![def]));

    let err = world.run(vec![input], &options(threaded)).unwrap_err();

    assert!(
        matches!(err, ResolveError::UnnamedDefinition { symbol: found, .. } if found == symbol),
        "unexpected error: {err}"
    );
    assert!(!world.names.is_permit_held());
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_import_of_unknown_package(#[case] threaded: bool) {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let ghost = PackageRef(99);
    builder.import(app, ghost);
    let file = builder.file(1, app);
    let mut world = builder.build();
    let input = world.widget_file(file, "App", "Baz::Widget");

    let err = world.run(vec![input], &options(threaded)).unwrap_err();

    assert!(
        matches!(
            err,
            ResolveError::UnknownImport { package, imported } if package == app && imported == ghost
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn test_permit_already_held() {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let file = builder.file(1, app);
    let mut world = builder.build();
    let input = world.widget_file(file, "App", "Widget");

    let permit = world.names.mutation_permit().unwrap();
    let err = world
        .run(vec![input], &ResolveOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NameTable(NameTableError::PermitHeld)
    ));
    // The failed run must not release someone else's permit
    assert!(world.names.is_permit_held());
    drop(permit);
    assert!(!world.names.is_permit_held());
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_unowned_file_when_not_skipping(#[case] threaded: bool) {
    let mut builder = WorldBuilder::new();
    let app = builder.package("App");
    let owned = builder.file(1, app);
    let mut world = builder.build();
    let unowned = FileId::new(2);
    let files = vec![
        world.widget_file(owned, "App", "Widget"),
        world.widget_file(unowned, "Loose", "Widget"),
    ];
    let strict = ResolveOptions {
        skip_unowned_files: false,
        ..options(threaded)
    };

    let err = world.run(files, &strict).unwrap_err();

    assert!(matches!(err, ResolveError::UnownedFile(file) if file == unowned));
}
