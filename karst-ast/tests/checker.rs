//  CHECKER.rs
//    by Lut99
//
//  Created:
//    07 Mar 2025, 09:11:30
//  Last edited:
//    21 Aug 2025, 16:02:11
//  Auto updated?
//    Yes
//
//  Description:
//!   Integration tests for the resolution chain, building real module
//!   trees on disk.
//

use std::fs;
use std::path::{Path, PathBuf};

use karst_ast::errors::AstError;
use karst_ast::name::Name;
use karst_ast::semantic::{Package, Symbol, Target};
use tempfile::TempDir;


/***** HELPER FUNCTIONS *****/
/// Writes a file below the given root, creating parent directories as needed.
fn write(root: &Path, rel: &str, contents: &str) {
    let path: PathBuf = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}





/***** TESTS *****/
#[test]
fn test_entrypoint_valid() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main() {}\n");

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    assert_eq!(target.main, "hello");
    let module = target.main_module();
    let package = module.packages.get(&Name::single("hello")).unwrap();
    assert!(matches!(**package, Package::Executable{ .. }));
    assert!(matches!(package.symbols().get("main").map(std::rc::Rc::as_ref), Some(Symbol::Procedure{ .. })));
}

#[test]
fn test_builtin_module_always_resolved() {
    // No source names a `karst.*` symbol, but the backend still reaches the primitives through
    // every procedure's return type
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main() {}\n");

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    assert!(target.modules.contains("karst"), "builtin module missing from the target");
}

#[test]
fn test_entrypoint_with_parameter() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main(x karst.Natural32) {}\n");

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    assert!(matches!(err, AstError::InvalidEntrypoint{ .. }), "unexpected error: {err}");
}

#[test]
fn test_library_entrypoint() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "library hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main() {}\n");

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    assert!(matches!(err, AstError::SpuriousEntrypoint{ .. }), "unexpected error: {err}");
}

#[test]
fn test_duplicate_declaration_across_files() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/a.karst", "proc greet() {}\nproc main() { greet(); }\n");
    write(root.path(), "hello/src/b.karst", "proc greet() {}\n");

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    match err {
        AstError::Redeclaration{ name, .. } => assert_eq!(name, "greet"),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_mutually_pointing_structs() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "struct A { next *B }\n",
        "struct B { next *A }\n",
        "proc main() {}\n",
    ));

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    let package = target.main_module().packages.get(&Name::single("hello")).unwrap().clone();
    assert!(matches!(package.symbols().get("A").map(std::rc::Rc::as_ref), Some(Symbol::Struct{ .. })));
    assert!(matches!(package.symbols().get("B").map(std::rc::Rc::as_ref), Some(Symbol::Struct{ .. })));
}

#[test]
fn test_struct_embedding_cycle() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "struct A { inner B }\n",
        "struct B { inner A }\n",
        "proc main() {}\n",
    ));

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    assert!(matches!(err, AstError::CyclicDependency{ .. }), "unexpected error: {err}");
}

#[test]
fn test_mutual_procedure_recursion() {
    // Bodies only need the signatures of their callees, so this must pass
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "proc flip(x karst.Natural32) karst.Natural32 { return flop(x); }\n",
        "proc flop(x karst.Natural32) karst.Natural32 { return flip(x); }\n",
        "proc main() { flip(1); }\n",
    ));

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    let package = target.main_module().packages.get(&Name::single("hello")).unwrap().clone();
    assert_eq!(package.symbols().len(), 3);
}

#[test]
fn test_module_cycle_names_module_key() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "x/module.karst", "executable x;\nlibrary x.core;\n");
    write(root.path(), "x/src/main.karst", "proc main() { y.lib.ping(); }\n");
    write(root.path(), "x/src/core/core.karst", "public proc pong() {}\n");
    write(root.path(), "libs/y/module.karst", "library y.lib;\n");
    write(root.path(), "libs/y/src/lib/lib.karst", "public proc ping() { x.core.pong(); }\n");

    let err: AstError = karst_ast::check(root.path().join("x"), vec![root.path().join("libs")]).unwrap_err();
    match err {
        // The revisited key is the module, not a package or symbol
        AstError::CyclicDependency{ key } => assert_eq!(key, "x"),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_cross_module_library_access() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main() { util.text.shout(); }\n");
    write(root.path(), "libs/util/module.karst", "library util.text;\n");
    write(root.path(), "libs/util/src/text/text.karst", "public proc shout() {}\n");

    let target: Target = karst_ast::check(root.path().join("hello"), vec![root.path().join("libs")]).unwrap();
    assert!(target.modules.contains("util"));
}

#[test]
fn test_cross_module_private_symbol() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main() { util.text.shout(); }\n");
    write(root.path(), "libs/util/module.karst", "library util.text;\n");
    write(root.path(), "libs/util/src/text/text.karst", "proc shout() {}\n");

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![root.path().join("libs")]).unwrap_err();
    assert!(matches!(err, AstError::PrivateSymbol{ .. }), "unexpected error: {err}");
}

#[test]
fn test_unknown_module() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main() { nowhere.pkg.nothing(); }\n");

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    match err {
        AstError::UnknownModule{ name } => assert_eq!(name, "nowhere"),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_config_package_redeclaration() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\nlibrary hello;\n");
    write(root.path(), "hello/src/main.karst", "proc main() {}\n");

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    assert!(matches!(err, AstError::PackageRedeclaration{ .. }), "unexpected error: {err}");
}

#[test]
fn test_type_errors() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "proc answer() karst.Natural32 { return 42; }\n",
        "proc main() { var x karst.Natural64 = answer(); }\n",
    ));

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    assert!(matches!(err, AstError::TypeMismatch{ .. }), "unexpected error: {err}");
}

#[test]
fn test_missing_return() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "proc answer(x karst.Natural32) karst.Natural32 { if x < 2 { return 1; } }\n",
        "proc main() { answer(1); }\n",
    ));

    let err: AstError = karst_ast::check(root.path().join("hello"), vec![]).unwrap_err();
    assert!(matches!(err, AstError::MissingReturn{ .. }), "unexpected error: {err}");
}

#[test]
fn test_reserved_module_name() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "karst/module.karst", "executable karst;\n");
    write(root.path(), "karst/src/main.karst", "proc main() {}\n");

    let err: AstError = karst_ast::check(root.path().join("karst"), vec![]).unwrap_err();
    assert!(matches!(err, AstError::ReservedModule{ .. }), "unexpected error: {err}");
}
