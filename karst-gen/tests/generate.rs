//  GENERATE.rs
//    by Lut99
//
//  Created:
//    07 Mar 2025, 11:02:14
//  Last edited:
//    22 Aug 2025, 09:51:08
//  Auto updated?
//    Yes
//
//  Description:
//!   Integration tests running a real source tree through resolution and
//!   then through the C backend.
//

use std::fs;
use std::path::{Path, PathBuf};

use karst_ast::semantic::Target;
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
fn test_hello_world_unit() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "extern \"puts\" proc print(text *karst.Byte) karst.Integer32;\n",
        "proc main() { print(\"hello, world\"); }\n",
    ));

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    let dist: PathBuf = root.path().join("dist");
    karst_gen::generate(&target, &dist).unwrap();

    let unit: String = fs::read_to_string(dist.join("hello.c")).unwrap();
    // The extern is declared under its linkage name and invoked under it too
    assert!(unit.contains("karst$Integer32 puts(karst$Byte* text);"), "missing extern declaration:\n{unit}");
    assert!(unit.contains("puts(\"hello, world\");"), "missing call:\n{unit}");
    assert!(unit.contains("int main() {"), "missing wrapper:\n{unit}");
    assert!(unit.contains("hello$main();"), "missing entrypoint call:\n{unit}");

    // Every typedef lands before the first definition that mentions it
    let byte_def: usize = unit.find("typedef unsigned char karst$Byte;").unwrap();
    let int_def: usize = unit.find("typedef int karst$Integer32;").unwrap();
    let extern_decl: usize = unit.find("karst$Integer32 puts").unwrap();
    assert!(byte_def < extern_decl && int_def < extern_decl, "typedefs after use:\n{unit}");
}

#[test]
fn test_libraries_emit_no_unit() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\nlibrary hello.core;\n");
    write(root.path(), "hello/src/main.karst", "proc main() { hello.core.greet(); }\n");
    write(root.path(), "hello/src/core/core.karst", "public proc greet() {}\n");

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    let dist: PathBuf = root.path().join("dist");
    karst_gen::generate(&target, &dist).unwrap();

    // The library's procedure lands inside of the executable's unit instead
    assert!(dist.join("hello.c").exists());
    assert!(!dist.join("hello.core.c").exists());
    let unit: String = fs::read_to_string(dist.join("hello.c")).unwrap();
    assert!(unit.contains("karst$Unit hello$core$greet() {"), "library symbol not inlined:\n{unit}");
}

#[test]
fn test_mutual_recursion_forward_declared() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "proc flip(x karst.Natural32) karst.Natural32 { return flop(x); }\n",
        "proc flop(x karst.Natural32) karst.Natural32 { return flip(x); }\n",
        "proc main() { flip(1); }\n",
    ));

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    let dist: PathBuf = root.path().join("dist");
    karst_gen::generate(&target, &dist).unwrap();

    // Whichever body lands first calls the other procedure, so a prototype must precede it
    let unit: String = fs::read_to_string(dist.join("hello.c")).unwrap();
    let flip_decl: usize = unit.find("karst$Natural32 hello$flip(karst$Natural32 x);").unwrap();
    let flop_def: usize = unit.find("karst$Natural32 hello$flop(karst$Natural32 x) {").unwrap();
    let flip_use: usize = unit.find("hello$flip(x)").unwrap();
    assert!(flip_decl < flop_def && flop_def < flip_use, "use before declaration:\n{unit}");
    assert_eq!(unit.matches("karst$Natural32 hello$flip(karst$Natural32 x) {").count(), 1, "definition not unique:\n{unit}");
}

#[test]
fn test_recursion_and_branches() {
    let root: TempDir = TempDir::new().unwrap();
    write(root.path(), "hello/module.karst", "executable hello;\n");
    write(root.path(), "hello/src/main.karst", concat!(
        "proc count(x karst.Natural32) {\n",
        "  if x < 10 {\n",
        "    count(x);\n",
        "  } else {\n",
        "    return;\n",
        "  }\n",
        "}\n",
        "proc main() { count(0); }\n",
    ));

    let target: Target = karst_ast::check(root.path().join("hello"), vec![]).unwrap();
    let dist: PathBuf = root.path().join("dist");
    karst_gen::generate(&target, &dist).unwrap();

    let unit: String = fs::read_to_string(dist.join("hello.c")).unwrap();
    assert_eq!(unit.matches("karst$Unit hello$count(karst$Natural32 x) {").count(), 1, "definition not unique:\n{unit}");
    assert!(unit.contains("if (x < 10) {"), "bad branch rendering:\n{unit}");
    assert!(unit.contains("} else {"), "bad branch rendering:\n{unit}");
}
