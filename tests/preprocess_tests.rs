//! End-to-end tests for the preprocessor.
//!
//! Scenario tests feed literal sources through the transformer and the
//! tree driver, then check the staged output, the path maps and cleanup
//! behavior against the documented contracts.

use std::fs;
use std::path::{Path, PathBuf};

use monomorph::{cleanup, process_source, process_tree};
use tempfile::TempDir;

fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create scratch tree");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write source file");
    }
    dir
}

fn canon(path: &Path) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize existing path")
}

#[test]
fn simple_type_parameter() {
    let source = "template<typename T> struct Box { T value; };\nBox<int> b; Box<int> c;\n";
    let result = process_source(Path::new("a.gx"), source);

    assert!(result.had_templates);
    assert!(result.processed.contains("struct Box { void* value; };"));
    assert_eq!(
        result
            .processed
            .matches("struct Box_int { int value; };")
            .count(),
        1
    );
    assert!(result.processed.contains("Box_int b; Box_int c;"));

    let declaration = result.processed.find("struct Box_int").unwrap();
    let first_use = result.processed.find("Box_int b;").unwrap();
    assert!(declaration < first_use);
}

#[test]
fn non_type_parameter_and_bracket_reduction() {
    let source = "template<int N> struct Buf { char data[N * 2 + 1]; }; Buf<3> x;\n";
    let result = process_source(Path::new("a.gx"), source);

    assert!(result.processed.contains("struct Buf { char data[3]; };"));
    assert!(result.processed.contains("struct Buf_3 { char data[7]; };"));
    assert!(result.processed.contains("Buf_3 x;"));
}

#[test]
fn qualified_resolution_distinguishes_scopes() {
    let source = concat!(
        "namespace ns {\n",
        "    struct S {\n",
        "        struct Holder<typename T> { T t; };\n",
        "    };\n",
        "}\n",
        "struct Holder<typename T> { T t; };\n",
        "ns.S.Holder<int> a;\n",
        "Holder<int> b;\n",
    );
    let result = process_source(Path::new("a.gx"), source);

    assert!(result.processed.contains("Holder_ns_S_int a;"));
    assert!(result.processed.contains("Holder_int b;"));
}

#[test]
fn pointer_preservation_in_placeholder() {
    let source = "template<typename T> struct P { T* ptr; T value; };\n";
    let result = process_source(Path::new("a.gx"), source);

    assert!(result.processed.contains("void* ptr;"));
    assert!(result.processed.contains("void* value;"));
    assert!(!result.processed.contains("void** ptr;"));
}

#[test]
fn unresolved_use_site_survives_verbatim() {
    let source = "Unknown<T> u;\n";
    let result = process_source(Path::new("a.gx"), source);

    assert!(!result.had_templates);
    assert_eq!(result.processed, source);
}

#[test]
fn tree_without_templates_returns_none() {
    let tree = write_tree(&[
        ("a.gx", "import \"b.gx\"\nstruct Plain { int x; };\n"),
        ("b.gx", "struct AlsoPlain { char c; };\n"),
    ]);
    assert!(process_tree(&tree.path().join("a.gx")).is_none());
}

#[test]
fn import_traversal_and_cleanup() {
    let tree = write_tree(&[
        (
            "a.gx",
            "import \"b.gx\"\ntemplate<typename T> struct Box { T v; };\nBox<int> b;\n",
        ),
        ("b.gx", "struct Plain { int x; };\n"),
    ]);
    let root = tree.path().join("a.gx");
    let result = process_tree(&root).expect("tree has templates");

    assert!(result.had_templates);
    assert_eq!(result.original_to_processed.len(), 2);

    let staged_a = &result.original_to_processed[&canon(&root)];
    let staged_b = &result.original_to_processed[&canon(&tree.path().join("b.gx"))];

    let a_text = fs::read_to_string(staged_a).unwrap();
    assert!(a_text.contains("struct Box_int { int v; };"));
    assert!(a_text.contains("Box_int b;"));

    let b_text = fs::read_to_string(staged_b).unwrap();
    assert_eq!(b_text, "struct Plain { int x; };\n");

    let staging_dir = result.staging_dir.clone();
    assert!(staging_dir.is_dir());
    let staged_a = staged_a.clone();

    cleanup(&result);
    assert!(!staging_dir.exists());
    assert!(fs::metadata(staged_a).is_err());
}

#[test]
fn staging_mirrors_layout_under_roots_parent() {
    let tree = write_tree(&[
        (
            "root.gx",
            "import \"sub/widgets.gx\"\ntemplate<typename T> struct W { T t; };\n",
        ),
        ("sub/widgets.gx", "struct Plain { int x; };\n"),
    ]);
    let result = process_tree(&tree.path().join("root.gx")).expect("tree has templates");

    let staged_sub =
        &result.original_to_processed[&canon(&tree.path().join("sub/widgets.gx"))];
    assert_eq!(
        staged_sub,
        &result.staging_dir.join("sub/widgets.gx")
    );

    cleanup(&result);
}

#[test]
fn staging_dir_uses_temp_root_and_prefix() {
    let tree = write_tree(&[("a.gx", "template<typename T> struct B { T t; }; B<int> x;\n")]);
    let result = process_tree(&tree.path().join("a.gx")).expect("tree has templates");

    assert!(result.staging_dir.starts_with(std::env::temp_dir()));
    let name = result.staging_dir.file_name().unwrap().to_string_lossy();
    let hex = name.strip_prefix("tmpl_").expect("staging dir prefix");
    assert!(!hex.is_empty());
    assert!(hex
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    cleanup(&result);
}

#[test]
fn processed_root_is_the_staged_root() {
    let tree = write_tree(&[("a.gx", "template<typename T> struct B { T t; }; B<int> x;\n")]);
    let root = tree.path().join("a.gx");
    let result = process_tree(&root).expect("tree has templates");

    assert_eq!(result.original_root, canon(&root));
    assert_eq!(
        &result.processed_root,
        &result.original_to_processed[&result.original_root]
    );

    cleanup(&result);
}

#[test]
fn path_maps_round_trip() {
    let tree = write_tree(&[
        (
            "a.gx",
            "import \"b.gx\"\ntemplate<typename T> struct B { T t; }; B<int> x;\n",
        ),
        ("b.gx", "import \"c.gx\"\n"),
        ("c.gx", "struct Plain { int x; };\n"),
    ]);
    let result = process_tree(&tree.path().join("a.gx")).expect("tree has templates");

    assert_eq!(
        result.original_to_processed.len(),
        result.processed_to_original.len()
    );
    for (original, processed) in &result.original_to_processed {
        assert_eq!(&result.processed_to_original[processed], original);
    }
    for (processed, original) in &result.processed_to_original {
        assert_eq!(&result.original_to_processed[original], processed);
    }

    cleanup(&result);
}

#[test]
fn import_cycles_terminate() {
    let tree = write_tree(&[
        (
            "a.gx",
            "import \"b.gx\"\ntemplate<typename T> struct B { T t; }; B<int> x;\n",
        ),
        ("b.gx", "import \"a.gx\"\nstruct Plain { int x; };\n"),
    ]);
    let result = process_tree(&tree.path().join("a.gx")).expect("tree has templates");

    assert_eq!(result.original_to_processed.len(), 2);
    cleanup(&result);
}

#[test]
fn missing_imports_are_skipped_silently() {
    let tree = write_tree(&[(
        "a.gx",
        "import \"missing.gx\"\ntemplate<typename T> struct B { T t; }; B<int> x;\n",
    )]);
    let result = process_tree(&tree.path().join("a.gx")).expect("tree has templates");

    assert_eq!(result.original_to_processed.len(), 1);
    cleanup(&result);
}

#[test]
fn staged_tree_is_a_fixed_point() {
    let tree = write_tree(&[
        (
            "a.gx",
            "import \"b.gx\"\ntemplate<typename T> struct Box { T v; };\nBox<int> b;\n",
        ),
        ("b.gx", "template<int N> struct Buf { char d[N]; };\nBuf<4> q;\n"),
    ]);
    let result = process_tree(&tree.path().join("a.gx")).expect("tree has templates");

    // Staged files contain no parametric declarations, so a second pass
    // over the staged root finds nothing to do.
    let staged_root = result.processed_root.clone();
    assert!(process_tree(&staged_root).is_none());

    for processed in result.original_to_processed.values() {
        let text = fs::read_to_string(processed).unwrap();
        let again = process_source(processed, &text);
        assert!(!again.had_templates);
        assert_eq!(again.processed, text);
    }

    cleanup(&result);
}
