//! Golden snapshot tests for codegen
//!
//! These tests generate Swift from serialized programs in `tests/codegen_snapshots/` and compare
//! the output against stored snapshots. This ensures codegen changes are
//! reviewed and intentional.
//!
//! Run with: `cargo test --test codegen_snapshot_tests`
//! Review changes: `cargo insta review`

use ciswift::ast::Program;
use ciswift::backend::{EmitConfig, SwiftCodegen};
use std::fs;

/// Generate Swift from a resolved program, indented with four spaces
fn generate_swift(program: &Program) -> String {
    SwiftCodegen::with_config(EmitConfig::new().with_spaces(4))
        .try_generate(program)
        .expect("generation failed")
}

/// Load a program from the codegen_snapshots directory
fn load_test_file(name: &str) -> Program {
    let path = format!("tests/codegen_snapshots/{}.json", name);
    let text = fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read test file: {}", path));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("Invalid program in {}: {}", path, e))
}

#[test]
fn test_class_with_enum_field_codegen() {
    let program = load_test_file("counter");
    let swift = generate_swift(&program);
    insta::assert_snapshot!("counter", swift);
}

#[test]
fn test_inheritance_and_flags_codegen() {
    let program = load_test_file("shapes");
    let swift = generate_swift(&program);
    insta::assert_snapshot!("shapes", swift);
}

#[test]
fn test_throwing_methods_codegen() {
    let program = load_test_file("validator");
    let swift = generate_swift(&program);
    insta::assert_snapshot!("validator", swift);
}

// ============================================================================
// Whitespace configuration
// ============================================================================

#[test]
fn test_default_config_indents_with_tabs() {
    let program = load_test_file("counter");
    let swift = SwiftCodegen::new().try_generate(&program).unwrap();
    assert!(swift.contains("\n\tprivate var count : Int = 0\n"));
    assert!(swift.contains("\n\t\tcount += 1\n"));
}

#[test]
fn test_indentation_never_changes_tokens() {
    let program = load_test_file("shapes");
    let tabs = SwiftCodegen::new().try_generate(&program).unwrap();
    let spaces = generate_swift(&program);
    let strip = |s: &str| s.lines().map(str::trim_start).collect::<Vec<_>>().join("\n");
    assert_eq!(strip(&tabs), strip(&spaces));
}

#[test]
fn test_programs_survive_json_round_trip() {
    let program = load_test_file("validator");
    let json = serde_json::to_string(&program).unwrap();
    let back: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(generate_swift(&program), generate_swift(&back));
}
