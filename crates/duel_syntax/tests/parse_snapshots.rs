//! Snapshot tests for syntax diagnostics.
//!
//! Each case renders the first `CompileError` as `message (line L, column C)` so changes to wording or
//! positions show up in review.

use duel_syntax::parser;

fn located_errors(source: &str) -> String {
    match parser::parse_source(source) {
        Ok(_) => "ok".to_string(),
        Err(errors) => errors.iter().map(|e| e.located(source)).collect::<Vec<_>>().join("\n"),
    }
}

#[test]
fn snapshot_missing_brace() {
    insta::assert_snapshot!(located_errors("function f() {\n  return 1;\n"), @"Expected '}', found end of input (line 3, column 1)");
}

#[test]
fn snapshot_unsupported_class() {
    insta::assert_snapshot!(located_errors("const a = 1;\nclass Foo {}\n"), @"'class' is not supported (line 2, column 1)");
}

#[test]
fn snapshot_unterminated_string() {
    let rendered = located_errors("let s = 'abc\n");
    assert!(rendered.contains("line 1"), "got: {rendered}");
}

#[test]
fn snapshot_valid_program() {
    insta::assert_snapshot!(located_errors("const add = (a, b) => a + b;\nreturn { add };"), @"ok");
}
