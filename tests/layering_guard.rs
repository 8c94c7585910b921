//! Layering guardrails: the syntax crate must stay free of the runtime stack.
//!
//! `duel_syntax` is shared by the engine, the CLI and the fuzz target. It may depend on `duel_core` and the
//! diagnostics crates only; pulling in the async runtime or the engine's collection and serialization
//! crates would make every consumer pay for them.

const FORBIDDEN: &[&str] = &["tokio", "tokio-stream", "serde_json", "indexmap", "rand", "regex", "testduel"];

#[test]
fn syntax_crate_does_not_depend_on_runtime_crates() {
    let manifest = include_str!("../crates/duel_syntax/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        let name = line_no_comment.split(['=', ' ', '.']).next().unwrap_or("");
        if FORBIDDEN.contains(&name) {
            panic!("`{name}` must not appear in duel_syntax's [dependencies]");
        }
    }
}

#[test]
fn core_crate_has_no_dependencies() {
    let manifest = include_str!("../crates/duel_core/Cargo.toml");
    let deps = manifest
        .split("[dependencies]")
        .nth(1)
        .map(|rest| rest.split("\n[").next().unwrap_or(""))
        .unwrap_or("");
    let declared: Vec<&str> = deps
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    assert!(declared.is_empty(), "duel_core must stay dependency-free, found: {declared:?}");
}
