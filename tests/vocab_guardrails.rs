use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use duel_core::lang::globals::{ASSERTIONS, GLOBALS};
use duel_core::lang::keywords::KEYWORDS;

/// Guardrail against stringly-typed vocabulary checks.
///
/// This is intentionally a **coarse** safety net. It looks for patterns like `== "Math"` or
/// `"assertEqual" => ...` in Rust source files where callers should go through the `duel_core::lang`
/// registries instead.
///
/// Notes:
/// - Registries themselves (`crates/duel_core/src/lang/**`) and `tests/` are allowed.
/// - Scanning a file stops at its first `#[cfg(test)]`; unit tests may spell names directly.
#[test]
fn no_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings = spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    for dir in [root.join("src"), root.join("crates")] {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found potential stringly-typed vocabulary checks. Prefer duel_core registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn spellings() -> Vec<&'static str> {
    let mut set: BTreeSet<&'static str> = BTreeSet::new();
    set.extend(KEYWORDS.iter().map(|k| k.canonical));
    set.extend(GLOBALS.iter().map(|g| g.name));
    set.extend(ASSERTIONS.iter().map(|a| a.name));
    set.into_iter().collect()
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    rel.starts_with("crates/duel_core/src/lang/") || rel.starts_with("tests/") || rel.ends_with("/tests.rs")
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if line.trim() == "#[cfg(test)]" {
                break;
            }
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }
    spellings.iter().any(|s| {
        let eq = format!("== \"{s}\"");
        let arm = format!("\"{s}\" =>");
        line.contains(&eq) || line.contains(&arm)
    })
}
