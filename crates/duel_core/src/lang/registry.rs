//! Shareable metadata for `duel_core::lang` registries.
//!
//! The registries are const tables of small `Copy` records so they can be inspected by tooling, docs and
//! guardrail tests without allocating.

/// Describe the support status of a vocabulary item.
///
/// ## Notes
/// - `Reserved` items are recognised by the lexer so the parser can report a targeted "not supported"
///   diagnostic instead of treating them as identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Reserved,
}

/// Represent a small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use duel_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "if (x) { y(); }",
///     note: Some("Minimal conditional."),
/// };
/// assert!(ex.code.contains("if"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
