//! Provide shared, pure semantic helpers and canonical language vocabulary for the Test Duel engine.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic helpers that both:
//! - the syntax frontend can use for lexing/parsing decisions, and
//! - the runtime can use to enforce the same semantics while evaluating programs and tests.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no interpreter-specific types.
//! - Current scope: number conversion/formatting (script-language semantics), string helpers over Unicode scalars,
//!   shared error messages, and canonical vocabulary (keywords, operators, punctuation, host globals).

pub mod errors;
pub mod lang;
pub mod numbers;
pub mod strings;
