//! Script language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, operators,
//! punctuation, and the host globals that the engine may expose to evaluated code.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`, `GlobalId`) and look up spellings and
//! metadata via registry tables instead of scattering string comparisons around the frontend and runtime.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - Tables are indexed by their id discriminant; `tests/lang_registry_guardrails.rs` keeps that ordering honest.
//!
//! ## Examples
//! ```rust
//! use duel_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("function"), Some(KeywordId::Function));
//! assert_eq!(keywords::as_str(KeywordId::Return), "return");
//! ```

pub mod globals;
pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
