//! Syntax frontend for the Test Duel script language: lexer, parser, AST, diagnostics.
//!
//! The script language is the JavaScript subset that programs and test suites are written in. This crate is
//! dependency-light and shared by the interpreter, the test engine, the CLI and the fuzz targets.
//!
//! ## Notes
//! - This crate is "syntax-only": it does not resolve names or evaluate anything.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `duel_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use duel_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("return { answer: 42 };").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```
//!
//! ## See also
//! - `duel_core::lang` for registry-backed language vocabulary.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
