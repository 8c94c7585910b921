//! Parser for the script language
//!
//! Converts a token stream into an AST. Programs and test suites use the same grammar; a program is parsed as a
//! function body, so a top-level `return` is accepted.
//!
//! ## Examples
//!
//! ```rust
//! use duel_syntax::{lexer, parser};
//!
//! let source = "function add(a, b) { return a + b; }\nreturn { add };";
//! let tokens = lexer::lex(source).unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert_eq!(ast.body.len(), 2);
//! ```

use std::rc::Rc;

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{self, TemplateChunk, Token, TokenKind};
use duel_core::lang::keywords::{self, KeywordId};
use duel_core::lang::operators::{self, OperatorId};
use duel_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/patterns.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
