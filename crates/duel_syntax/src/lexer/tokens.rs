//! Token types for the script lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - ID-bearing tokens avoid stringly-typed checks in the parser.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.
//! - `newline_before` replaces layout tokens: the parser consults it for automatic semicolon insertion,
//!   restricted productions (`return`, postfix `++`) and nothing else.

use crate::ast::Span;
use duel_core::lang::keywords::{self, KeywordId};
use duel_core::lang::operators::OperatorId;
use duel_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Number(f64),
    String(String),
    Template(Vec<TemplateChunk>),
    Regex { pattern: String, flags: String },

    // ========== Special ==========
    Eof,
}

/// Part of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChunk {
    /// Cooked literal text (escapes already processed).
    Literal(String),
    /// Raw `${...}` expression text; `offset` is its absolute position so the parser can re-lex it with
    /// accurate spans.
    Expr { source: String, offset: usize },
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one.
    pub newline_before: bool,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            newline_before: false,
        }
    }

    /// Construct a token, recording whether a line break preceded it.
    pub fn with_newline(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
