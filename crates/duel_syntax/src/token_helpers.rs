//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens.

use crate::lexer::{Token, TokenKind};
use duel_core::lang::keywords::{self, KeywordId};
use duel_core::lang::operators::{self, OperatorId};
use duel_core::lang::punctuation::{self, PunctuationId};

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the operator id, if this is an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` if this is the identifier `name` (used for contextual words like `of`).
    pub fn is_ident_named(&self, name: &str) -> bool {
        matches!(self, TokenKind::Ident(n) if n == name)
    }

    /// Return `true` if a `/` following this token is a division operator rather than the start of a regex literal.
    pub fn ends_expression(&self) -> bool {
        match self {
            TokenKind::Ident(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::Template(_)
            | TokenKind::Regex { .. } => true,
            TokenKind::Keyword(k) => matches!(k, KeywordId::This | KeywordId::True | KeywordId::False | KeywordId::Null),
            TokenKind::Punctuation(p) => matches!(p, PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace),
            TokenKind::Operator(o) => matches!(o, OperatorId::PlusPlus | OperatorId::MinusMinus),
            TokenKind::Eof => false,
        }
    }

    /// Render the token for "found ..." diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(k) => format!("keyword '{}'", keywords::as_str(*k)),
            TokenKind::Operator(o) => format!("'{}'", operators::as_str(*o)),
            TokenKind::Punctuation(p) => format!("'{}'", punctuation::as_str(*p)),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Template(_) => "template literal".to_string(),
            TokenKind::Regex { .. } => "regular expression".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.operator_id()`.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }
}
