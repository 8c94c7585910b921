//! Lexer for the script language
//!
//! Handles tokenization including:
//! - Keywords (function, return, let, const, ...) and identifiers
//! - Numeric literals (decimal, exponent, hex/octal/binary, `_` separators)
//! - String and template literals (template `${...}` parts are kept as raw text for the parser)
//! - Regular expression literals, disambiguated from `/` by the previous token
//! - Operators and punctuation, longest match first
//! - Line and block comments
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, TemplateChunk)
//! - `strings` - String/template/regex scanning
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{TemplateChunk, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use duel_core::lang::operators::OperatorId;
use duel_core::lang::punctuation::PunctuationId;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// There is no layout tracking: whitespace is skipped, and a line break only
// sets `newline_pending` so the next token is flagged for the parser's
// automatic semicolon insertion.
// ============================================================================

/// Lexer for script source code.
///
/// Converts source text into a stream of tokens. Spans are absolute: a lexer created with
/// [`Lexer::with_offset`] (used for template `${...}` parts) reports positions in the enclosing source.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// Absolute offset of `source` within the original text.
    base: usize,
    newline_pending: bool,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_offset(source, 0)
    }

    /// Create a lexer for a fragment that starts at `base` in some larger source.
    pub fn with_offset(source: &'a str, base: usize) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            base,
            newline_pending: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        let end = self.current_pos;
        self.add_token(TokenKind::Eof, end);

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next(); // skip current
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn span(&self, start: usize) -> Span {
        Span::new(self.base + start, self.base + self.current_pos)
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        let span = self.span(start);
        self.errors.push(CompileError::syntax(message.into(), span));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            // Line terminators
            '\n' | '\u{2028}' | '\u{2029}' => self.newline_pending = true,

            // Whitespace
            ' ' | '\t' | '\r' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}' => {}

            // Comments, regex literals and division
            '/' => {
                if self.match_char('/') {
                    self.skip_line_comment();
                } else if self.match_char('*') {
                    self.skip_block_comment(start);
                } else if self.regex_allowed() {
                    self.scan_regex(start);
                } else {
                    self.operator(start, OperatorId::Slash, &[("=", OperatorId::SlashEq)]);
                }
            }

            // Operators
            '+' => self.operator(
                start,
                OperatorId::Plus,
                &[("+", OperatorId::PlusPlus), ("=", OperatorId::PlusEq)],
            ),
            '-' => self.operator(
                start,
                OperatorId::Minus,
                &[("-", OperatorId::MinusMinus), ("=", OperatorId::MinusEq)],
            ),
            '*' => self.operator(
                start,
                OperatorId::Star,
                &[("*=", OperatorId::StarStarEq), ("*", OperatorId::StarStar), ("=", OperatorId::StarEq)],
            ),
            '%' => self.operator(start, OperatorId::Percent, &[("=", OperatorId::PercentEq)]),
            '=' => {
                if self.match_char('>') {
                    self.add_punct(PunctuationId::FatArrow, start);
                } else {
                    self.operator(
                        start,
                        OperatorId::Eq,
                        &[("==", OperatorId::EqEqEq), ("=", OperatorId::EqEq)],
                    );
                }
            }
            '!' => self.operator(
                start,
                OperatorId::Bang,
                &[("==", OperatorId::NotEqEq), ("=", OperatorId::NotEq)],
            ),
            '<' => self.operator(
                start,
                OperatorId::Lt,
                &[("<=", OperatorId::ShlEq), ("<", OperatorId::Shl), ("=", OperatorId::LtEq)],
            ),
            '>' => self.operator(
                start,
                OperatorId::Gt,
                &[
                    (">>=", OperatorId::UShrEq),
                    (">>", OperatorId::UShr),
                    (">=", OperatorId::ShrEq),
                    (">", OperatorId::Shr),
                    ("=", OperatorId::GtEq),
                ],
            ),
            '&' => self.operator(
                start,
                OperatorId::Amp,
                &[("&=", OperatorId::AndAndEq), ("&", OperatorId::AndAnd), ("=", OperatorId::AmpEq)],
            ),
            '|' => self.operator(
                start,
                OperatorId::Pipe,
                &[("|=", OperatorId::OrOrEq), ("|", OperatorId::OrOr), ("=", OperatorId::PipeEq)],
            ),
            '^' => self.operator(start, OperatorId::Caret, &[("=", OperatorId::CaretEq)]),
            '~' => self.add_op(OperatorId::Tilde, start),
            '?' => {
                if self.match_str("?=") {
                    self.add_op(OperatorId::QuestionQuestionEq, start);
                } else if self.match_char('?') {
                    self.add_op(OperatorId::QuestionQuestion, start);
                } else if self.peek() == Some('.') && !self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    // `a?.5:0` is a conditional, not optional chaining.
                    self.advance();
                    self.add_punct(PunctuationId::QuestionDot, start);
                } else {
                    self.add_punct(PunctuationId::Question, start);
                }
            }

            // Punctuation
            ',' => self.add_punct(PunctuationId::Comma, start),
            ':' => self.add_punct(PunctuationId::Colon, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            '(' => self.add_punct(PunctuationId::LParen, start),
            ')' => self.add_punct(PunctuationId::RParen, start),
            '[' => self.add_punct(PunctuationId::LBracket, start),
            ']' => self.add_punct(PunctuationId::RBracket, start),
            '{' => self.add_punct(PunctuationId::LBrace, start),
            '}' => self.add_punct(PunctuationId::RBrace, start),
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(start, c);
                } else if self.match_str("..") {
                    self.add_punct(PunctuationId::Ellipsis, start);
                } else {
                    self.add_punct(PunctuationId::Dot, start);
                }
            }

            // Strings
            '"' | '\'' => self.scan_string(start, c),
            '`' => self.scan_template(start),

            // Numbers
            '0'..='9' => self.scan_number(start, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => self.error(format!("Invalid or unexpected token '{c}'"), start),
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `expected` only if the whole string follows.
    fn match_str(&mut self, expected: &str) -> bool {
        if self.source[self.current_pos..].starts_with(expected) {
            for _ in expected.chars() {
                self.advance();
            }
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let span = self.span(start);
        let newline_before = std::mem::take(&mut self.newline_pending);
        self.tokens.push(Token::with_newline(kind, span, newline_before));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try compound continuations in order (longest first), falling back to `simple`.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(&str, OperatorId)]) {
        for (rest, id) in compounds {
            if self.match_str(rest) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    /// A `/` starts a regex literal unless the previous token can end an expression.
    fn regex_allowed(&self) -> bool {
        self.tokens.last().is_none_or(|t| !t.kind.ends_expression())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self, start: usize) {
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return;
                }
                Some('\n') => self.newline_pending = true,
                Some(_) => {}
                None => {
                    self.error("Unterminated comment", start);
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        // Look up identifier spelling in the reserved-word registry (no allocation for keywords).
        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier.
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || (!c.is_ascii() && c.is_alphabetic())
}

/// Check if a character can continue an identifier.
pub(crate) fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || (!c.is_ascii() && c.is_alphanumeric())
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

/// Lex a fragment that begins at absolute offset `base` of a larger source.
pub fn lex_at(source: &str, base: usize) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::with_offset(source, base).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("function add"),
            vec![
                TokenKind::Keyword(KeywordId::Function),
                TokenKind::Ident("add".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("a !== b >>>= 1"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Operator(OperatorId::NotEqEq),
                TokenKind::Ident("b".to_string()),
                TokenKind::Operator(OperatorId::UShrEq),
                TokenKind::Number(1.0),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_arrow_and_spread() {
        let k = kinds("(...xs) => xs");
        assert!(k.contains(&TokenKind::Punctuation(PunctuationId::Ellipsis)));
        assert!(k.contains(&TokenKind::Punctuation(PunctuationId::FatArrow)));
    }

    #[test]
    fn test_regex_vs_division() {
        let k = kinds("x = a / b / c");
        assert_eq!(k.iter().filter(|t| t.is_operator(OperatorId::Slash)).count(), 2);

        let k = kinds("s.replace(/[^a-z]/gi, '')");
        assert!(k.iter().any(|t| matches!(
            t,
            TokenKind::Regex { pattern, flags } if pattern == "[^a-z]" && flags == "gi"
        )));
    }

    #[test]
    fn test_regex_after_return() {
        let k = kinds("return /a\\/b/.test(s)");
        assert!(matches!(&k[1], TokenKind::Regex { pattern, .. } if pattern == "a\\/b"));
    }

    #[test]
    fn test_newline_flag() {
        let tokens = lex("a\nb").unwrap();
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("// line\n/* block\n */ x"),
            vec![TokenKind::Ident("x".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_optional_chain_vs_conditional() {
        let k = kinds("a?.b");
        assert!(k.contains(&TokenKind::Punctuation(PunctuationId::QuestionDot)));
        let k = kinds("a?.5:1");
        assert!(k.contains(&TokenKind::Punctuation(PunctuationId::Question)));
    }

    #[test]
    fn test_spans_with_offset() {
        let tokens = lex_at("x + 1", 10).unwrap();
        assert_eq!(tokens[0].span, Span::new(10, 11));
        assert_eq!(tokens[2].span, Span::new(14, 15));
    }

    #[test]
    fn test_unexpected_character() {
        let errs = lex("a # b").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains('#'));
    }
}
