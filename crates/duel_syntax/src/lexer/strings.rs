//! String scanning for the script lexer
//!
//! Handles quoted strings, template literals (with raw `${...}` parts) and regular expression literals.

use super::Lexer;
use super::tokens::{TemplateChunk, TokenKind};

// ============================================================================
// Escape sequence handling
// ============================================================================

/// Result of processing an escape sequence
enum EscapeResult {
    /// Successfully parsed escape character
    Char(char),
    /// Line continuation (`\` followed by a newline): contributes nothing
    Continuation,
    /// Malformed `\x`/`\u` escape
    Invalid(String),
    /// End of input during escape
    Eof,
}

impl<'a> Lexer<'a> {
    /// Process a text escape sequence (for strings and templates).
    /// Called after consuming the backslash.
    fn scan_text_escape(&mut self) -> EscapeResult {
        match self.advance() {
            Some('n') => EscapeResult::Char('\n'),
            Some('t') => EscapeResult::Char('\t'),
            Some('r') => EscapeResult::Char('\r'),
            Some('b') => EscapeResult::Char('\u{0008}'),
            Some('f') => EscapeResult::Char('\u{000C}'),
            Some('v') => EscapeResult::Char('\u{000B}'),
            Some('0') if !self.peek().is_some_and(|c| c.is_ascii_digit()) => EscapeResult::Char('\0'),
            Some('x') => self.scan_hex_escape(2),
            Some('u') => {
                if self.match_char('{') {
                    let mut hex = String::new();
                    while let Some(c) = self.peek() {
                        if c == '}' {
                            break;
                        }
                        hex.push(c);
                        self.advance();
                    }
                    if !self.match_char('}') {
                        return EscapeResult::Invalid(format!("\\u{{{hex}"));
                    }
                    decode_hex(&hex).map_or(EscapeResult::Invalid(format!("\\u{{{hex}}}")), EscapeResult::Char)
                } else {
                    self.scan_hex_escape(4)
                }
            }
            Some('\r') => {
                self.match_char('\n');
                EscapeResult::Continuation
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => EscapeResult::Continuation,
            // Any other escaped character stands for itself (`\'`, `\"`, `\\`, `\``, `\$`, ...).
            Some(c) => EscapeResult::Char(c),
            None => EscapeResult::Eof,
        }
    }

    fn scan_hex_escape(&mut self, digits: usize) -> EscapeResult {
        let mut hex = String::new();
        for _ in 0..digits {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.advance();
                }
                _ => return EscapeResult::Invalid(hex),
            }
        }
        decode_hex(&hex).map_or(EscapeResult::Invalid(hex), EscapeResult::Char)
    }

    /// Push an escape into `out`, reporting malformed escapes. Returns `false` at end of input.
    fn push_escape(&mut self, out: &mut String, start: usize) -> bool {
        match self.scan_text_escape() {
            EscapeResult::Char(c) => out.push(c),
            EscapeResult::Continuation => {}
            EscapeResult::Invalid(text) => self.error(format!("Invalid escape sequence '\\{text}'"), start),
            EscapeResult::Eof => return false,
        }
        true
    }

    // ========================================================================
    // String scanning
    // ========================================================================

    /// Scan a `'...'` or `"..."` literal; the opening quote is already consumed.
    pub(super) fn scan_string(&mut self, start: usize, quote: char) {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    self.add_token(TokenKind::String(value), start);
                    return;
                }
                Some('\\') => {
                    if !self.push_escape(&mut value, start) {
                        break;
                    }
                }
                Some('\n') | None => break,
                Some(c) => value.push(c),
            }
        }
        self.error("Unterminated string literal", start);
    }

    /// Scan a template literal; the opening backtick is already consumed.
    pub(super) fn scan_template(&mut self, start: usize) {
        let mut chunks = Vec::new();
        let mut literal = String::new();
        loop {
            match self.advance() {
                Some('`') => {
                    if !literal.is_empty() {
                        chunks.push(TemplateChunk::Literal(literal));
                    }
                    self.add_token(TokenKind::Template(chunks), start);
                    return;
                }
                Some('\\') => {
                    if !self.push_escape(&mut literal, start) {
                        break;
                    }
                }
                Some('$') if self.peek() == Some('{') => {
                    self.advance();
                    if !literal.is_empty() {
                        chunks.push(TemplateChunk::Literal(std::mem::take(&mut literal)));
                    }
                    let expr_start = self.current_pos;
                    if !self.skip_balanced_braces() {
                        self.error("Unterminated template expression", start);
                        return;
                    }
                    // `skip_balanced_braces` stops just after the closing `}`.
                    let source = self.source[expr_start..self.current_pos - 1].to_string();
                    chunks.push(TemplateChunk::Expr {
                        source,
                        offset: self.base + expr_start,
                    });
                }
                Some('\r') => {
                    self.match_char('\n');
                    literal.push('\n');
                }
                Some(c) => literal.push(c),
                None => break,
            }
        }
        self.error("Unterminated template literal", start);
    }

    /// Advance past the `}` that closes an already-opened `{`, skipping nested strings and templates.
    ///
    /// ## Returns
    /// - `false` if input ends first.
    fn skip_balanced_braces(&mut self) -> bool {
        let mut depth = 1usize;
        while let Some(c) = self.advance() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                '\'' | '"' => self.skip_quoted(c),
                '`' => {
                    if !self.skip_nested_template() {
                        return false;
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn skip_quoted(&mut self, quote: char) {
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '\n' => return,
                c if c == quote => return,
                _ => {}
            }
        }
    }

    fn skip_nested_template(&mut self) -> bool {
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '`' => return true,
                '$' if self.peek() == Some('{') => {
                    self.advance();
                    if !self.skip_balanced_braces() {
                        return false;
                    }
                }
                _ => {}
            }
        }
        false
    }

    // ========================================================================
    // Regex scanning
    // ========================================================================

    /// Scan a regex literal body and flags; the opening `/` is already consumed.
    ///
    /// The pattern is kept verbatim (escapes included); the runtime translates it.
    pub(super) fn scan_regex(&mut self, start: usize) {
        let body_start = self.current_pos;
        let mut in_class = false;
        loop {
            match self.advance() {
                Some('\\') => {
                    if matches!(self.advance(), None | Some('\n')) {
                        break;
                    }
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => {
                    let pattern = self.source[body_start..self.current_pos - 1].to_string();
                    let flags_start = self.current_pos;
                    while self.peek().is_some_and(super::is_ident_continue) {
                        self.advance();
                    }
                    let flags = self.source[flags_start..self.current_pos].to_string();
                    self.add_token(TokenKind::Regex { pattern, flags }, start);
                    return;
                }
                Some('\n') | None => break,
                Some(_) => {}
            }
        }
        self.error("Invalid regular expression: missing /", start);
    }
}

fn decode_hex(hex: &str) -> Option<char> {
    if hex.is_empty() {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TemplateChunk, TokenKind, lex};

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#"'it\'s\n\x41B\u{1F600}'"#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String("it's\nAB\u{1F600}".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let errs = lex("'abc").unwrap_err();
        assert!(errs[0].message.contains("Unterminated string"));
    }

    #[test]
    fn test_template_parts() {
        let tokens = lex("`a${x + 1}b${ {k: 1}.k }`").unwrap();
        let TokenKind::Template(chunks) = &tokens[0].kind else {
            panic!("expected template, got {:?}", tokens[0].kind);
        };
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], TemplateChunk::Literal("a".to_string()));
        assert!(matches!(&chunks[1], TemplateChunk::Expr { source, offset: 4 } if source == "x + 1"));
        assert!(matches!(&chunks[3], TemplateChunk::Expr { source, .. } if source == " {k: 1}.k "));
    }

    #[test]
    fn test_template_nested_strings_with_braces() {
        let tokens = lex("`${ '}' + `in${1}` }`").unwrap();
        let TokenKind::Template(chunks) = &tokens[0].kind else {
            panic!("expected template");
        };
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_regex_class_with_slash() {
        let tokens = lex("/[/]+/g").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Regex {
                pattern: "[/]+".to_string(),
                flags: "g".to_string()
            }
        );
    }
}
