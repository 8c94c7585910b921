//! Number scanning for the script lexer
//!
//! Handles decimal, fractional and exponent literals plus `0x`/`0o`/`0b` prefixed integers. Every literal
//! becomes a single `f64` token.

use super::Lexer;
use super::tokens::TokenKind;

impl<'a> Lexer<'a> {
    /// Scan a numeric literal; `first` (a digit or `.`) is already consumed.
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        if first == '0' {
            let radix = match self.peek() {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                self.scan_radix_literal(start, radix);
                return;
            }
        }

        let mut value = String::from(first);

        // Integer part (or the fraction, when the literal starts with `.`)
        self.push_digits(&mut value);

        // Decimal part
        // `1.5`, `1.` and `1.e3` are numbers; in `1..toString()` the second dot is member access.
        if first != '.' && self.peek() == Some('.') {
            value.push('.');
            self.advance();
            self.push_digits(&mut value);
        }

        // Exponent part
        if matches!(self.peek(), Some('e') | Some('E')) {
            let next = self.peek_next();
            let has_digits = match next {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => {
                    let mut iter = self.source[self.current_pos..].chars().skip(2);
                    iter.next().is_some_and(|c| c.is_ascii_digit())
                }
                _ => false,
            };
            if has_digits {
                value.push('e');
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    value.push(sign);
                    self.advance();
                }
                self.push_digits(&mut value);
            }
        }

        if self.peek() == Some('n') {
            self.advance();
            self.error("BigInt literals are not supported", start);
            return;
        }
        if self.peek().is_some_and(super::is_ident_start) {
            self.advance();
            self.error("Invalid or unexpected token", start);
            return;
        }

        match value.parse::<f64>() {
            Ok(n) => self.add_token(TokenKind::Number(n), start),
            Err(_) => self.error(format!("Invalid number literal: {value}"), start),
        }
    }

    /// Append digits (skipping `_` separators) to `value`.
    fn push_digits(&mut self, value: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    value.push(c);
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_radix_literal(&mut self, start: usize, radix: u32) {
        let mut value = 0.0f64;
        let mut any = false;
        while let Some(c) = self.peek() {
            if c == '_' {
                self.advance();
                continue;
            }
            match c.to_digit(radix) {
                Some(d) => {
                    value = value * radix as f64 + d as f64;
                    any = true;
                    self.advance();
                }
                None => break,
            }
        }
        if !any || self.peek().is_some_and(super::is_ident_continue) {
            self.error("Invalid or unexpected token", start);
            return;
        }
        self.add_token(TokenKind::Number(value), start);
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, lex};
    use duel_core::lang::punctuation::PunctuationId;

    fn first_number(source: &str) -> f64 {
        match lex(source).unwrap()[0].kind {
            TokenKind::Number(n) => n,
            ref other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn test_decimal_forms() {
        assert_eq!(first_number("42"), 42.0);
        assert_eq!(first_number("3.25"), 3.25);
        assert_eq!(first_number(".5"), 0.5);
        assert_eq!(first_number("1e3"), 1000.0);
        assert_eq!(first_number("2.5E-1"), 0.25);
        assert_eq!(first_number("1_000_000"), 1_000_000.0);
    }

    #[test]
    fn test_prefixed_forms() {
        assert_eq!(first_number("0xff"), 255.0);
        assert_eq!(first_number("0b101"), 5.0);
        assert_eq!(first_number("0o17"), 15.0);
    }

    #[test]
    fn test_member_access_on_number() {
        let tokens = lex("1..toString()").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(1.0));
        assert_eq!(tokens[1].kind, TokenKind::Punctuation(PunctuationId::Dot));
    }

    #[test]
    fn test_identifier_glued_to_number_is_error() {
        assert!(lex("3px").is_err());
        assert!(lex("10n").is_err());
    }
}
