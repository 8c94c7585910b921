/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Automatic semicolon insertion (`consume_semicolon`)
/// - Nesting limits (`nested`) and error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }

    /// Return the token `n` positions ahead without consuming anything.
    fn peek_at(&self, n: usize) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        tokens
            .get(self.pos + n)
            .or_else(|| tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        if self.pos == 0 {
            return self.current_span();
        }
        self.tokens.get(self.pos - 1).map(|t| t.span).unwrap_or_default()
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Wrap `node` with a span running from `start` to the last consumed token.
    fn finish<T>(&self, node: T, start: Span) -> Spanned<T> {
        Spanned::new(node, start.merge(self.previous_span()))
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Build the standard "unexpected token" error for the current token.
    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::syntax(
            format!("{}, found {}", msg, self.peek().kind.describe()),
            self.current_span(),
        )
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// Consume a statement terminator, applying automatic semicolon insertion.
    ///
    /// A `;` may be omitted before `}`, at end of input, or when the next token starts a new line.
    fn consume_semicolon(&mut self) -> Result<(), CompileError> {
        if self.match_punct(PunctuationId::Semicolon)
            || self.check_punct(PunctuationId::RBrace)
            || self.is_at_end()
            || self.peek().newline_before
        {
            Ok(())
        } else {
            Err(self.unexpected("Expected ';'"))
        }
    }

    /// Run `f` one nesting level deeper, failing cleanly past [`MAX_NESTING`].
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(CompileError::syntax(
                "Code is nested too deeply".to_string(),
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` with loop/switch tracking reset, as a function body does.
    fn in_function_body<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        let saved = (self.breakable, self.continuable, self.no_in);
        self.breakable = 0;
        self.continuable = 0;
        self.no_in = false;
        let result = f(self);
        (self.breakable, self.continuable, self.no_in) = saved;
        result
    }

    /// Skip ahead to a likely statement boundary after an error.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.tokens.get(self.pos.wrapping_sub(1)).is_some_and(|t| t.kind.is_punctuation(PunctuationId::Semicolon)) {
                return;
            }
            if self.peek().newline_before {
                return;
            }
            if let Some(
                KeywordId::Function
                | KeywordId::Var
                | KeywordId::Let
                | KeywordId::Const
                | KeywordId::If
                | KeywordId::For
                | KeywordId::While
                | KeywordId::Return
                | KeywordId::Try
                | KeywordId::Throw
                | KeywordId::Switch,
            ) = self.peek().keyword_id()
            {
                return;
            }
            self.advance();
        }
    }

    /// Index of the token that closes the bracket at `open` (which must be `(`, `[` or `{`).
    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            match token.punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            }
            if matches!(token.kind, TokenKind::Eof) {
                return None;
            }
        }
        None
    }
}
