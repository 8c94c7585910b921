/// Names, parameter lists and function bodies.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    /// A binding identifier. Keywords are rejected; reserved words get an "unsupported" diagnostic.
    fn identifier(&mut self) -> Result<Ident, CompileError> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name.clone())
            }
            TokenKind::Keyword(id) if !keywords::is_supported(*id) => Err(CompileError::unsupported(
                &format!("'{}'", keywords::as_str(*id)),
                token.span,
            )),
            TokenKind::Keyword(id) => Err(CompileError::syntax(
                format!("Unexpected keyword '{}'", keywords::as_str(*id)),
                token.span,
            )),
            _ => Err(self.unexpected("Expected an identifier")),
        }
    }

    /// A property name after `.`: identifiers and any keyword (`obj.default`, `map.delete`).
    fn property_name(&mut self) -> Result<Ident, CompileError> {
        let token = self.peek();
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Keyword(id) => keywords::as_str(*id).to_string(),
            _ => return Err(self.unexpected("Expected a property name")),
        };
        self.advance();
        Ok(name)
    }

    /// `(a, b = 1, [c, d], ...rest)`
    fn parameter_list(&mut self) -> Result<(Vec<Param>, Option<Spanned<Pattern>>), CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '(' before parameters")?;
        let mut params = Vec::new();
        let mut rest = None;
        while !self.match_punct(PunctuationId::RParen) {
            if self.match_punct(PunctuationId::Ellipsis) {
                rest = Some(self.binding_pattern()?);
                self.expect_punct(
                    PunctuationId::RParen,
                    "Rest parameter must be last formal parameter",
                )?;
                break;
            }
            let PatternElement { target, default } = self.binding_element()?;
            params.push(Param {
                pattern: target,
                default,
            });
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RParen, "Expected ',' or ')' after parameter")?;
                break;
            }
        }
        Ok((params, rest))
    }

    /// Parameters and block body of a `function` or method; the name (if any) is already consumed.
    fn function_rest(&mut self, name: Option<Ident>, start: Span) -> Result<Function, CompileError> {
        let (params, rest) = self.parameter_list()?;
        let body = self.in_function_body(|p| p.block())?;
        Ok(Function {
            name,
            params,
            rest,
            body: FunctionBody::Block(body),
            is_arrow: false,
            span: start.merge(self.previous_span()),
        })
    }
}
