/// Statement parsing.
///
/// Declarations, control flow, `try`/`switch`, blocks, and expression statements. Every statement passes
/// through [`Parser::statement`], which applies the nesting guard.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        self.nested(|p| p.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        let token = self.peek();

        if let Some(id) = token.keyword_id() {
            match id {
                KeywordId::Var | KeywordId::Let | KeywordId::Const => {
                    let decl = self.var_decl()?;
                    self.consume_semicolon()?;
                    return Ok(self.finish(Stmt::VarDecl(decl), start));
                }
                KeywordId::Function => return self.function_declaration(),
                KeywordId::If => return self.if_stmt(),
                KeywordId::While => return self.while_stmt(),
                KeywordId::Do => return self.do_while_stmt(),
                KeywordId::For => return self.for_stmt(),
                KeywordId::Return => return self.return_stmt(),
                KeywordId::Break => return self.break_stmt(),
                KeywordId::Continue => return self.continue_stmt(),
                KeywordId::Throw => return self.throw_stmt(),
                KeywordId::Try => return self.try_stmt(),
                KeywordId::Switch => return self.switch_stmt(),
                other if !keywords::is_supported(other) => {
                    return Err(CompileError::unsupported(
                        &format!("'{}'", keywords::as_str(other)),
                        start,
                    ));
                }
                _ => {}
            }
        }

        if self.check_punct(PunctuationId::LBrace) {
            let block = self.block()?;
            return Ok(self.finish(Stmt::Block(block), start));
        }
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(self.finish(Stmt::Empty, start));
        }
        if matches!(token.kind, TokenKind::Ident(_)) && self.peek_at(1).kind.is_punctuation(PunctuationId::Colon) {
            return Err(CompileError::unsupported("Labeled statement syntax", start));
        }

        let expr = self.expression()?;
        self.consume_semicolon()?;
        Ok(self.finish(Stmt::Expr(expr), start))
    }

    /// `{ statements }`
    fn block(&mut self) -> Result<Block, CompileError> {
        self.expect_punct(PunctuationId::LBrace, "Expected '{'")?;
        let mut body = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            if self.is_at_end() {
                return Err(self.unexpected("Expected '}'"));
            }
            body.push(self.statement()?);
        }
        self.advance();
        Ok(body)
    }

    fn decl_kind(&mut self) -> Result<DeclKind, CompileError> {
        let kind = match self.peek().keyword_id() {
            Some(KeywordId::Var) => DeclKind::Var,
            Some(KeywordId::Let) => DeclKind::Let,
            Some(KeywordId::Const) => DeclKind::Const,
            _ => return Err(self.unexpected("Expected 'var', 'let' or 'const'")),
        };
        self.advance();
        Ok(kind)
    }

    /// `var|let|const a = 1, [b, c] = pair`
    fn var_decl(&mut self) -> Result<VarDecl, CompileError> {
        let kind = self.decl_kind()?;
        let first = self.binding_pattern()?;
        self.declarators_from(kind, first)
    }

    /// Finish a declaration list whose first target has already been parsed.
    fn declarators_from(&mut self, kind: DeclKind, first: Spanned<Pattern>) -> Result<VarDecl, CompileError> {
        let mut declarators = Vec::new();
        let mut target = first;
        loop {
            let init = if self.match_op(OperatorId::Eq) {
                Some(self.assignment()?)
            } else {
                None
            };
            if init.is_none() {
                if kind == DeclKind::Const {
                    return Err(CompileError::syntax(
                        "Missing initializer in const declaration".to_string(),
                        target.span,
                    ));
                }
                if !matches!(target.node, Pattern::Ident(_)) {
                    return Err(CompileError::syntax(
                        "Missing initializer in destructuring declaration".to_string(),
                        target.span,
                    ));
                }
            }
            declarators.push(Declarator { target, init });
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
            target = self.binding_pattern()?;
        }
        Ok(VarDecl { kind, declarators })
    }

    /// `function name(params) { body }`
    fn function_declaration(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        if self.check_op(OperatorId::Star) {
            return Err(CompileError::unsupported("Generator function syntax", self.current_span()));
        }
        let name = self.identifier()?;
        let function = self.function_rest(Some(name), start)?;
        Ok(self.finish(Stmt::Function(Rc::new(function)), start))
    }

    fn paren_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        let expr = self.allow_in(|p| p.expression())?;
        self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
        Ok(expr)
    }

    fn if_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        let test = self.paren_expression()?;
        let consequent = Box::new(self.statement()?);
        let alternate = if self.match_keyword(KeywordId::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(self.finish(
            Stmt::If(IfStmt {
                test,
                consequent,
                alternate,
            }),
            start,
        ))
    }

    /// Parse a loop body with `break` and `continue` permitted.
    fn loop_body(&mut self) -> Result<Box<Spanned<Stmt>>, CompileError> {
        self.breakable += 1;
        self.continuable += 1;
        let body = self.statement();
        self.breakable -= 1;
        self.continuable -= 1;
        Ok(Box::new(body?))
    }

    fn while_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        let test = self.paren_expression()?;
        let body = self.loop_body()?;
        Ok(self.finish(Stmt::While(WhileStmt { test, body }), start))
    }

    fn do_while_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        let body = self.loop_body()?;
        self.expect_keyword(KeywordId::While, "Expected 'while' after do-while body")?;
        let test = self.paren_expression()?;
        // A semicolon is always optional after `do ... while (...)`.
        self.match_punct(PunctuationId::Semicolon);
        Ok(self.finish(Stmt::DoWhile(WhileStmt { test, body }), start))
    }

    /// `for (init; test; update)`, `for (x of xs)` and `for (k in obj)`
    fn for_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        if self.check_keyword(KeywordId::Await) {
            return Err(CompileError::unsupported("'for await'", self.current_span()));
        }
        self.expect_punct(PunctuationId::LParen, "Expected '(' after 'for'")?;

        let init = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else if matches!(
            self.peek().keyword_id(),
            Some(KeywordId::Var | KeywordId::Let | KeywordId::Const)
        ) {
            let kind = self.decl_kind()?;
            let target = self.binding_pattern()?;
            if let Some(each) = self.for_each_tail(Some(kind), target.clone(), start)? {
                return Ok(each);
            }
            let decl = self.without_in(|p| p.declarators_from(kind, target))?;
            Some(ForInit::VarDecl(decl))
        } else {
            let expr = self.without_in(|p| p.expression())?;
            if self.check_for_each_keyword() {
                let target = self.expr_to_pattern(expr)?;
                if let Some(each) = self.for_each_tail(None, target, start)? {
                    return Ok(each);
                }
                return Err(self.unexpected("Expected 'of' or 'in'"));
            }
            Some(ForInit::Expr(expr))
        };

        self.expect_punct(PunctuationId::Semicolon, "Expected ';' after for-loop initializer")?;
        let test = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::Semicolon, "Expected ';' after for-loop condition")?;
        let update = if self.check_punct(PunctuationId::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::RParen, "Expected ')' after for-loop clauses")?;
        let body = self.loop_body()?;

        Ok(self.finish(
            Stmt::For(ForStmt {
                init,
                test,
                update,
                body,
            }),
            start,
        ))
    }

    fn check_for_each_keyword(&self) -> bool {
        self.peek().kind.is_ident_named("of") || self.check_keyword(KeywordId::In)
    }

    /// If the next token is `of`/`in`, parse the rest of a for-each loop.
    fn for_each_tail(
        &mut self,
        kind: Option<DeclKind>,
        target: Spanned<Pattern>,
        start: Span,
    ) -> Result<Option<Spanned<Stmt>>, CompileError> {
        let is_of = self.peek().kind.is_ident_named("of");
        if !is_of && !self.check_keyword(KeywordId::In) {
            return Ok(None);
        }
        self.advance();
        let iterable = if is_of {
            self.allow_in(|p| p.assignment())?
        } else {
            self.allow_in(|p| p.expression())?
        };
        self.expect_punct(PunctuationId::RParen, "Expected ')' after for-loop head")?;
        let body = self.loop_body()?;
        let each = ForEachStmt {
            kind,
            target,
            iterable,
            body,
        };
        let stmt = if is_of { Stmt::ForOf(each) } else { Stmt::ForIn(each) };
        Ok(Some(self.finish(stmt, start)))
    }

    fn return_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        let value = if self.check_punct(PunctuationId::Semicolon)
            || self.check_punct(PunctuationId::RBrace)
            || self.is_at_end()
            || self.peek().newline_before
        {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume_semicolon()?;
        Ok(self.finish(Stmt::Return(value), start))
    }

    fn reject_label(&self) -> Result<(), CompileError> {
        let next = self.peek();
        if matches!(next.kind, TokenKind::Ident(_)) && !next.newline_before {
            return Err(CompileError::unsupported("Labeled statement syntax", next.span));
        }
        Ok(())
    }

    fn break_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        self.reject_label()?;
        if self.breakable == 0 {
            return Err(CompileError::syntax("Illegal break statement".to_string(), start));
        }
        self.consume_semicolon()?;
        Ok(self.finish(Stmt::Break, start))
    }

    fn continue_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        self.reject_label()?;
        if self.continuable == 0 {
            return Err(CompileError::syntax(
                "Illegal continue statement: no surrounding iteration statement".to_string(),
                start,
            ));
        }
        self.consume_semicolon()?;
        Ok(self.finish(Stmt::Continue, start))
    }

    fn throw_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        if self.peek().newline_before {
            return Err(CompileError::syntax("Illegal newline after throw".to_string(), start));
        }
        let value = self.expression()?;
        self.consume_semicolon()?;
        Ok(self.finish(Stmt::Throw(value), start))
    }

    fn try_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        let block = self.block()?;

        let handler = if self.match_keyword(KeywordId::Catch) {
            let param = if self.match_punct(PunctuationId::LParen) {
                let pattern = self.binding_pattern()?;
                self.expect_punct(PunctuationId::RParen, "Expected ')' after catch parameter")?;
                Some(pattern)
            } else {
                None
            };
            let body = self.block()?;
            Some(CatchClause { param, body })
        } else {
            None
        };
        let finalizer = if self.match_keyword(KeywordId::Finally) {
            Some(self.block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("Missing catch or finally after try"));
        }
        Ok(self.finish(
            Stmt::Try(TryStmt {
                block,
                handler,
                finalizer,
            }),
            start,
        ))
    }

    fn switch_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.current_span();
        self.advance();
        let discriminant = self.paren_expression()?;
        self.expect_punct(PunctuationId::LBrace, "Expected '{' after switch discriminant")?;

        self.breakable += 1;
        let cases = self.switch_cases();
        self.breakable -= 1;
        let cases = cases?;

        Ok(self.finish(Stmt::Switch(SwitchStmt { discriminant, cases }), start))
    }

    fn switch_cases(&mut self) -> Result<Vec<SwitchCase>, CompileError> {
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.match_punct(PunctuationId::RBrace) {
            let test = if self.match_keyword(KeywordId::Case) {
                Some(self.expression()?)
            } else if self.check_keyword(KeywordId::Default) {
                if seen_default {
                    return Err(CompileError::syntax(
                        "More than one default clause in switch statement".to_string(),
                        self.current_span(),
                    ));
                }
                seen_default = true;
                self.advance();
                None
            } else {
                return Err(self.unexpected("Expected 'case' or 'default'"));
            };
            self.expect_punct(PunctuationId::Colon, "Expected ':' after case label")?;

            let mut body = Vec::new();
            while !self.check_keyword(KeywordId::Case)
                && !self.check_keyword(KeywordId::Default)
                && !self.check_punct(PunctuationId::RBrace)
            {
                if self.is_at_end() {
                    return Err(self.unexpected("Expected '}'"));
                }
                body.push(self.statement()?);
            }
            cases.push(SwitchCase { test, body });
        }
        Ok(cases)
    }
}
