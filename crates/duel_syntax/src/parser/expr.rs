/// Expression parsing.
///
/// ## Notes
/// - Binary operators use precedence climbing over [`binary_operator`]; `**` is the only right-associative
///   binary operator.
/// - Arrow functions are detected before the conditional level by scanning to the matching `)` and checking
///   for `=>`.
/// - `no_in` is cleared inside any bracketed construct so `for (x = (a in b); ...)` still parses.

/// A binary-level operator: logical operators short-circuit and keep their own AST node.
#[derive(Clone, Copy)]
enum InfixOp {
    Logical(LogicalOp),
    Binary(BinaryOp),
}

/// Binding power for an infix operator token.
fn binary_operator(kind: &TokenKind, no_in: bool) -> Option<(u8, InfixOp)> {
    use InfixOp::{Binary, Logical};
    let found = match kind {
        TokenKind::Operator(op) => match op {
            OperatorId::OrOr => (1, Logical(LogicalOp::Or)),
            OperatorId::QuestionQuestion => (1, Logical(LogicalOp::Nullish)),
            OperatorId::AndAnd => (2, Logical(LogicalOp::And)),
            OperatorId::Pipe => (3, Binary(BinaryOp::BitOr)),
            OperatorId::Caret => (4, Binary(BinaryOp::BitXor)),
            OperatorId::Amp => (5, Binary(BinaryOp::BitAnd)),
            OperatorId::EqEq => (6, Binary(BinaryOp::Eq)),
            OperatorId::NotEq => (6, Binary(BinaryOp::NotEq)),
            OperatorId::EqEqEq => (6, Binary(BinaryOp::StrictEq)),
            OperatorId::NotEqEq => (6, Binary(BinaryOp::StrictNotEq)),
            OperatorId::Lt => (7, Binary(BinaryOp::Lt)),
            OperatorId::LtEq => (7, Binary(BinaryOp::LtEq)),
            OperatorId::Gt => (7, Binary(BinaryOp::Gt)),
            OperatorId::GtEq => (7, Binary(BinaryOp::GtEq)),
            OperatorId::Shl => (8, Binary(BinaryOp::Shl)),
            OperatorId::Shr => (8, Binary(BinaryOp::Shr)),
            OperatorId::UShr => (8, Binary(BinaryOp::UShr)),
            OperatorId::Plus => (9, Binary(BinaryOp::Add)),
            OperatorId::Minus => (9, Binary(BinaryOp::Sub)),
            OperatorId::Star => (10, Binary(BinaryOp::Mul)),
            OperatorId::Slash => (10, Binary(BinaryOp::Div)),
            OperatorId::Percent => (10, Binary(BinaryOp::Mod)),
            OperatorId::StarStar => (11, Binary(BinaryOp::Pow)),
            _ => return None,
        },
        TokenKind::Keyword(KeywordId::In) if !no_in => (7, Binary(BinaryOp::In)),
        TokenKind::Keyword(KeywordId::Instanceof) => (7, Binary(BinaryOp::InstanceOf)),
        _ => return None,
    };
    Some(found)
}

/// Map an assignment operator token to its AST form.
fn assign_operator(op: OperatorId) -> Option<AssignOp> {
    let found = match op {
        OperatorId::Eq => AssignOp::Assign,
        OperatorId::PlusEq => AssignOp::Compound(BinaryOp::Add),
        OperatorId::MinusEq => AssignOp::Compound(BinaryOp::Sub),
        OperatorId::StarEq => AssignOp::Compound(BinaryOp::Mul),
        OperatorId::SlashEq => AssignOp::Compound(BinaryOp::Div),
        OperatorId::PercentEq => AssignOp::Compound(BinaryOp::Mod),
        OperatorId::StarStarEq => AssignOp::Compound(BinaryOp::Pow),
        OperatorId::AmpEq => AssignOp::Compound(BinaryOp::BitAnd),
        OperatorId::PipeEq => AssignOp::Compound(BinaryOp::BitOr),
        OperatorId::CaretEq => AssignOp::Compound(BinaryOp::BitXor),
        OperatorId::ShlEq => AssignOp::Compound(BinaryOp::Shl),
        OperatorId::ShrEq => AssignOp::Compound(BinaryOp::Shr),
        OperatorId::UShrEq => AssignOp::Compound(BinaryOp::UShr),
        OperatorId::AndAndEq => AssignOp::Logical(LogicalOp::And),
        OperatorId::OrOrEq => AssignOp::Logical(LogicalOp::Or),
        OperatorId::QuestionQuestionEq => AssignOp::Logical(LogicalOp::Nullish),
        _ => return None,
    };
    debug_assert!(operators::is_assignment(op));
    Some(found)
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    /// Run `f` with the `in` operator enabled.
    fn allow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    /// Run `f` with the `in` operator disabled (for-loop heads).
    fn without_in<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        let saved = std::mem::replace(&mut self.no_in, true);
        let result = f(self);
        self.no_in = saved;
        result
    }

    /// Comma-separated sequence of assignments.
    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        let first = self.assignment()?;
        if !self.check_punct(PunctuationId::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            items.push(self.assignment()?);
        }
        Ok(self.finish(Expr::Sequence(items), start))
    }

    fn assignment(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.nested(|p| p.assignment_inner())
    }

    fn assignment_inner(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if let Some(arrow) = self.try_arrow()? {
            return Ok(arrow);
        }

        let start = self.current_span();
        let target = self.conditional()?;

        let Some(op) = self.peek().operator_id().and_then(assign_operator) else {
            return Ok(target);
        };
        self.advance();
        let target = match op {
            AssignOp::Assign => self.expr_to_pattern(target)?,
            _ => self.simple_target(target)?,
        };
        let value = self.assignment()?;
        Ok(self.finish(
            Expr::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            start,
        ))
    }

    /// Parse an arrow function if one starts here; otherwise consume nothing.
    fn try_arrow(&mut self) -> Result<Option<Spanned<Expr>>, CompileError> {
        let start = self.current_span();
        let token = self.peek();

        let (params, rest) = match &token.kind {
            TokenKind::Ident(name) if self.arrow_follows(1) => {
                self.advance();
                let param = Param {
                    pattern: Spanned::new(Pattern::Ident(name.clone()), token.span),
                    default: None,
                };
                (vec![param], None)
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                let Some(close) = self.matching_close(self.pos) else {
                    return Ok(None);
                };
                if !self.arrow_follows(close - self.pos + 1) {
                    return Ok(None);
                }
                self.parameter_list()?
            }
            TokenKind::Keyword(KeywordId::Async) => {
                return Err(CompileError::unsupported("Async function syntax", start));
            }
            _ => return Ok(None),
        };
        self.expect_punct(PunctuationId::FatArrow, "Expected '=>'")?;

        let body = self.in_function_body(|p| {
            if p.check_punct(PunctuationId::LBrace) {
                Ok(FunctionBody::Block(p.block()?))
            } else {
                Ok(FunctionBody::Expr(Box::new(p.assignment()?)))
            }
        })?;
        let span = start.merge(self.previous_span());
        let function = Function {
            name: None,
            params,
            rest,
            body,
            is_arrow: true,
            span,
        };
        Ok(Some(Spanned::new(Expr::Function(Rc::new(function)), span)))
    }

    fn arrow_follows(&self, offset: usize) -> bool {
        let next = self.peek_at(offset);
        next.kind.is_punctuation(PunctuationId::FatArrow) && !next.newline_before
    }

    fn conditional(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        let test = self.binary(1)?;
        if !self.match_punct(PunctuationId::Question) {
            return Ok(test);
        }
        let consequent = self.allow_in(|p| p.assignment())?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' in conditional expression")?;
        let alternate = self.assignment()?;
        Ok(self.finish(
            Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            start,
        ))
    }

    /// Precedence climbing over every binary and logical operator.
    fn binary(&mut self, min_prec: u8) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        let mut left = self.unary()?;

        while let Some((prec, op)) = binary_operator(&self.peek().kind, self.no_in) {
            if prec < min_prec {
                break;
            }
            self.advance();
            let right_assoc = matches!(op, InfixOp::Binary(BinaryOp::Pow));
            let right = self.binary(if right_assoc { prec } else { prec + 1 })?;
            let node = match op {
                InfixOp::Logical(op) => Expr::Logical(Box::new(left), op, Box::new(right)),
                InfixOp::Binary(op) => Expr::Binary(Box::new(left), op, Box::new(right)),
            };
            left = self.finish(node, start);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        let token = self.peek();

        let op = match &token.kind {
            TokenKind::Operator(OperatorId::Bang) => Some(UnaryOp::Not),
            TokenKind::Operator(OperatorId::Minus) => Some(UnaryOp::Neg),
            TokenKind::Operator(OperatorId::Plus) => Some(UnaryOp::Plus),
            TokenKind::Operator(OperatorId::Tilde) => Some(UnaryOp::BitNot),
            TokenKind::Keyword(KeywordId::Typeof) => Some(UnaryOp::TypeOf),
            TokenKind::Keyword(KeywordId::Void) => Some(UnaryOp::Void),
            TokenKind::Keyword(KeywordId::Delete) => Some(UnaryOp::Delete),
            TokenKind::Keyword(KeywordId::Await) => {
                return Err(CompileError::unsupported("'await'", start));
            }
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.nested(|p| p.unary())?;
            return Ok(self.finish(Expr::Unary(op, Box::new(operand)), start));
        }

        let update = match token.operator_id() {
            Some(OperatorId::PlusPlus) => Some(UpdateOp::Inc),
            Some(OperatorId::MinusMinus) => Some(UpdateOp::Dec),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let target = self.nested(|p| p.unary())?;
            self.check_update_target(&target, "prefix")?;
            return Ok(self.finish(
                Expr::Update {
                    op,
                    prefix: true,
                    target: Box::new(target),
                },
                start,
            ));
        }

        self.postfix()
    }

    fn postfix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        let expr = self.call_member()?;
        let next = self.peek();
        if next.newline_before {
            return Ok(expr);
        }
        let op = match next.operator_id() {
            Some(OperatorId::PlusPlus) => UpdateOp::Inc,
            Some(OperatorId::MinusMinus) => UpdateOp::Dec,
            _ => return Ok(expr),
        };
        self.check_update_target(&expr, "postfix")?;
        self.advance();
        Ok(self.finish(
            Expr::Update {
                op,
                prefix: false,
                target: Box::new(expr),
            },
            start,
        ))
    }

    fn check_update_target(&self, target: &Spanned<Expr>, position: &str) -> Result<(), CompileError> {
        match target.node {
            Expr::Ident(_) | Expr::Member { optional: false, .. } => Ok(()),
            _ => Err(CompileError::syntax(
                format!("Invalid left-hand side expression in {position} operation"),
                target.span,
            )),
        }
    }

    fn call_member(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let head = if self.check_keyword(KeywordId::New) {
            self.new_expr()?
        } else {
            self.primary()?
        };
        self.call_tail(head, true)
    }

    /// `new Callee(args)`; the callee is a member chain without calls.
    fn new_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        self.advance();
        if self.check_punct(PunctuationId::Dot) {
            return Err(CompileError::unsupported("'new.target'", start));
        }
        let callee = self.nested(|p| {
            let head = if p.check_keyword(KeywordId::New) {
                p.new_expr()?
            } else {
                p.primary()?
            };
            p.call_tail(head, false)
        })?;
        let args = if self.check_punct(PunctuationId::LParen) {
            self.arguments()?
        } else {
            Vec::new()
        };
        Ok(self.finish(
            Expr::New {
                callee: Box::new(callee),
                args,
            },
            start,
        ))
    }

    /// Member accesses, optional chains and (when `allow_calls`) call suffixes.
    fn call_tail(&mut self, mut expr: Spanned<Expr>, allow_calls: bool) -> Result<Spanned<Expr>, CompileError> {
        let start = expr.span;
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::Punctuation(PunctuationId::Dot) => {
                    self.advance();
                    let name = self.property_name()?;
                    expr = self.finish(
                        Expr::Member {
                            object: Box::new(expr),
                            property: MemberProp::Static(name),
                            optional: false,
                        },
                        start,
                    );
                }
                TokenKind::Punctuation(PunctuationId::LBracket) => {
                    self.advance();
                    let index = self.allow_in(|p| p.expression())?;
                    self.expect_punct(PunctuationId::RBracket, "Expected ']'")?;
                    expr = self.finish(
                        Expr::Member {
                            object: Box::new(expr),
                            property: MemberProp::Computed(Box::new(index)),
                            optional: false,
                        },
                        start,
                    );
                }
                TokenKind::Punctuation(PunctuationId::QuestionDot) if allow_calls => {
                    self.advance();
                    expr = self.optional_link(expr, start)?;
                }
                TokenKind::Punctuation(PunctuationId::LParen) if allow_calls => {
                    let args = self.arguments()?;
                    expr = self.finish(
                        Expr::Call {
                            callee: Box::new(expr),
                            args,
                            optional: false,
                        },
                        start,
                    );
                }
                TokenKind::Template(_) => {
                    return Err(CompileError::unsupported("Tagged template syntax", token.span));
                }
                _ => return Ok(expr),
            }
        }
    }

    /// The link after `?.`: `a?.b`, `a?.[k]` or `a?.(args)`.
    fn optional_link(&mut self, object: Spanned<Expr>, start: Span) -> Result<Spanned<Expr>, CompileError> {
        if self.check_punct(PunctuationId::LParen) {
            let args = self.arguments()?;
            return Ok(self.finish(
                Expr::Call {
                    callee: Box::new(object),
                    args,
                    optional: true,
                },
                start,
            ));
        }
        let property = if self.match_punct(PunctuationId::LBracket) {
            let index = self.allow_in(|p| p.expression())?;
            self.expect_punct(PunctuationId::RBracket, "Expected ']'")?;
            MemberProp::Computed(Box::new(index))
        } else {
            MemberProp::Static(self.property_name()?)
        };
        Ok(self.finish(
            Expr::Member {
                object: Box::new(object),
                property,
                optional: true,
            },
            start,
        ))
    }

    /// `(a, ...rest)`
    fn arguments(&mut self) -> Result<Vec<Argument>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        self.allow_in(|p| {
            let mut args = Vec::new();
            while !p.check_punct(PunctuationId::RParen) {
                if p.match_punct(PunctuationId::Ellipsis) {
                    args.push(Argument::Spread(p.assignment()?));
                } else {
                    args.push(Argument::Expr(p.assignment()?));
                }
                if !p.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            p.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
            Ok(args)
        })
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        let token = self.peek();

        let node = match &token.kind {
            TokenKind::Number(n) => Expr::Number(*n),
            TokenKind::String(s) => Expr::String(s.clone()),
            TokenKind::Regex { pattern, flags } => Expr::Regex {
                pattern: pattern.clone(),
                flags: flags.clone(),
            },
            TokenKind::Template(chunks) => {
                self.advance();
                let parts = self.template_parts(chunks)?;
                return Ok(self.finish(Expr::Template(parts), start));
            }
            TokenKind::Ident(name) => Expr::Ident(name.clone()),
            TokenKind::Keyword(KeywordId::True) => Expr::Bool(true),
            TokenKind::Keyword(KeywordId::False) => Expr::Bool(false),
            TokenKind::Keyword(KeywordId::Null) => Expr::Null,
            TokenKind::Keyword(KeywordId::This) => Expr::This,
            TokenKind::Keyword(KeywordId::Function) => {
                self.advance();
                if self.check_op(OperatorId::Star) {
                    return Err(CompileError::unsupported("Generator function syntax", self.current_span()));
                }
                let name = match self.peek().kind {
                    TokenKind::Ident(_) => Some(self.identifier()?),
                    _ => None,
                };
                let function = self.function_rest(name, start)?;
                return Ok(self.finish(Expr::Function(Rc::new(function)), start));
            }
            TokenKind::Keyword(id) if !keywords::is_supported(*id) => {
                return Err(CompileError::unsupported(&format!("'{}'", keywords::as_str(*id)), start));
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                if self.check_punct(PunctuationId::RParen) {
                    return Err(self.unexpected("Expected an expression"));
                }
                let inner = self.allow_in(|p| p.expression())?;
                self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
                return Ok(Spanned::new(inner.node, start.merge(self.previous_span())));
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                let elements = self.allow_in(|p| p.array_elements())?;
                return Ok(self.finish(Expr::Array(elements), start));
            }
            TokenKind::Punctuation(PunctuationId::LBrace) => {
                self.advance();
                let props = self.allow_in(|p| p.object_properties())?;
                return Ok(self.finish(Expr::Object(props), start));
            }
            _ => return Err(self.unexpected("Expected an expression")),
        };
        self.advance();
        Ok(Spanned::new(node, start))
    }

    /// Re-lex and parse each `${...}` chunk of a template literal.
    fn template_parts(&mut self, chunks: &'a [TemplateChunk]) -> Result<Vec<TemplatePart>, CompileError> {
        let mut parts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match chunk {
                TemplateChunk::Literal(text) => parts.push(TemplatePart::Str(text.clone())),
                TemplateChunk::Expr { source, offset } => {
                    let tokens = lexer::lex_at(source, *offset).map_err(|errors| {
                        errors.into_iter().next().unwrap_or_else(|| {
                            CompileError::syntax("Invalid template expression".to_string(), Span::new(*offset, *offset))
                        })
                    })?;
                    let mut sub = Parser::new(&tokens);
                    sub.depth = self.depth;
                    let expr = sub.expression()?;
                    if !sub.is_at_end() {
                        return Err(sub.unexpected("Expected '}' to close template expression"));
                    }
                    parts.push(TemplatePart::Expr(expr));
                }
            }
        }
        Ok(parts)
    }

    /// Elements of `[ ... ]`; the opening bracket is already consumed.
    fn array_elements(&mut self) -> Result<Vec<ArrayElement>, CompileError> {
        let mut elements = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RBracket) {
                return Ok(elements);
            }
            if self.match_punct(PunctuationId::Comma) {
                elements.push(ArrayElement::Hole);
                continue;
            }
            if self.match_punct(PunctuationId::Ellipsis) {
                elements.push(ArrayElement::Spread(self.assignment()?));
            } else {
                elements.push(ArrayElement::Expr(self.assignment()?));
            }
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RBracket, "Expected ',' or ']' in array literal")?;
                return Ok(elements);
            }
        }
    }

    /// Properties of `{ ... }`; the opening brace is already consumed.
    fn object_properties(&mut self) -> Result<Vec<Property>, CompileError> {
        let mut props = Vec::new();
        while !self.match_punct(PunctuationId::RBrace) {
            props.push(self.object_property()?);
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RBrace, "Expected ',' or '}' in object literal")?;
                break;
            }
        }
        Ok(props)
    }

    fn object_property(&mut self) -> Result<Property, CompileError> {
        let start = self.current_span();
        if self.match_punct(PunctuationId::Ellipsis) {
            return Ok(Property::Spread(self.assignment()?));
        }
        if self.check_op(OperatorId::Star) || self.check_keyword(KeywordId::Async) {
            return Err(CompileError::unsupported("Generator or async method syntax", start));
        }
        let token = self.peek();
        if (token.kind.is_ident_named("get") || token.kind.is_ident_named("set")) && self.starts_property_key(1) {
            return Err(CompileError::unsupported("Getter and setter syntax", start));
        }

        let shorthand = match &token.kind {
            TokenKind::Ident(name) => Some(name.clone()),
            _ => None,
        };
        let key = self.prop_key()?;

        if self.match_punct(PunctuationId::Colon) {
            return Ok(Property::KeyValue(key, self.assignment()?));
        }
        if self.check_punct(PunctuationId::LParen) {
            let name = match &key {
                PropKey::Static(name) => Some(name.clone()),
                PropKey::Computed(_) => None,
            };
            let function = self.function_rest(name, start)?;
            let value = self.finish(Expr::Function(Rc::new(function)), start);
            return Ok(Property::KeyValue(key, value));
        }
        match shorthand {
            Some(name) if self.check_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::RBrace) => {
                Ok(Property::Shorthand(name))
            }
            Some(_) if self.check_op(OperatorId::Eq) => Err(CompileError::syntax(
                "Invalid shorthand property initializer".to_string(),
                self.current_span(),
            )),
            _ => Err(self.unexpected("Expected ':' after property key")),
        }
    }

    /// Whether the token `offset` ahead can begin a property key (used to spot `get x()`).
    fn starts_property_key(&self, offset: usize) -> bool {
        matches!(
            self.peek_at(offset).kind,
            TokenKind::Ident(_)
                | TokenKind::Keyword(_)
                | TokenKind::String(_)
                | TokenKind::Number(_)
                | TokenKind::Punctuation(PunctuationId::LBracket)
        )
    }

    /// An object-literal or object-pattern key.
    fn prop_key(&mut self) -> Result<PropKey, CompileError> {
        let token = self.peek();
        let key = match &token.kind {
            TokenKind::String(s) => PropKey::Static(s.clone()),
            TokenKind::Number(n) => PropKey::Static(duel_core::numbers::to_display(*n)),
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                let expr = self.allow_in(|p| p.assignment())?;
                self.expect_punct(PunctuationId::RBracket, "Expected ']' after computed key")?;
                return Ok(PropKey::Computed(Box::new(expr)));
            }
            _ => return Ok(PropKey::Static(self.property_name()?)),
        };
        self.advance();
        Ok(key)
    }
}
