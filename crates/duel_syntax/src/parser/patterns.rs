/// Destructuring and assignment targets.
///
/// Declarations and parameters parse patterns directly ([`Parser::binding_pattern`]). Assignment expressions
/// are parsed as expressions first and converted afterwards ([`Parser::expr_to_pattern`]).
impl<'a> Parser<'a> {
    // ========================================================================
    // Patterns
    // ========================================================================

    /// `name`, `[a, , b = 1, ...rest]` or `{ a, b: c, ...rest }`
    fn binding_pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        self.nested(|p| p.binding_pattern_inner())
    }

    fn binding_pattern_inner(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let start = self.current_span();
        if self.match_punct(PunctuationId::LBracket) {
            let pattern = self.array_binding()?;
            return Ok(self.finish(Pattern::Array(pattern), start));
        }
        if self.match_punct(PunctuationId::LBrace) {
            let pattern = self.object_binding()?;
            return Ok(self.finish(Pattern::Object(pattern), start));
        }
        let name = self.identifier()?;
        Ok(self.finish(Pattern::Ident(name), start))
    }

    /// A pattern with an optional `= default`.
    fn binding_element(&mut self) -> Result<PatternElement, CompileError> {
        let target = self.binding_pattern()?;
        let default = if self.match_op(OperatorId::Eq) {
            Some(self.allow_in(|p| p.assignment())?)
        } else {
            None
        };
        Ok(PatternElement { target, default })
    }

    fn array_binding(&mut self) -> Result<ArrayPattern, CompileError> {
        let mut elements = Vec::new();
        let mut rest = None;
        while !self.match_punct(PunctuationId::RBracket) {
            if self.match_punct(PunctuationId::Comma) {
                elements.push(None);
                continue;
            }
            if self.match_punct(PunctuationId::Ellipsis) {
                rest = Some(Box::new(self.binding_pattern()?));
                self.expect_punct(PunctuationId::RBracket, "Rest element must be last element")?;
                break;
            }
            elements.push(Some(self.binding_element()?));
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RBracket, "Expected ',' or ']' in array pattern")?;
                break;
            }
        }
        Ok(ArrayPattern { elements, rest })
    }

    fn object_binding(&mut self) -> Result<ObjectPattern, CompileError> {
        let mut props = Vec::new();
        let mut rest = None;
        while !self.match_punct(PunctuationId::RBrace) {
            if self.match_punct(PunctuationId::Ellipsis) {
                let start = self.current_span();
                let name = self.identifier()?;
                rest = Some(Box::new(self.finish(Pattern::Ident(name), start)));
                self.expect_punct(PunctuationId::RBrace, "Rest element must be last element")?;
                break;
            }

            let key_span = self.current_span();
            let shorthand = match &self.peek().kind {
                TokenKind::Ident(name) => Some(name.clone()),
                _ => None,
            };
            let key = self.prop_key()?;
            let value = if self.match_punct(PunctuationId::Colon) {
                self.binding_element()?
            } else {
                let Some(name) = shorthand else {
                    return Err(self.unexpected("Expected ':' after property key"));
                };
                let default = if self.match_op(OperatorId::Eq) {
                    Some(self.allow_in(|p| p.assignment())?)
                } else {
                    None
                };
                PatternElement {
                    target: Spanned::new(Pattern::Ident(name), key_span),
                    default,
                }
            };
            props.push(ObjectPatternProp { key, value });

            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RBrace, "Expected ',' or '}' in object pattern")?;
                break;
            }
        }
        Ok(ObjectPattern { props, rest })
    }

    /// Reinterpret an already-parsed expression as the left-hand side of `=` or a for-each head.
    fn expr_to_pattern(&self, expr: Spanned<Expr>) -> Result<Spanned<Pattern>, CompileError> {
        let span = expr.span;
        let pattern = match expr.node {
            Expr::Ident(name) => Pattern::Ident(name),
            Expr::Member { optional: false, .. } => Pattern::Member(Box::new(expr)),
            Expr::Array(items) => {
                let mut elements = Vec::new();
                let mut rest = None;
                let count = items.len();
                for (idx, item) in items.into_iter().enumerate() {
                    match item {
                        ArrayElement::Hole => elements.push(None),
                        ArrayElement::Expr(e) => elements.push(Some(self.expr_to_element(e)?)),
                        ArrayElement::Spread(e) if idx + 1 == count => {
                            rest = Some(Box::new(self.expr_to_pattern(e)?));
                        }
                        ArrayElement::Spread(e) => {
                            return Err(CompileError::syntax("Rest element must be last element".to_string(), e.span));
                        }
                    }
                }
                Pattern::Array(ArrayPattern { elements, rest })
            }
            Expr::Object(items) => {
                let mut props = Vec::new();
                let mut rest = None;
                let count = items.len();
                for (idx, item) in items.into_iter().enumerate() {
                    match item {
                        Property::KeyValue(key, value) => props.push(ObjectPatternProp {
                            key,
                            value: self.expr_to_element(value)?,
                        }),
                        Property::Shorthand(name) => props.push(ObjectPatternProp {
                            key: PropKey::Static(name.clone()),
                            value: PatternElement {
                                target: Spanned::new(Pattern::Ident(name), span),
                                default: None,
                            },
                        }),
                        Property::Spread(e) if idx + 1 == count => {
                            rest = Some(Box::new(self.expr_to_pattern(e)?));
                        }
                        Property::Spread(e) => {
                            return Err(CompileError::syntax("Rest element must be last element".to_string(), e.span));
                        }
                    }
                }
                Pattern::Object(ObjectPattern { props, rest })
            }
            _ => {
                return Err(CompileError::syntax(
                    "Invalid left-hand side in assignment".to_string(),
                    span,
                ));
            }
        };
        Ok(Spanned::new(pattern, span))
    }

    /// An element inside a destructuring assignment; `x = 1` becomes a target with a default.
    fn expr_to_element(&self, expr: Spanned<Expr>) -> Result<PatternElement, CompileError> {
        match expr.node {
            Expr::Assign {
                op: AssignOp::Assign,
                target,
                value,
            } => Ok(PatternElement {
                target: *target,
                default: Some(*value),
            }),
            node => Ok(PatternElement {
                target: self.expr_to_pattern(Spanned::new(node, expr.span))?,
                default: None,
            }),
        }
    }

    /// Targets of compound assignment: an identifier or a non-optional member expression.
    fn simple_target(&self, expr: Spanned<Expr>) -> Result<Spanned<Pattern>, CompileError> {
        let span = expr.span;
        match expr.node {
            Expr::Ident(name) => Ok(Spanned::new(Pattern::Ident(name), span)),
            Expr::Member { optional: false, .. } => Ok(Spanned::new(Pattern::Member(Box::new(expr)), span)),
            _ => Err(CompileError::syntax(
                "Invalid left-hand side in assignment".to_string(),
                span,
            )),
        }
    }
}
