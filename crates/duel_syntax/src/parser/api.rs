// ============================================================================
// Public API
// ============================================================================

/// Parse tokens into an AST.
///
/// ## Parameters
/// - `tokens`: tokens produced by [`crate::lexer::lex`].
///
/// ## Errors
/// Returns every [`CompileError`] the parser collected while recovering.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, Vec<CompileError>> {
    Parser::new(tokens).parse()
}

/// Lex and parse a complete source text.
pub fn parse_source(source: &str) -> Result<Program, Vec<CompileError>> {
    let tokens = lexer::lex(source)?;
    parse(&tokens)
}

/// Lex and parse a source text that must consist of exactly one expression, such as the source of a
/// function value.
pub fn parse_expression(source: &str) -> Result<Spanned<Expr>, CompileError> {
    let tokens = lexer::lex(source).map_err(|errors| {
        errors
            .into_iter()
            .next()
            .unwrap_or_else(|| CompileError::syntax("Invalid expression".to_string(), Span::default()))
    })?;
    let mut parser = Parser::new(&tokens);
    let expr = parser.expression()?;
    if !parser.is_at_end() {
        return Err(parser.unexpected("Expected end of expression"));
    }
    Ok(expr)
}
