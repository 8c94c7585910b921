/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Deepest statement/expression nesting accepted before reporting a syntax error.
pub const MAX_NESTING: usize = 256;

/// Returned by `peek` when the token slice is empty or exhausted.
static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span { start: 0, end: 0 },
    newline_before: false,
};

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors at statement boundaries so one run reports
///   several issues.
/// - `depth` bounds recursion; `no_in` disables the `in` operator while parsing a `for (...)` head;
///   `breakable`/`continuable` count enclosing loops and switches within the current function.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<CompileError>,
    depth: usize,
    no_in: bool,
    breakable: usize,
    continuable: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `duel_syntax::lexer`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            depth: 0,
            no_in: false,
            breakable: 0,
            continuable: 0,
        }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// ## Errors
    /// Returns a list of [`CompileError`]s if parsing fails. The parser attempts
    /// to recover and continue after an error to report multiple issues in one pass.
    pub fn parse(mut self) -> Result<Program, Vec<CompileError>> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => body.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(Program { body })
        } else {
            Err(self.errors)
        }
    }
}
