//! Test discovery: find every top-level named function in a test source.
//!
//! This is a lexical scan, not a parse. It tracks paren/brace nesting while skipping comments, string,
//! template and regex literals, so braces inside those never confuse it. Nothing is evaluated here; a
//! body that does not parse is still discovered and fails when it runs.
//!
//! ## Notes
//! - Only outermost functions become tests: the scan resumes after a recognised body.
//! - A candidate whose parens or braces never close is dropped and scanning resumes right after its
//!   `function` keyword, so a later well-formed function is still found.
//! - Duplicate names: the last definition wins, at the position of the first.

use indexmap::IndexMap;

use duel_syntax::ast::Span;

const FUNCTION_KEYWORD: &str = "function";

/// Keywords after which a `/` starts a regex literal rather than a division.
const REGEX_PREFIX_KEYWORDS: &[&str] = &["return", "typeof", "case", "in", "of", "void", "delete", "throw", "new", "else", "do"];

/// One discovered test function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDefinition {
    pub name: String,
    /// Byte range of the definition in the test source.
    pub span: Span,
    /// The definition's text; evaluating it alone recreates the function.
    pub body: String,
}

/// Output of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Tests in source order.
    pub tests: Vec<TestDefinition>,
    /// Names defined more than once, in order of first repetition.
    pub duplicates: Vec<String>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tests.iter().map(|t| t.name.as_str())
    }
}

/// Scan `source` for test functions.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn discover(source: &str) -> Discovery {
    let mut found: IndexMap<String, TestDefinition> = IndexMap::new();
    let mut duplicates = Vec::new();
    let scanner = Scanner::new(source);
    let mut pos = 0;
    while pos < source.len() {
        if let Some(end) = scanner.skip_literal(pos) {
            pos = end;
            continue;
        }
        if scanner.keyword_at(pos, FUNCTION_KEYWORD) {
            match scanner.named_function(pos) {
                Some((name, end)) => {
                    let def = TestDefinition {
                        name: name.clone(),
                        span: Span::new(pos, end),
                        body: source[pos..end].to_string(),
                    };
                    if found.insert(name.clone(), def).is_some() && !duplicates.contains(&name) {
                        tracing::warn!(test = %name, "duplicate test name; the last definition wins");
                        duplicates.push(name);
                    }
                    pos = end;
                }
                None => pos += FUNCTION_KEYWORD.len(),
            }
            continue;
        }
        pos += scanner.char_len(pos);
    }
    let discovery = Discovery {
        tests: found.into_values().collect(),
        duplicates,
    };
    tracing::debug!(tests = discovery.len(), duplicates = discovery.duplicates.len(), "discovery finished");
    discovery
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, bytes: src.as_bytes() }
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.src.get(pos..).and_then(|rest| rest.chars().next())
    }

    fn char_len(&self, pos: usize) -> usize {
        self.char_at(pos).map_or(1, char::len_utf8)
    }

    fn char_before(&self, pos: usize) -> Option<char> {
        self.src.get(..pos).and_then(|head| head.chars().next_back())
    }

    /// `word` starts at `pos` and is not part of a longer identifier or a member access.
    fn keyword_at(&self, pos: usize, word: &str) -> bool {
        if !self.src[pos..].starts_with(word) {
            return false;
        }
        let before_ok = self.char_before(pos).is_none_or(|c| !is_ident_char(c) && c != '.');
        let after_ok = self.char_at(pos + word.len()).is_none_or(|c| !is_ident_char(c));
        before_ok && after_ok
    }

    /// If a comment or literal starts at `pos`, the offset just past it.
    fn skip_literal(&self, pos: usize) -> Option<usize> {
        let rest = &self.bytes[pos..];
        match rest.first()? {
            b'/' if rest.get(1) == Some(&b'/') => Some(
                self.src[pos..]
                    .find('\n')
                    .map_or(self.src.len(), |offset| pos + offset),
            ),
            b'/' if rest.get(1) == Some(&b'*') => Some(
                self.src[pos + 2..]
                    .find("*/")
                    .map_or(self.src.len(), |offset| pos + 2 + offset + 2),
            ),
            b'/' if self.regex_allowed(pos) => self.skip_regex(pos),
            quote @ (b'\'' | b'"') => Some(self.skip_string(pos, *quote)),
            b'`' => Some(self.skip_template(pos)),
            _ => None,
        }
    }

    fn skip_string(&self, pos: usize, quote: u8) -> usize {
        let mut i = pos + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return i,
                b if b == quote => return i + 1,
                _ => i += 1,
            }
        }
        self.bytes.len()
    }

    fn skip_template(&self, pos: usize) -> usize {
        let mut i = pos + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'`' => return i + 1,
                b'$' if self.bytes.get(i + 1) == Some(&b'{') => match self.balanced(i + 1, b'{', b'}') {
                    Some(end) => i = end,
                    None => return self.bytes.len(),
                },
                _ => i += 1,
            }
        }
        self.bytes.len()
    }

    /// A `/` is a regex when the previous significant token cannot end an expression.
    fn regex_allowed(&self, pos: usize) -> bool {
        let head = self.src[..pos].trim_end();
        let Some(prev) = head.chars().next_back() else { return true };
        if is_ident_char(prev) {
            let word_start = head
                .char_indices()
                .rev()
                .take_while(|(_, c)| is_ident_char(*c))
                .last()
                .map_or(head.len(), |(i, _)| i);
            return REGEX_PREFIX_KEYWORDS.contains(&&head[word_start..]);
        }
        !matches!(prev, ')' | ']' | '}' | '"' | '\'' | '`')
    }

    /// The end of a regex literal at `pos`, or `None` if it does not close on its line.
    fn skip_regex(&self, pos: usize) -> Option<usize> {
        let mut i = pos + 1;
        let mut in_class = false;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return None,
                b'[' => {
                    in_class = true;
                    i += 1;
                }
                b']' => {
                    in_class = false;
                    i += 1;
                }
                b'/' if !in_class => {
                    i += 1;
                    while self.char_at(i).is_some_and(is_ident_char) {
                        i += 1;
                    }
                    return Some(i);
                }
                _ => i += 1,
            }
        }
        None
    }

    /// Given `open` at `pos`, the offset just past its matching `close`.
    fn balanced(&self, pos: usize, open: u8, close: u8) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = pos;
        while i < self.bytes.len() {
            if let Some(end) = self.skip_literal(i) {
                i = end;
                continue;
            }
            let b = self.bytes[i];
            if b == open {
                depth += 1;
            } else if b == close {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            i += self.char_len(i);
        }
        None
    }

    fn skip_space(&self, mut pos: usize) -> usize {
        loop {
            match self.char_at(pos) {
                Some(c) if c.is_whitespace() => pos += c.len_utf8(),
                Some('/') if matches!(self.bytes.get(pos + 1), Some(b'/' | b'*')) => {
                    match self.skip_literal(pos) {
                        Some(end) => pos = end,
                        None => return pos,
                    }
                }
                _ => return pos,
            }
        }
    }

    /// `function <name> (…) {…}` starting at `pos`: the name and the end of the body.
    fn named_function(&self, pos: usize) -> Option<(String, usize)> {
        let name_start = self.skip_space(pos + FUNCTION_KEYWORD.len());
        if !self.char_at(name_start).is_some_and(is_ident_start) {
            return None;
        }
        let mut name_end = name_start;
        while let Some(c) = self.char_at(name_end).filter(|c| is_ident_char(*c)) {
            name_end += c.len_utf8();
        }
        let params = self.skip_space(name_end);
        if self.bytes.get(params) != Some(&b'(') {
            return None;
        }
        let params_end = self.balanced(params, b'(', b')')?;
        let body = self.skip_space(params_end);
        if self.bytes.get(body) != Some(&b'{') {
            return None;
        }
        let body_end = self.balanced(body, b'{', b'}')?;
        Some((self.src[name_start..name_end].to_string(), body_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(source: &str) -> Vec<String> {
        discover(source).tests.into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_finds_functions_in_order() {
        let source = "function t1() { assertEqual(add(2, 3), 5); }\nfunction t2(){ assertEqual(add(1,1),3); }";
        let discovery = discover(source);
        assert_eq!(discovery.names().collect::<Vec<_>>(), vec!["t1", "t2"]);
        assert_eq!(discovery.tests[1].body, "function t2(){ assertEqual(add(1,1),3); }");
        assert_eq!(&source[discovery.tests[0].span.start..discovery.tests[0].span.end], discovery.tests[0].body);
    }

    #[test]
    fn test_no_functions_is_empty() {
        assert!(discover("// no functions here").is_empty());
        assert!(discover("").is_empty());
        assert!(discover("const f = function () { return 1; };").is_empty());
    }

    #[test]
    fn test_nested_functions_are_not_tests() {
        let source = "function outer() { function inner() {} inner(); }\nfunction next() {}";
        assert_eq!(names(source), vec!["outer", "next"]);
    }

    #[test]
    fn test_braces_in_literals_and_comments_are_ignored() {
        let source = r#"
            function a() { const s = "}"; const t = '{'; }
            // function commented() {}
            /* function blocked() { */
            function b() { const u = `${ { x: '}' }.x }`; const r = /[{]/; }
        "#;
        assert_eq!(names(source), vec!["a", "b"]);
    }

    #[test]
    fn test_unbalanced_candidate_is_skipped() {
        let source = "function broken() { if (x) {\nfunction fine() { return 1; }";
        // `broken` never closes, so the scan resumes inside it and finds `fine`.
        assert_eq!(names(source), vec!["fine"]);
    }

    #[test]
    fn test_duplicate_names_keep_the_last_body_at_the_first_position() {
        let source = "function a() { 1 }\nfunction b() {}\nfunction a() { 2 }";
        let discovery = discover(source);
        assert_eq!(discovery.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(discovery.tests[0].body, "function a() { 2 }");
        assert_eq!(discovery.duplicates, vec!["a".to_string()]);
    }

    #[test]
    fn test_keyword_must_stand_alone() {
        assert!(discover("myfunction x() {}").is_empty());
        assert!(discover("obj.function foo() {}").is_empty());
        assert_eq!(names("function\n  spaced\n(a, b = {})\n{ }"), vec!["spaced"]);
    }

    #[test]
    fn test_division_is_not_a_regex() {
        let source = "function d() { const x = a / b; const y = (c) / 2; return x / y; }";
        assert_eq!(names(source), vec!["d"]);
    }
}
