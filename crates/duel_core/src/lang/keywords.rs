//! Define the reserved keyword vocabulary for the script language.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records spellings, categories and
//! whether the parser supports the construct.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `of`, `get` and `set` are contextual and deliberately *not* reserved; the parser checks for them as
//!   identifiers.
//! - Word operators (`typeof`, `instanceof`, `in`, `void`) are keywords here; their precedence lives in the parser
//!   ladder.
//!
//! ## Examples
//! ```rust
//! use duel_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("while"), Some(KeywordId::While));
//! assert!(keywords::from_str("of").is_none());
//! assert!(!keywords::is_supported(KeywordId::Class));
//! ```

use super::registry::{Example, Stability};

/// Stable identifier for every reserved keyword.
///
/// ## Notes
/// - Variant order matches [`KEYWORDS`]; lookups index the table by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Control flow / statements
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,
    Switch,
    Case,
    Default,
    Throw,
    Try,
    Catch,
    Finally,

    // Declarations
    Function,
    Var,
    Let,
    Const,

    // Expressions
    New,
    This,
    Typeof,
    Instanceof,
    In,
    Void,
    Delete,

    // Literals
    True,
    False,
    Null,

    // Reserved, unsupported
    Class,
    Extends,
    Super,
    Async,
    Await,
    Yield,
    Import,
    Export,
}

/// High-level grouping for documentation and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Declaration,
    Expression,
    Literal,
    Reserved,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all keywords, in [`KeywordId`] order.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::If, "if", KeywordCategory::ControlFlow),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow),
    info(KeywordId::Switch, "switch", KeywordCategory::ControlFlow),
    info(KeywordId::Case, "case", KeywordCategory::ControlFlow),
    info(KeywordId::Default, "default", KeywordCategory::ControlFlow),
    info(KeywordId::Throw, "throw", KeywordCategory::ControlFlow),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow),
    info(KeywordId::Catch, "catch", KeywordCategory::ControlFlow),
    info(KeywordId::Finally, "finally", KeywordCategory::ControlFlow),
    KeywordInfo {
        examples: &[Example {
            code: "function testSum() { assertEqual(sum(1, 2), 3); }",
            note: Some("Named function declarations are what test discovery looks for."),
        }],
        ..info(KeywordId::Function, "function", KeywordCategory::Declaration)
    },
    info(KeywordId::Var, "var", KeywordCategory::Declaration),
    info(KeywordId::Let, "let", KeywordCategory::Declaration),
    info(KeywordId::Const, "const", KeywordCategory::Declaration),
    info(KeywordId::New, "new", KeywordCategory::Expression),
    info(KeywordId::This, "this", KeywordCategory::Expression),
    info(KeywordId::Typeof, "typeof", KeywordCategory::Expression),
    info(KeywordId::Instanceof, "instanceof", KeywordCategory::Expression),
    info(KeywordId::In, "in", KeywordCategory::Expression),
    info(KeywordId::Void, "void", KeywordCategory::Expression),
    info(KeywordId::Delete, "delete", KeywordCategory::Expression),
    info(KeywordId::True, "true", KeywordCategory::Literal),
    info(KeywordId::False, "false", KeywordCategory::Literal),
    info(KeywordId::Null, "null", KeywordCategory::Literal),
    reserved(KeywordId::Class, "class"),
    reserved(KeywordId::Extends, "extends"),
    reserved(KeywordId::Super, "super"),
    reserved(KeywordId::Async, "async"),
    reserved(KeywordId::Await, "await"),
    reserved(KeywordId::Yield, "yield"),
    reserved(KeywordId::Import, "import"),
    reserved(KeywordId::Export, "export"),
];

/// Full metadata.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return `true` if the parser understands this keyword (as opposed to merely reserving it).
pub fn is_supported(id: KeywordId) -> bool {
    info_for(id).stability == Stability::Stable
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn reserved(id: KeywordId, canonical: &'static str) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category: KeywordCategory::Reserved,
        stability: Stability::Reserved,
        examples: &[],
    }
}
